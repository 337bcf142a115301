//! Feature assembly: raw email in, one complete feature record out

use crate::body::normalize_body;
use crate::config::PipelineConfig;
use crate::embedding::Embedder;
use crate::error::{FeatureError, Result};
use crate::header::split_email;
use crate::types::{FeatureRecord, HeaderFeatures, embedding_column};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Header features plus the cleaned body awaiting embedding
type Prepared = (HeaderFeatures, String);

/// Turns raw emails into [`FeatureRecord`]s.
///
/// Holds a shared, read-only handle to the embedder; cloning the pipeline
/// clones the handle, not the model. Every record produced by one pipeline
/// has the same columns because the dimension comes from its embedder.
#[derive(Clone)]
pub struct FeaturePipeline {
    embedder: Arc<dyn Embedder>,
    config: PipelineConfig,
}

impl FeaturePipeline {
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_config(embedder, PipelineConfig::default())
    }

    #[must_use]
    pub const fn with_config(embedder: Arc<dyn Embedder>, config: PipelineConfig) -> Self {
        Self { embedder, config }
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Embedding dimensionality D, as reported by the embedder
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Every column name a record from this pipeline carries, in order
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        HeaderFeatures::NAMES
            .iter()
            .map(ToString::to_string)
            .chain((0..self.dimension()).map(embedding_column))
            .collect()
    }

    /// Extract features from one raw email
    pub fn transform(&self, raw: &str) -> Result<FeatureRecord> {
        let (header, body) = Self::prepare(raw);
        let embedding = self.embed_one(&body)?;

        debug!(
            received = header.num_received_headers,
            subject_length = header.subject_length,
            body_len = body.len(),
            "Extracted email features"
        );

        Ok(FeatureRecord::new(header, embedding))
    }

    /// Extract features from many raw emails, in input order.
    ///
    /// Bodies are embedded in chunks of `config.batch_size`. The first
    /// embedding failure aborts the whole batch.
    pub fn transform_batch<S: AsRef<str>>(&self, raws: &[S]) -> Result<Vec<FeatureRecord>> {
        let prepared: Vec<Prepared> = raws
            .iter()
            .map(|raw| Self::prepare(raw.as_ref()))
            .collect();
        let mut records = Vec::with_capacity(prepared.len());

        for chunk in prepared.chunks(self.config.chunk_len(prepared.len())) {
            let embeddings = self.embed_chunk(chunk)?;
            records.extend(
                chunk
                    .iter()
                    .zip(embeddings)
                    .map(|((header, _), embedding)| FeatureRecord::new(*header, embedding)),
            );
        }

        debug!(count = records.len(), "Extracted batch features");
        Ok(records)
    }

    /// Extract features from many raw emails, isolating failures per email.
    ///
    /// The output has one entry per input, in input order. When a batched
    /// embedding call fails, its emails are retried one at a time so only
    /// the emails that actually fail carry an error.
    pub fn transform_batch_isolated<S: AsRef<str>>(
        &self,
        raws: &[S],
    ) -> Vec<Result<FeatureRecord>> {
        let prepared: Vec<Prepared> = raws
            .iter()
            .map(|raw| Self::prepare(raw.as_ref()))
            .collect();
        let mut results = Vec::with_capacity(prepared.len());

        for chunk in prepared.chunks(self.config.chunk_len(prepared.len())) {
            match self.embed_chunk(chunk) {
                Ok(embeddings) => {
                    results.extend(chunk.iter().zip(embeddings).map(
                        |((header, _), embedding)| Ok(FeatureRecord::new(*header, embedding)),
                    ));
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        size = chunk.len(),
                        "Batch embedding failed, retrying individually"
                    );
                    results.extend(chunk.iter().map(|(header, body)| {
                        self.embed_one(body)
                            .map(|embedding| FeatureRecord::new(*header, embedding))
                    }));
                }
            }
        }

        results
    }

    fn prepare(raw: &str) -> Prepared {
        let parsed = split_email(raw);
        (
            HeaderFeatures::extract(parsed.header),
            normalize_body(parsed.body),
        )
    }

    fn embed_one(&self, body: &str) -> Result<Vec<f32>> {
        let embedding = self.embedder.encode(body)?;
        self.check_dimension(&embedding)?;
        Ok(embedding)
    }

    fn embed_chunk(&self, chunk: &[Prepared]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<&str> = chunk.iter().map(|(_, body)| body.as_str()).collect();
        let embeddings = self.embedder.encode_batch(&texts)?;

        if embeddings.len() != texts.len() {
            return Err(FeatureError::BatchMismatch {
                sent: texts.len(),
                received: embeddings.len(),
            });
        }
        for embedding in &embeddings {
            self.check_dimension(embedding)?;
        }

        Ok(embeddings)
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        let expected = self.dimension();
        if embedding.len() == expected {
            Ok(())
        } else {
            Err(FeatureError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            })
        }
    }
}

impl fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("dimension", &self.dimension())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
