//! Body embedding capability
//!
//! The pipeline only depends on the [`Embedder`] trait. Implementations are
//! injected once, shared behind an `Arc`, and only ever used through `&self`,
//! so a single model instance can serve many worker threads.
//!
//! # Example
//!
//! ```rust
//! use email_features::{Embedder, HashingEmbedder};
//!
//! let embedder = HashingEmbedder::new(64).unwrap();
//! let vector = embedder.encode("win a free cruise").unwrap();
//! assert_eq!(vector.len(), embedder.dimension());
//! ```

use thiserror::Error;

/// Errors an embedding backend can report
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model is not loaded or not reachable
    #[error("Embedding model unavailable: {0}")]
    Unavailable(String),

    /// Invalid input text or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Maps normalized body text to a fixed-length vector
pub trait Embedder: Send + Sync {
    /// Embed a single text. Must return exactly [`Self::dimension`] values.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts, one vector per input in input order.
    ///
    /// Backends with native batching should override this.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Output dimensionality, fixed for the lifetime of the instance
    fn dimension(&self) -> usize;
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Feature-hashing text embedder
///
/// Lowercased alphanumeric tokens are hashed (FNV-1a) into `dimension`
/// signed buckets and the result is scaled to unit length. It needs no model
/// files and is stable across platforms and runs, which makes it usable
/// offline and as a reproducible stand-in for a sentence-embedding model.
/// Empty text embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dimension` components
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput(
                "Embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn hash(token: &str) -> u64 {
        token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

impl Embedder for HashingEmbedder {
    #[allow(clippy::cast_possible_truncation)]
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embedding = vec![0.0_f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = Self::hash(&token.to_lowercase());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
