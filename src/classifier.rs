//! Classifier seam: feature records in, spam verdicts out
//!
//! Training and model persistence live elsewhere. This module only defines
//! how a fitted model is consumed, plus a logistic scorer for models that
//! reduce to one weight per column.

use crate::error::{FeatureError, Result};
use crate::pipeline::FeaturePipeline;
use crate::types::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Final label for an email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    Spam,
    Ham,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spam => write!(f, "SPAM"),
            Self::Ham => write!(f, "HAM"),
        }
    }
}

/// A verdict with the model's confidence in it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,

    /// Always within `[0, 1]`
    pub confidence: f32,
}

impl Classification {
    /// Build a classification, clamping confidence into `[0, 1]`
    #[must_use]
    pub fn new(verdict: Verdict, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            verdict,
            confidence,
        }
    }

    #[must_use]
    pub fn is_spam(&self) -> bool {
        self.verdict == Verdict::Spam
    }
}

/// A fitted model that labels feature records
pub trait Classifier: Send + Sync {
    fn classify(&self, record: &FeatureRecord) -> Result<Classification>;
}

/// Logistic model with one weight per record column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Weights in record column order
    pub weights: Vec<f64>,
    pub bias: f64,

    /// Spam probability at or above which the verdict is spam
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

const fn default_threshold() -> f64 {
    0.5
}

impl LinearClassifier {
    #[must_use]
    pub const fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            threshold: default_threshold(),
        }
    }

    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Probability that the record is spam
    pub fn spam_probability(&self, record: &FeatureRecord) -> Result<f64> {
        let values = record.values();
        if values.len() != self.weights.len() {
            return Err(FeatureError::Classification(format!(
                "expected {} features, got {}",
                self.weights.len(),
                values.len()
            )));
        }

        let logit = self
            .weights
            .iter()
            .zip(&values)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

impl Classifier for LinearClassifier {
    #[allow(clippy::cast_possible_truncation)]
    fn classify(&self, record: &FeatureRecord) -> Result<Classification> {
        let p = self.spam_probability(record)?;
        let classification = if p >= self.threshold {
            Classification::new(Verdict::Spam, p as f32)
        } else {
            Classification::new(Verdict::Ham, (1.0 - p) as f32)
        };
        Ok(classification)
    }
}

/// Feature pipeline and classifier wired together
#[derive(Clone)]
pub struct SpamFilter {
    pipeline: FeaturePipeline,
    classifier: Arc<dyn Classifier>,
}

impl SpamFilter {
    #[must_use]
    pub const fn new(pipeline: FeaturePipeline, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            pipeline,
            classifier,
        }
    }

    #[must_use]
    pub const fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    /// Label one raw email
    pub fn classify(&self, raw: &str) -> Result<Classification> {
        let record = self.pipeline.transform(raw)?;
        let classification = self.classifier.classify(&record)?;
        debug!(
            verdict = %classification.verdict,
            confidence = classification.confidence,
            "Classified email"
        );
        Ok(classification)
    }

    /// Label many raw emails, in input order; the first failure aborts
    pub fn classify_batch<S: AsRef<str>>(&self, raws: &[S]) -> Result<Vec<Classification>> {
        self.pipeline
            .transform_batch(raws)?
            .iter()
            .map(|record| self.classifier.classify(record))
            .collect()
    }
}

impl fmt::Debug for SpamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpamFilter")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
