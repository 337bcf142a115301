//! Error types for feature extraction

use crate::embedding::EmbeddingError;
use thiserror::Error;

/// Errors that can occur while turning an email into features
#[derive(Error, Debug)]
pub enum FeatureError {
    /// The embedding capability failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The embedder returned a vector of the wrong length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The embedder returned a different number of vectors than texts sent
    #[error("Embedding batch mismatch: sent {sent} texts, received {received} vectors")]
    BatchMismatch { sent: usize, received: usize },

    /// The classifier could not score a record
    #[error("Classification failed: {0}")]
    Classification(String),
}

/// Result type for feature extraction operations
pub type Result<T> = std::result::Result<T, FeatureError>;
