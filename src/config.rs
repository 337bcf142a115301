//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Number of bodies sent to the embedder per batched call
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Tunables for [`crate::FeaturePipeline`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bodies per `encode_batch` call. Zero sends the whole batch at once.
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Chunk length to use for a batch of `total` bodies
    #[must_use]
    pub const fn chunk_len(&self, total: usize) -> usize {
        if self.batch_size == 0 {
            if total == 0 { 1 } else { total }
        } else {
            self.batch_size
        }
    }
}
