// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Spam Features
//!
//! Turns raw RFC 822-shaped email text into a fixed-shape numeric feature
//! record for a spam classifier.
//!
//! # Features
//!
//! - Blank-line header/body split and line-anchored header lookup
//! - Fourteen header signals (routing hops, sender domain mismatches,
//!   Message-ID shape, subject, recipients, content type, list headers)
//! - Naive tag stripping and whitespace cleanup of the body
//! - Pluggable body embedding with a runtime-reported dimension
//! - Ordered batch extraction, with optional per-email failure isolation
//! - A classifier seam for consuming a fitted model
//!
//! Header folding, MIME decoding and real HTML parsing are intentionally
//! not performed.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use email_features::{FeaturePipeline, HashingEmbedder};
//!
//! let embedder = Arc::new(HashingEmbedder::new(8).unwrap());
//! let pipeline = FeaturePipeline::new(embedder);
//!
//! let raw = "From: sender@example.com\nSubject: Re: lunch\n\n<p>See you at noon</p>";
//! let record = pipeline.transform(raw).unwrap();
//!
//! assert_eq!(record.get("subject_starts_with_re_fwd"), Some(1.0));
//! assert_eq!(record.len(), 14 + 8);
//! ```

mod body;
mod classifier;
mod config;
mod embedding;
mod error;
mod features;
mod header;
mod pipeline;
mod types;

pub use body::normalize_body;
pub use classifier::{Classification, Classifier, LinearClassifier, SpamFilter, Verdict};
pub use config::{DEFAULT_BATCH_SIZE, PipelineConfig};
pub use embedding::{Embedder, EmbeddingError, HashingEmbedder};
pub use error::{FeatureError, Result};
pub use features::*;
pub use header::{count_addresses, domain_of, header_value, split_email};
pub use pipeline::FeaturePipeline;
pub use types::*;
