//! Tomascan Core
//!
//! Shared building blocks for the Tomascan backend.
//!
//! This crate provides:
//! - Common types for class scores, predictions, and detection outcomes
//! - Error types and result handling
//! - The raw-index to canonical tomato-disease label table
//! - The static disease knowledge base used for result enrichment

pub mod error;
pub mod knowledge;
pub mod taxonomy;
pub mod types;

pub use error::{Error, Result};
pub use types::{Detection, EnrichedPrediction, InferenceOutput, ScoredLabel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Detection, EnrichedPrediction, InferenceOutput, ScoredLabel};
}
