//! Common types shared across the detection pipeline

use serde::{Deserialize, Serialize};

/// A labeled class score, the canonical unit both inference backends produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    /// Class label as reported by the model
    pub label: String,

    /// Probability assigned to this class (0.0-1.0)
    pub score: f32,
}

impl ScoredLabel {
    /// Create a new scored label
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// A scored label enriched with knowledge-base text where available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPrediction {
    /// Class label as reported by the model
    pub label: String,

    /// Probability assigned to this class (0.0-1.0)
    pub score: f32,

    /// Short disease description from the knowledge base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Treatment advice from the knowledge base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

impl From<ScoredLabel> for EnrichedPrediction {
    fn from(scored: ScoredLabel) -> Self {
        Self {
            label: scored.label,
            score: scored.score,
            description: None,
            treatment: None,
        }
    }
}

/// Structured outcome of a single backend inference call.
///
/// Callers branch on this enum; a warming-up model is a distinct state,
/// not an error message to be inspected.
#[derive(Debug, Clone)]
pub enum InferenceOutput {
    /// Class scores produced by the model
    Scores(Vec<ScoredLabel>),

    /// The hosted model is still warming up; not an error
    Loading(String),
}

/// Final outcome of the detection pipeline, ready for the HTTP layer.
#[derive(Debug, Clone)]
pub enum Detection {
    /// Filtered, enriched predictions
    Predictions(Vec<EnrichedPrediction>),

    /// The hosted model is still warming up (202-equivalent)
    Loading(String),
}
