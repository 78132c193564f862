//! Disease detection orchestration
//!
//! Composes a configured inference backend with the tomato domain filter
//! and knowledge-base enrichment into a single `detect` operation. Both
//! backends feed the same scored-label representation through the same
//! filter and enrichment path.

use crate::backend::InferenceBackend;
use std::sync::Arc;
use tomascan_core::knowledge;
use tomascan_core::{Detection, Error, InferenceOutput, Result, ScoredLabel};
use tracing::{debug, info};

/// The unit registered as the disease service.
pub struct DiseaseDetector {
    backend: Arc<dyn InferenceBackend>,
}

impl DiseaseDetector {
    /// Create a detector over an already-constructed backend.
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Classify an image and enrich the result.
    ///
    /// Empty input is rejected before the backend is consulted.
    pub async fn detect(&self, image_bytes: &[u8]) -> Result<Detection> {
        if image_bytes.is_empty() {
            return Err(Error::validation("Image data cannot be empty"));
        }

        match self.backend.infer(image_bytes).await? {
            InferenceOutput::Loading(message) => {
                info!(backend = self.backend.name(), "model still warming up");
                Ok(Detection::Loading(message))
            }
            InferenceOutput::Scores(labels) => {
                let labels = filter_tomato_labels(labels);
                debug!(count = labels.len(), "labels after domain filter");
                Ok(Detection::Predictions(knowledge::enrich_labels(labels)))
            }
        }
    }
}

/// Keep entries whose label mentions "tomato" (case-insensitive) when any
/// exist; otherwise pass the original list through unchanged.
pub(crate) fn filter_tomato_labels(labels: Vec<ScoredLabel>) -> Vec<ScoredLabel> {
    let tomato: Vec<ScoredLabel> = labels
        .iter()
        .filter(|scored| scored.label.to_lowercase().contains("tomato"))
        .cloned()
        .collect();

    if tomato.is_empty() {
        labels
    } else {
        tomato
    }
}
