//! Inference backend contract

use async_trait::async_trait;
use tomascan_core::{InferenceOutput, Result};

/// Contract shared by the local and remote inference backends.
///
/// Exactly one backend is active per deployment; selection happens once at
/// startup, never as a runtime fallback chain.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Produce class scores for the given raw image bytes.
    async fn infer(&self, image_bytes: &[u8]) -> Result<InferenceOutput>;

    /// Backend name for logs and diagnostics.
    fn name(&self) -> &str;
}
