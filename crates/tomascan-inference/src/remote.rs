//! Hosted inference API backend
//!
//! Sends raw image bytes to a Hugging Face inference endpoint over HTTPS
//! and translates its three response shapes (score list, warm-up notice,
//! error object) into structured outcomes.

use crate::backend::InferenceBackend;
use crate::preprocess;
use async_trait::async_trait;
use std::time::Duration;
use tomascan_core::{Error, InferenceOutput, Result, ScoredLabel};
use tracing::debug;

/// Default plant-disease identification model endpoint.
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/linkanjarad/mobilenet_v2_1.0_224-plant-disease-identification";

/// Default timeout for inference calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the hosted inference endpoint.
pub struct RemoteClassifier {
    http: reqwest::Client,
    model_url: String,
    api_token: String,
}

impl RemoteClassifier {
    /// Create a new client with an explicit request timeout.
    pub fn new(
        api_token: impl Into<String>,
        model_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            model_url: model_url.into(),
            api_token: api_token.into(),
        })
    }
}

#[async_trait]
impl InferenceBackend for RemoteClassifier {
    async fn infer(&self, image_bytes: &[u8]) -> Result<InferenceOutput> {
        let content_type = preprocess::sniff_content_type(image_bytes);

        let response = self
            .http
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", content_type)
            .body(image_bytes.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::connectivity("inference API request timed out")
                } else {
                    Error::connectivity(format!("failed to reach inference API: {e}"))
                }
            })?;

        debug!(status = %response.status(), content_type, "inference API response");

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::connectivity(format!("failed to read inference response: {e}")))?;

        parse_inference_response(&body)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Parse the inference endpoint's JSON body.
///
/// An error object whose message starts with "Model" means the model is
/// still warming up and is reported as `Loading`, not as a failure.
pub(crate) fn parse_inference_response(body: &[u8]) -> Result<InferenceOutput> {
    if body.is_empty() {
        return Err(Error::remote_inference("empty response from inference API"));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| Error::remote_inference("invalid JSON from inference API"))?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        if message.starts_with("Model") {
            return Ok(InferenceOutput::Loading(message.to_string()));
        }
        return Err(Error::remote_inference(format!("model error: {message}")));
    }

    let labels: Vec<ScoredLabel> = serde_json::from_value(value)
        .map_err(|e| Error::remote_inference(format!("unexpected response shape: {e}")))?;

    Ok(InferenceOutput::Scores(labels))
}
