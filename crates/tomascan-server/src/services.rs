//! Service wrappers
//!
//! Each wrapper owns the optional inner handle for one capability.
//! Construction failures are downgraded to an unavailable service instead
//! of aborting startup, so the other capability keeps serving.

use crate::config::{BackendKind, DiseaseConfig, LlmConfig};
use std::sync::Arc;
use std::time::Duration;
use tomascan_core::{Detection, Error, Result};
use tomascan_inference::{
    decode_image_payload, DeviceType, DiseaseDetector, InferenceBackend, LocalClassifier,
    LocalModelConfig, ModelSource, RemoteClassifier,
};
use tomascan_llm::{ChatClient, ChatSettings, SuggestionLanguage};
use tracing::{error, info, warn};

/// Chat assistant service.
pub struct LlmService {
    client: Option<ChatClient>,
}

impl LlmService {
    /// Construct from configuration, downgrading failures to unavailable.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = match config.api_key.as_deref() {
            Some(api_key) if !api_key.is_empty() => {
                let settings = ChatSettings {
                    model: config.model.clone(),
                    temperature: config.temperature,
                    max_tokens: config.max_tokens,
                };
                match ChatClient::new(api_key, settings) {
                    Ok(client) => {
                        info!("LLM service initialized");
                        Some(client)
                    }
                    Err(e) => {
                        error!("failed to initialize LLM service: {e}");
                        None
                    }
                }
            }
            _ => {
                warn!("no API key configured for LLM service");
                None
            }
        };

        Self { client }
    }

    /// Whether the underlying client was constructed successfully.
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&ChatClient> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::unavailable("LLM service is not available"))
    }

    /// Respond to a forum chat message.
    pub async fn chat_response(&self, user_message: &str) -> Result<String> {
        self.client()?.chat_response(user_message).await
    }

    /// Detailed information about a detected disease.
    pub async fn disease_info(&self, disease_name: &str) -> Result<String> {
        self.client()?.disease_info(disease_name).await
    }

    /// Treatment suggestions for a detected disease.
    pub async fn treatment_suggestion(
        &self,
        disease_name: &str,
        language: SuggestionLanguage,
    ) -> Result<String> {
        self.client()?
            .treatment_suggestion(disease_name, language)
            .await
    }
}

/// Disease detection service.
pub struct DiseaseService {
    detector: Option<DiseaseDetector>,
}

impl DiseaseService {
    /// Construct the configured backend, downgrading failures to
    /// unavailable. Availability is decided here, once, for the lifetime
    /// of the registry generation.
    pub fn from_config(config: &DiseaseConfig) -> Self {
        match build_backend(config) {
            Ok(backend) => {
                info!(backend = backend.name(), "disease service initialized");
                Self {
                    detector: Some(DiseaseDetector::new(backend)),
                }
            }
            Err(e) => {
                error!("failed to initialize disease service: {e}");
                Self { detector: None }
            }
        }
    }

    /// Whether the backend was constructed successfully.
    pub fn is_available(&self) -> bool {
        self.detector.is_some()
    }

    fn detector(&self) -> Result<&DiseaseDetector> {
        self.detector
            .as_ref()
            .ok_or_else(|| Error::unavailable("Disease detection service is not available"))
    }

    /// Detect disease from raw image bytes.
    pub async fn detect(&self, image_bytes: &[u8]) -> Result<Detection> {
        self.detector()?.detect(image_bytes).await
    }

    /// Detect disease from a base64 payload (optionally a data URI).
    pub async fn detect_payload(&self, payload: &str) -> Result<Detection> {
        let detector = self.detector()?;
        let image_bytes = decode_image_payload(payload)?;
        detector.detect(&image_bytes).await
    }
}

fn build_backend(config: &DiseaseConfig) -> Result<Arc<dyn InferenceBackend>> {
    match config.backend {
        BackendKind::Remote => {
            let api_token = config
                .api_token
                .as_deref()
                .filter(|token| !token.is_empty())
                .ok_or_else(|| Error::config("HUGGINGFACE_API_KEY not configured"))?;

            let classifier = RemoteClassifier::new(
                api_token,
                config.model_url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(classifier))
        }
        BackendKind::Local => {
            let model_path = config
                .model_path
                .clone()
                .ok_or_else(|| Error::config("model_path is required for the local backend"))?;

            let classifier = LocalClassifier::load(&LocalModelConfig {
                source: ModelSource::LocalPath(model_path),
                input_size: config.input_size,
                device: DeviceType::Cpu,
            })?;
            Ok(Arc::new(classifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomascan_core::Error;

    #[test]
    fn test_llm_service_without_key_is_unavailable() {
        let service = LlmService::from_config(&LlmConfig::default());
        assert!(!service.is_available());
    }

    #[test]
    fn test_llm_service_with_key_is_available() {
        let config = LlmConfig {
            api_key: Some("gsk_test".to_string()),
            ..Default::default()
        };
        assert!(LlmService::from_config(&config).is_available());
    }

    #[tokio::test]
    async fn test_unavailable_llm_call_fails_fast() {
        let service = LlmService::from_config(&LlmConfig::default());
        assert!(matches!(
            service.chat_response("halo").await,
            Err(Error::Unavailable(_))
        ));
    }

    #[test]
    fn test_disease_service_without_token_is_unavailable() {
        let service = DiseaseService::from_config(&DiseaseConfig::default());
        assert!(!service.is_available());
    }

    #[test]
    fn test_disease_service_remote_with_token_is_available() {
        let config = DiseaseConfig {
            api_token: Some("hf_test".to_string()),
            ..Default::default()
        };
        assert!(DiseaseService::from_config(&config).is_available());
    }

    #[test]
    fn test_disease_service_local_missing_weights_is_unavailable() {
        let config = DiseaseConfig {
            backend: BackendKind::Local,
            model_path: Some("/nonexistent/tomato.safetensors".into()),
            ..Default::default()
        };
        assert!(!DiseaseService::from_config(&config).is_available());
    }

    #[tokio::test]
    async fn test_detect_payload_validates_before_backend() {
        let config = DiseaseConfig {
            api_token: Some("hf_test".to_string()),
            ..Default::default()
        };
        let service = DiseaseService::from_config(&config);
        assert!(matches!(
            service.detect_payload("").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.detect_payload("!!!not base64!!!").await,
            Err(Error::Validation(_))
        ));
    }
}
