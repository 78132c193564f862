//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tomascan_inference::DEFAULT_MODEL_URL;
use tomascan_llm::DEFAULT_MODEL;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Chat assistant settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Disease detection settings
    #[serde(default)]
    pub disease: DiseaseConfig,

    /// Allowed CORS origins; "*" allows any
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from file (when present) and the environment.
    ///
    /// API credentials fall back to `GROQ_API_KEY` and
    /// `HUGGINGFACE_API_KEY` when the file leaves them unset.
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let mut config: Self = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if config.llm.api_key.is_none() {
            config.llm.api_key = non_empty_env("GROQ_API_KEY");
        }
        if config.disease.api_token.is_none() {
            config.disease.api_token = non_empty_env("HUGGINGFACE_API_KEY");
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            disease: DiseaseConfig::default(),
            cors_allowed_origins: default_cors_origins(),
        }
    }
}

/// Chat assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; defaults to the GROQ_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Disease detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Which inference backend to construct at startup
    #[serde(default)]
    pub backend: BackendKind,

    /// Hosted inference API token; defaults to HUGGINGFACE_API_KEY
    #[serde(default)]
    pub api_token: Option<String>,

    /// Hosted inference model endpoint
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Local model weights path (safetensors), required for the local backend
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Square input edge length the local model expects
    #[serde(default = "default_input_size")]
    pub input_size: u32,

    /// Timeout for hosted inference calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            api_token: None,
            model_url: default_model_url(),
            model_path: None,
            input_size: default_input_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Inference backend selection; a configuration-time decision, not a
/// runtime fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Locally loaded Candle classifier
    Local,
    /// Hosted inference API
    #[default]
    Remote,
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_llm_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_model_url() -> String {
    DEFAULT_MODEL_URL.to_string()
}

fn default_input_size() -> u32 {
    256
}

fn default_timeout_secs() -> u64 {
    30
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
