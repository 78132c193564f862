//! Error types for Tomascan

/// Result type alias using Tomascan's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Tomascan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing input (empty payload, undecodable image, empty message)
    #[error("validation error: {0}")]
    Validation(String),

    /// Classification succeeded but the top class is not a known tomato class
    #[error("prediction is outside the supported tomato classes (confidence {confidence:.3})")]
    OutOfDomain {
        /// Confidence the model assigned to the unmapped class
        confidence: f32,
    },

    /// A service was never constructed or its backend failed to initialize
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Local model inference errors
    #[error("inference error: {0}")]
    Inference(String),

    /// The hosted inference endpoint reported a hard failure
    #[error("remote inference error: {0}")]
    RemoteInference(String),

    /// The network call itself could not complete (timeout, DNS, refused)
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Chat completion errors
    #[error("chat error: {0}")]
    Chat(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new remote inference error
    pub fn remote_inference(msg: impl Into<String>) -> Self {
        Self::RemoteInference(msg.into())
    }

    /// Create a new connectivity error
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Create a new chat error
    pub fn chat(msg: impl Into<String>) -> Self {
        Self::Chat(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
