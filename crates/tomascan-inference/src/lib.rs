//! Tomascan Inference
//!
//! Disease-inference pipeline: image normalization, interchangeable
//! inference backends (locally loaded Candle classifier or hosted
//! inference API), and the detector that composes them with domain
//! filtering and knowledge-base enrichment.

pub mod backend;
pub mod detector;
pub mod local;
pub mod preprocess;
pub mod remote;

pub use backend::InferenceBackend;
pub use detector::DiseaseDetector;
pub use local::{DeviceType, LocalClassifier, LocalModelConfig, ModelSource};
pub use preprocess::{decode_image_payload, normalize_image, sniff_content_type};
pub use remote::{RemoteClassifier, DEFAULT_MODEL_URL};
