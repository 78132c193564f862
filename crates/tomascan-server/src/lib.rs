//! TomaScan HTTP backend
//!
//! Serves the tomato-disease detection pipeline and the TomatBot chat
//! assistant over a small JSON API. Services are registered as lazy
//! singletons so a missing credential degrades one capability without
//! taking down the other.

pub mod config;
pub mod registry;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{BackendKind, DiseaseConfig, LlmConfig, ServerConfig};
pub use registry::{HealthReport, ServiceRegistry, ServiceStatus};
pub use routes::create_router;
pub use state::AppState;
