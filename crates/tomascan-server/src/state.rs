//! Shared application state

use crate::config::ServerConfig;
use crate::registry::ServiceRegistry;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// State shared by every request handler. Cloning is cheap; the registry
/// and configuration live behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub registry: Arc<ServiceRegistry>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> Self {
        let registry = Arc::new(ServiceRegistry::new(config.clone()));
        Self {
            config: Arc::new(config),
            registry,
            metrics_handle,
        }
    }
}
