//! Service registry
//!
//! Owns the lazily-constructed service singletons. Each service is built
//! at most once per registry generation; concurrent first callers wait on
//! the slot lock instead of racing duplicate constructions.

use crate::config::ServerConfig;
use crate::services::{DiseaseService, LlmService};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A lazily-initialized singleton slot.
///
/// The lock is held across construction, so only one caller builds the
/// value while the rest wait and then share the same `Arc`. The builder
/// may block (model weights are mmapped or downloaded), so it runs on the
/// blocking pool rather than stalling an executor thread.
struct Slot<T> {
    inner: Mutex<Option<Arc<T>>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    async fn get_or_init<F>(&self, build: F) -> Arc<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.inner.lock().await;
        if let Some(existing) = guard.as_ref() {
            return Arc::clone(existing);
        }

        let built = tokio::task::spawn_blocking(build)
            .await
            .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()));
        let built = Arc::new(built);
        *guard = Some(Arc::clone(&built));
        built
    }

    async fn clear(&self) {
        *self.inner.lock().await = None;
    }
}

/// Availability report for one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
}

impl ServiceStatus {
    fn from_available(available: bool) -> Self {
        Self {
            status: if available { "available" } else { "unavailable" },
        }
    }
}

/// Combined availability report across all registered services.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub llm: ServiceStatus,
    pub disease: ServiceStatus,
    pub overall: &'static str,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.overall == "healthy"
    }
}

/// Registry of service singletons, shared across request handlers.
pub struct ServiceRegistry {
    config: ServerConfig,
    llm: Slot<LlmService>,
    disease: Slot<DiseaseService>,
}

impl ServiceRegistry {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            llm: Slot::empty(),
            disease: Slot::empty(),
        }
    }

    /// Eagerly construct every service. Optional; services also build on
    /// first use.
    pub async fn initialize(&self) {
        info!("initializing services");
        let _ = self.llm().await;
        let _ = self.disease().await;
    }

    /// The chat service singleton.
    pub async fn llm(&self) -> Arc<LlmService> {
        let config = self.config.llm.clone();
        self.llm
            .get_or_init(move || LlmService::from_config(&config))
            .await
    }

    /// The disease detection service singleton.
    pub async fn disease(&self) -> Arc<DiseaseService> {
        let config = self.config.disease.clone();
        self.disease
            .get_or_init(move || DiseaseService::from_config(&config))
            .await
    }

    /// Report availability of every service. Forces construction of any
    /// service not yet built.
    pub async fn health_check(&self) -> HealthReport {
        let llm_available = self.llm().await.is_available();
        let disease_available = self.disease().await.is_available();

        HealthReport {
            llm: ServiceStatus::from_available(llm_available),
            disease: ServiceStatus::from_available(disease_available),
            overall: if llm_available && disease_available {
                "healthy"
            } else {
                "degraded"
            },
        }
    }

    /// Drop all constructed services. The next access rebuilds them from
    /// the current configuration.
    pub async fn shutdown(&self) {
        info!("shutting down services");
        self.llm.clear().await;
        self.disease.clear().await;
    }
}
