use crate::model_client::ModelClient;

use models::ModelConfig;

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

/// One consistent set of clients built from one configuration.
pub struct ModelClients {
    pub config: ModelConfig,
    /// Per-file analysis and synthesis.
    pub primary: Arc<dyn ModelClient>,
    /// File discovery. Same client as `primary` when the config says so.
    pub secondary: Arc<dyn ModelClient>,
}

impl ModelClients {
    pub fn new(
        config: ModelConfig,
        primary: Arc<dyn ModelClient>,
        secondary: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            config,
            primary,
            secondary,
        }
    }

    /// Discovery runs on the primary client as well.
    pub fn shared(config: ModelConfig, primary: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            secondary: Arc::clone(&primary),
            primary,
        }
    }
}

/// Shared slot holding the active [`ModelClients`].
///
/// Readers take an `Arc` snapshot and keep it for a whole query, so a reload
/// running concurrently is observed entirely or not at all.
#[derive(Clone, Default)]
pub struct ClientHandle {
    inner: Arc<RwLock<Option<Arc<ModelClients>>>>,
}

impl ClientHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(clients: ModelClients) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Arc::new(clients)))),
        }
    }

    pub async fn snapshot(&self) -> Option<Arc<ModelClients>> {
        self.inner.read().await.clone()
    }

    pub async fn swap(&self, clients: ModelClients) {
        info!(
            "Activating models: primary={}, secondary={}",
            clients.primary.model_id(),
            clients.secondary.model_id()
        );
        *self.inner.write().await = Some(Arc::new(clients));
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn is_set(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
