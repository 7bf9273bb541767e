//! The assistant's service facade.
//!
//! [`AiService`] owns the registry, the settings store and the active client
//! set. Front ends construct one at startup and hand its [`ClientHandle`] to
//! the query pipeline.

pub mod clients;

pub use clients::{ClientHandle, ModelClients};

use crate::config::{SettingsStore, validate_model_config};
use crate::error::{ConfigError, CoreError};
use crate::model_client::{ModelClient, RetryingClient};
use crate::registry::{ModelRegistry, supported_models};
use crate::token_estimator::{ProjectTokenCount, TokenEstimator};

use common::{ErrorLocation, RedactedApiKey};

use models::{ModelConfig, ModelPricing, ModelResponse, SupportedModel, TokenDirection};

use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock};

pub struct AiService {
    registry: ModelRegistry,
    store: SettingsStore,
    clients: ClientHandle,
    estimator: RwLock<TokenEstimator>,
    reload: Mutex<()>,
    max_retries: u32,
}

impl AiService {
    /// Fails when the registry cannot build or price every catalog entry.
    pub fn new(registry: ModelRegistry, store: SettingsStore) -> Result<Self, CoreError> {
        registry.validate()?;
        Ok(Self {
            registry,
            store,
            clients: ClientHandle::new(),
            estimator: RwLock::new(TokenEstimator::default()),
            reload: Mutex::new(()),
            max_retries: 0,
        })
    }

    /// Wrap every built client in a [`RetryingClient`]. Zero disables retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn client_handle(&self) -> ClientHandle {
        self.clients.clone()
    }

    pub fn supported_models(&self) -> Vec<SupportedModel> {
        supported_models()
    }

    // ============================================
    // CONFIGURATION
    // ============================================

    /// Load the stored configuration and build its clients.
    ///
    /// Returns `false` when nothing usable is stored. An incomplete record is
    /// logged and left inactive rather than failing startup.
    pub async fn load(&self) -> Result<bool, CoreError> {
        let _guard = self.reload.lock().await;

        let Some(config) = self.store.load_model_config()? else {
            return Ok(false);
        };

        if let Err(e) = validate_model_config(&config) {
            warn!("Stored model configuration is incomplete: {e}");
            return Ok(false);
        }

        let clients = self.build_clients(config)?;
        self.clients.swap(clients).await;
        Ok(true)
    }

    /// Validate, build clients, persist, then activate.
    ///
    /// Nothing is written and the active clients are untouched if any step
    /// before the swap fails.
    pub async fn save_config(&self, config: ModelConfig) -> Result<(), CoreError> {
        let _guard = self.reload.lock().await;

        validate_model_config(&config)?;
        let clients = self.build_clients(config)?;
        self.store.save_model_config(&clients.config)?;
        self.clients.swap(clients).await;

        info!("Model configuration saved");
        Ok(())
    }

    /// Copy of the active configuration. Keys stay redacted in `Debug` output.
    pub async fn config(&self) -> Option<ModelConfig> {
        self.clients.snapshot().await.map(|c| c.config.clone())
    }

    pub async fn is_configured(&self) -> bool {
        self.clients
            .snapshot()
            .await
            .is_some_and(|c| c.config.is_configured())
    }

    fn build_clients(&self, config: ModelConfig) -> Result<ModelClients, ConfigError> {
        let primary = self.create_client(&config.primary_model_id, &config.primary_api_key)?;

        if config.use_same_model_for_both {
            return Ok(ModelClients::shared(config, primary));
        }

        let secondary =
            self.create_client(&config.secondary_model_id, &config.secondary_api_key)?;
        Ok(ModelClients::new(config, primary, secondary))
    }

    #[track_caller]
    fn create_client(
        &self,
        model_id: &str,
        api_key: &RedactedApiKey,
    ) -> Result<Arc<dyn ModelClient>, ConfigError> {
        debug!("Building client for {model_id} (key length {})", api_key.len());

        let client = self
            .registry
            .create_client(model_id, api_key)
            .map_err(|e| ConfigError::ClientInit {
                location: ErrorLocation::from(Location::caller()),
                reason: e.to_string(),
            })?;

        if self.max_retries == 0 {
            return Ok(client);
        }
        Ok(Arc::new(RetryingClient::new(client, self.max_retries)))
    }

    // ============================================
    // MODEL ACCESS
    // ============================================

    async fn active(&self, role: &'static str) -> Result<Arc<ModelClients>, ConfigError> {
        self.clients
            .snapshot()
            .await
            .ok_or_else(|| ConfigError::not_configured(role))
    }

    pub async fn query_primary_model(&self, prompt: &str) -> Result<ModelResponse, CoreError> {
        let clients = self.active("Primary").await?;
        Ok(clients.primary.query(prompt).await?)
    }

    pub async fn query_secondary_model(&self, prompt: &str) -> Result<ModelResponse, CoreError> {
        let clients = self.active("Secondary").await?;
        Ok(clients.secondary.query(prompt).await?)
    }

    /// `false` when no model is configured.
    pub async fn test_primary_model(&self) -> bool {
        match self.clients.snapshot().await {
            Some(clients) => clients.primary.test_connection().await,
            None => false,
        }
    }

    pub async fn test_secondary_model(&self) -> bool {
        match self.clients.snapshot().await {
            Some(clients) => clients.secondary.test_connection().await,
            None => false,
        }
    }

    pub async fn primary_model_pricing(&self) -> Result<ModelPricing, CoreError> {
        let clients = self.active("Primary").await?;
        Ok(clients.primary.pricing()?)
    }

    pub async fn secondary_model_pricing(&self) -> Result<ModelPricing, CoreError> {
        let clients = self.active("Secondary").await?;
        Ok(clients.secondary.pricing()?)
    }

    /// Cost of `token_count` tokens at the primary model's price.
    pub async fn estimate_cost(
        &self,
        token_count: u64,
        direction: TokenDirection,
    ) -> Result<f64, CoreError> {
        let pricing = self.primary_model_pricing().await?;
        Ok(pricing.estimate_cost(token_count, direction))
    }

    // ============================================
    // TOKENS
    // ============================================

    pub async fn analyze_project_tokens(&self, root: PathBuf) -> Result<ProjectTokenCount, CoreError> {
        let estimator = self.estimator.read().await.clone();
        let counted =
            tokio::task::spawn_blocking(move || estimator.project_token_count(&root))
                .await
                .map_err(crate::error::TokenError::from)??;
        Ok(counted)
    }

    /// Returns `false` when the extension was already counted.
    pub async fn add_custom_code_extension(&self, ext: &str) -> bool {
        self.estimator.write().await.add_code_extension(ext)
    }

    pub async fn count_tokens(&self, text: &str) -> Result<u64, CoreError> {
        Ok(self.estimator.read().await.count_tokens(text)?)
    }
}
