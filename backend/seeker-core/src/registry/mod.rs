//! Model catalog and provider dispatch.
//!
//! Each catalog entry names its [`Provider`] explicitly; building a client is a
//! match on that enum rather than on identifier prefixes. [`ModelRegistry::validate`]
//! runs once at startup and checks every catalog entry has an endpoint and a price.

pub mod catalog;
pub mod pricing;

pub use catalog::{DEFAULT_MODEL, is_model_supported, model_by_id, supported_models};
pub use pricing::pricing_for;

use crate::error::RegistryError;
use crate::model_client::anthropic::{ANTHROPIC_API_BASE_URL, AnthropicClient};
use crate::model_client::deepseek::{DEEPSEEK_API_BASE_URL, DeepseekClient};
use crate::model_client::{DEFAULT_REQUEST_TIMEOUT, ModelClient};

use common::{ErrorLocation, RedactedApiKey};

use models::Provider;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

/// Maps catalog identifiers to concrete provider clients.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    endpoints: HashMap<Provider, String>,
    request_timeout: Duration,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let endpoints = HashMap::from([
            (Provider::Anthropic, ANTHROPIC_API_BASE_URL.to_string()),
            (Provider::Deepseek, DEEPSEEK_API_BASE_URL.to_string()),
        ]);
        Self {
            endpoints,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ModelRegistry {
    /// Registry with no provider endpoints; add them with [`with_endpoint`](Self::with_endpoint).
    pub fn empty() -> Self {
        Self {
            endpoints: HashMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Point a provider at a different base URL (proxy, mock server).
    pub fn with_endpoint(mut self, provider: Provider, base_url: impl Into<String>) -> Self {
        self.endpoints.insert(provider, base_url.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Check that every catalog entry can be built and priced.
    #[track_caller]
    pub fn validate(&self) -> Result<(), RegistryError> {
        for model in catalog::SUPPORTED_MODELS.iter() {
            if !self.endpoints.contains_key(&model.provider) {
                return Err(RegistryError::NoImplementation {
                    model_id: model.id.to_string(),
                    provider: model.provider,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            pricing_for(model.id)?;
        }
        Ok(())
    }

    #[track_caller]
    pub fn create_client(
        &self,
        model_id: &str,
        api_key: &RedactedApiKey,
    ) -> Result<Arc<dyn ModelClient>, RegistryError> {
        let model = model_by_id(model_id).ok_or_else(|| RegistryError::UnsupportedModel {
            model_id: model_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let base_url =
            self.endpoints
                .get(&model.provider)
                .ok_or_else(|| RegistryError::NoImplementation {
                    model_id: model_id.to_string(),
                    provider: model.provider,
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let client_init = |message: String| RegistryError::ClientInit {
            provider: model.provider,
            message,
            location: ErrorLocation::from(Location::caller()),
        };

        debug!("Creating {} client for {}", model.provider, model.id);

        let client: Arc<dyn ModelClient> = match model.provider {
            Provider::Anthropic => Arc::new(
                AnthropicClient::with_base_url(
                    api_key.clone(),
                    model.id,
                    base_url,
                    self.request_timeout,
                )
                .map_err(|e| client_init(e.to_string()))?,
            ),
            Provider::Deepseek => Arc::new(
                DeepseekClient::with_base_url(
                    api_key.clone(),
                    model.id,
                    base_url,
                    self.request_timeout,
                )
                .map_err(|e| client_init(e.to_string()))?,
            ),
        };

        Ok(client)
    }
}
