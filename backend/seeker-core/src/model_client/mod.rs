//! Uniform access to remote text-completion providers.
//!
//! Each provider variant turns one prompt into one single-turn request and
//! normalizes the provider's response envelope into a [`ModelResponse`].

pub mod anthropic;
pub mod deepseek;
pub mod retry;

pub use anthropic::AnthropicClient;
pub use deepseek::DeepseekClient;
pub use retry::RetryingClient;

use crate::error::{ProviderError, RegistryError};
use crate::registry::pricing_for;

use models::{ModelPricing, ModelResponse, Provider};

use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Output cap applied to every request.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const CONNECTION_TEST_PROMPT: &str = "Test connection";

const USER_AGENT: &str = const_format::concatcp!("codeseeker/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait ModelClient: Send + Sync {
    fn provider(&self) -> Provider;

    fn model_id(&self) -> &str;

    /// Send one single-turn prompt and return the normalized reply.
    async fn query(&self, prompt: &str) -> Result<ModelResponse, ProviderError>;

    /// Issue a minimal query and report whether it succeeded. Never errors.
    async fn test_connection(&self) -> bool {
        match self.query(CONNECTION_TEST_PROMPT).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Connection test failed for {}: {}", self.model_id(), e);
                false
            }
        }
    }

    fn pricing(&self) -> Result<ModelPricing, RegistryError> {
        pricing_for(self.model_id())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Body shared by both providers' completion endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
    pub max_tokens: u32,
}

impl<'a> CompletionRequest<'a> {
    pub fn single_turn(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send a prepared request and decode the JSON envelope.
///
/// Non-2xx statuses become [`ProviderError::Status`] carrying the status text
/// and body; a body that does not fit `T` is a malformed envelope.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: Provider,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::timeout(provider, timeout.as_secs())
        } else {
            ProviderError::from_reqwest(provider, &e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::from_status(provider, status, body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

    serde_json::from_str(&body).map_err(|e| ProviderError::Json {
        provider,
        message: e.to_string(),
        location: common::ErrorLocation::from(std::panic::Location::caller()),
    })
}
