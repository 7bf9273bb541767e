use super::{CompletionRequest, ModelClient, build_http_client, send_json};
use crate::error::ProviderError;

use common::{ErrorLocation, RedactedApiKey};

use models::{ModelResponse, Provider};

use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const ANTHROPIC_API_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_ENDPOINT: &str = "v1/messages";
const API_KEY_HEADER: &str = "x-api-key";
const VERSION_HEADER: &str = "anthropic-version";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Default, Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Client for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    endpoint: Url,
    api_key: RedactedApiKey,
    model_id: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(api_key: RedactedApiKey, model_id: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            model_id,
            ANTHROPIC_API_BASE_URL,
            super::DEFAULT_REQUEST_TIMEOUT,
        )
    }

    #[track_caller]
    pub fn with_base_url(
        api_key: RedactedApiKey,
        model_id: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&with_trailing_slash(base_url))?.join(MESSAGES_ENDPOINT)?;
        let client = build_http_client(timeout).map_err(|e| ProviderError::Network {
            provider: Provider::Anthropic,
            message: e.to_string(),
            is_timeout: false,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model_id: model_id.into(),
            timeout,
        })
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn query(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        debug!(
            "Anthropic request: model={}, prompt_chars={}",
            self.model_id,
            prompt.len()
        );

        let request = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(VERSION_HEADER, API_VERSION)
            .json(&CompletionRequest::single_turn(&self.model_id, prompt));

        let envelope: MessagesEnvelope =
            send_json(Provider::Anthropic, request, self.timeout).await?;

        let content = envelope
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::malformed(Provider::Anthropic, "content[].text"))?;

        Ok(ModelResponse {
            content,
            model_used: self.model_id.clone(),
            token_count: envelope
                .usage
                .map(|usage| usage.input_tokens + usage.output_tokens),
        })
    }
}

pub(crate) fn with_trailing_slash(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}
