use super::anthropic::with_trailing_slash;
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

pub const DEEPSEEK_API_BASE_URL: &str = "https://api.deepseek.com";
const CHAT_COMPLETIONS_ENDPOINT: &str = "v1/chat/completions";

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionEnvelope {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

/// Client for the OpenAI-compatible Deepseek chat completions API.
#[derive(Clone)]
pub struct DeepseekClient {
    client: Client,
    endpoint: Url,
    api_key: RedactedApiKey,
    model_id: String,
    timeout: Duration,
}

impl DeepseekClient {
    pub fn new(api_key: RedactedApiKey, model_id: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            model_id,
            DEEPSEEK_API_BASE_URL,
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
        let endpoint =
            Url::parse(&with_trailing_slash(base_url))?.join(CHAT_COMPLETIONS_ENDPOINT)?;
        let client = build_http_client(timeout).map_err(|e| ProviderError::Network {
            provider: Provider::Deepseek,
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
impl ModelClient for DeepseekClient {
    fn provider(&self) -> Provider {
        Provider::Deepseek
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn query(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        debug!(
            "Deepseek request: model={}, prompt_chars={}",
            self.model_id,
            prompt.len()
        );

        let request = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&CompletionRequest::single_turn(&self.model_id, prompt));

        let envelope: ChatCompletionEnvelope =
            send_json(Provider::Deepseek, request, self.timeout).await?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ProviderError::malformed(Provider::Deepseek, "choices[0].message.content"))?;

        Ok(ModelResponse {
            content,
            model_used: self.model_id.clone(),
            token_count: envelope.usage.map(|usage| usage.total_tokens),
        })
    }
}
