use super::ModelClient;
use crate::error::{ProviderError, RegistryError};

use models::{ModelPricing, ModelResponse, Provider};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{trace, warn};
use tokio::time::sleep as TokioSleep;

const RETRY_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
const RETRY_MAX_ELAPSED: Duration = Duration::from_secs(30);

/// Retries transient provider failures with exponential backoff.
///
/// Only errors reporting [`ProviderError::is_retryable`] are retried. Auth
/// failures and malformed envelopes are returned on the first attempt.
pub struct RetryingClient {
    inner: Arc<dyn ModelClient>,
    max_retries: u32,
    initial_interval: Duration,
}

impl RetryingClient {
    pub fn new(inner: Arc<dyn ModelClient>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            initial_interval: RETRY_INITIAL_INTERVAL,
        }
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[async_trait]
impl ModelClient for RetryingClient {
    fn provider(&self) -> Provider {
        self.inner.provider()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn query(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_elapsed_time: Some(RETRY_MAX_ELAPSED),
            ..Default::default()
        };
        let mut attempt = 0;

        loop {
            match self.inner.query(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(e);
                    };
                    attempt += 1;
                    warn!(
                        "{} query failed (attempt {attempt}/{}), retrying in {delay:?}: {e}",
                        self.inner.model_id(),
                        self.max_retries
                    );
                    TokioSleep(delay).await;
                }
                Err(e) => {
                    trace!("{} query failed without retry: {e}", self.inner.model_id());
                    return Err(e);
                }
            }
        }
    }

    fn pricing(&self) -> Result<ModelPricing, RegistryError> {
        self.inner.pricing()
    }
}
