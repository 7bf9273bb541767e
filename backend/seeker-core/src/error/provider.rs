//! Errors raised by model provider clients.
//!
//! - HTTP status codes stored directly (not parsed from strings)
//! - `is_retryable()` uses the error category, never message content
//! - `#[track_caller]` constructors capture where the failure was raised

use common::{ErrorLocation, HttpStatusCode};

use models::Provider;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Response bodies kept in status errors are capped at this many bytes.
pub const MAX_ERROR_BODY_BYTES: usize = 512;

#[derive(Debug, ThisError)]
pub enum ProviderError {
    #[error("{provider} API error: HTTP {status_code} {status_text} - {body} {location}")]
    Status {
        provider: Provider,
        status_code: HttpStatusCode,
        status_text: String,
        body: String,
        location: ErrorLocation,
    },

    #[error("{provider} network error: {message} {location}")]
    Network {
        provider: Provider,
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("{provider} response is missing {expected} {location}")]
    MalformedEnvelope {
        provider: Provider,
        expected: &'static str,
        location: ErrorLocation,
    },

    #[error("{provider} returned invalid JSON: {message} {location}")]
    Json {
        provider: Provider,
        message: String,
        location: ErrorLocation,
    },

    #[error("{provider} request timed out after {timeout_secs}s {location}")]
    Timeout {
        provider: Provider,
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl ProviderError {
    /// Categorize a transport failure before it is flattened into a string.
    #[track_caller]
    pub fn from_reqwest(provider: Provider, error: &reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return ProviderError::Status {
                provider,
                status_code: HttpStatusCode(status.as_u16()),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: error.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        ProviderError::Network {
            provider,
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn from_status(provider: Provider, status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        ProviderError::Status {
            provider,
            status_code: HttpStatusCode(status.as_u16()),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: truncate_body(body.into(), MAX_ERROR_BODY_BYTES),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed(provider: Provider, expected: &'static str) -> Self {
        ProviderError::MalformedEnvelope {
            provider,
            expected,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(provider: Provider, timeout_secs: u64) -> Self {
        ProviderError::Timeout {
            provider,
            timeout_secs,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network {
                is_timeout,
                is_connection,
                ..
            } => *is_timeout || *is_connection,
            ProviderError::Status { status_code, .. } => status_code.is_retryable(),
            ProviderError::Timeout { .. } => true,
            ProviderError::MalformedEnvelope { .. } => false,
            ProviderError::Json { .. } => false,
            ProviderError::UrlParse { .. } => false,
        }
    }

    pub fn provider(&self) -> Option<Provider> {
        match self {
            ProviderError::Status { provider, .. }
            | ProviderError::Network { provider, .. }
            | ProviderError::MalformedEnvelope { provider, .. }
            | ProviderError::Json { provider, .. }
            | ProviderError::Timeout { provider, .. } => Some(*provider),
            ProviderError::UrlParse { .. } => None,
        }
    }

    /// Operator-facing remedy, when one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ProviderError::Status { status_code, .. } => status_code.hint(),
            ProviderError::Network {
                is_connection: true,
                ..
            } => Some("check network access and the provider base URL"),
            ProviderError::Timeout { .. } => Some("the call timeout can be raised with --timeout"),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status_code, .. } => Some(status_code.0),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ProviderError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ProviderError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Cut `body` to at most `max` bytes on a char boundary, marking the cut.
fn truncate_body(mut body: String, max: usize) -> String {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push_str("... [truncated]");
    body
}
