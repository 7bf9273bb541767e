//! HTTP status classification for provider failures.

use std::fmt::{Display, Formatter, Result as FormatResult};

/// Anthropic answers 529 when the API is overloaded.
pub const STATUS_OVERLOADED: u16 = 529;

/// Status code returned by a model provider, kept as a number so retry and
/// reporting decisions never depend on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.0, 401 | 403)
    }

    /// Provider asked the caller to slow down.
    pub fn is_rate_limited(&self) -> bool {
        self.0 == 429 || self.0 == STATUS_OVERLOADED
    }

    /// Timeouts, rate limits and transient provider failures.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limited() || matches!(self.0, 408 | 500 | 502 | 503 | 504)
    }

    /// Short remedy for an operator reading the failure.
    pub fn hint(&self) -> Option<&'static str> {
        match self.0 {
            401 | 403 => Some("check the API key for this model"),
            404 => Some("check the provider base URL"),
            429 => Some("rate limited; retry later or pass --retries"),
            STATUS_OVERLOADED => Some("provider overloaded; retry later or pass --retries"),
            500..=599 => Some("provider-side failure; retry later"),
            _ => None,
        }
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl Display for HttpStatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "{}", self.0)
    }
}
