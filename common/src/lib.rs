//! Shared primitives for the codeseeker workspace.
//!
//! Everything here is dependency-light and used by every other crate:
//!
//! - [`ErrorLocation`]: call-site capture for error values
//! - [`RedactedApiKey`]: provider credentials that never leak into logs
//! - [`HttpStatusCode`]: status classification for provider failures

pub mod error;
pub mod http_status;
pub mod redacted_key;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_key::RedactedApiKey;

#[cfg(test)]
mod tests;
