//! Provider API keys with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use serde::{Deserialize, Deserializer, Serializer};
use zeroize::Zeroize;

/// An API key that never exposes its value in logs or debug output.
///
/// Plain `Serialize` always fails. Persisting a key requires opting in with
/// `#[serde(serialize_with = "common::redacted_key::serialize_exposed")]`.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedApiKey {
    inner: String,
}

impl RedactedApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { inner: key.into() }
    }

    /// Wrap a key, rejecting blank input.
    #[track_caller]
    pub fn try_new(key: impl Into<String>) -> Result<Self, RedactError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(RedactError::Empty {
                message: String::from("API key cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self::new(trimmed))
    }

    /// The raw key, for request headers only.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl Default for RedactedApiKey {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedApiKey([REDACTED])")
    }
}

impl fmt::Display for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED API KEY]")
    }
}

impl Drop for RedactedApiKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedApiKey {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from(
                "RedactedApiKey cannot be serialized - use serialize_exposed explicitly",
            ),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}

impl<'de> Deserialize<'de> for RedactedApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(RedactedApiKey::new)
    }
}

/// Serialize the raw key. Only for the settings store.
pub fn serialize_exposed<S>(key: &RedactedApiKey, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(key.as_str())
}
