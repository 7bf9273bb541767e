pub mod builder;

use crate::ModelConfigBuilder;

use common::RedactedApiKey;

use serde::{Deserialize, Serialize};

/// Which models answer questions and the keys used to reach them.
///
/// When `use_same_model_for_both` is set the secondary fields are ignored and
/// the primary client doubles as the secondary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub primary_model_id: String,
    #[serde(default)]
    pub secondary_model_id: String,
    #[serde(serialize_with = "common::redacted_key::serialize_exposed")]
    pub primary_api_key: RedactedApiKey,
    #[serde(default, serialize_with = "common::redacted_key::serialize_exposed")]
    pub secondary_api_key: RedactedApiKey,
    #[serde(default)]
    pub use_same_model_for_both: bool,
}

impl ModelConfig {
    pub fn builder() -> ModelConfigBuilder {
        ModelConfigBuilder::default()
    }

    /// Model id actually used for discovery.
    pub fn effective_secondary_model_id(&self) -> &str {
        if self.use_same_model_for_both {
            &self.primary_model_id
        } else {
            &self.secondary_model_id
        }
    }

    /// Key actually used for discovery.
    pub fn effective_secondary_api_key(&self) -> &RedactedApiKey {
        if self.use_same_model_for_both {
            &self.primary_api_key
        } else {
            &self.secondary_api_key
        }
    }

    /// Primary key present, and a secondary key too unless the primary model is reused.
    pub fn is_configured(&self) -> bool {
        !self.primary_api_key.is_empty()
            && (self.use_same_model_for_both || !self.secondary_api_key.is_empty())
    }
}
