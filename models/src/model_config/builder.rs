use crate::error::model_error::ModelError;
use crate::{ErrorLocation, ModelConfig};

use common::RedactedApiKey;

use std::panic::Location;

/// Builder for validated [`ModelConfig`] values.
///
/// Checks shape only (required fields, non-empty keys). Whether the model ids
/// are in the supported catalog is decided by the registry in seeker-core.
#[derive(Debug, Default)]
pub struct ModelConfigBuilder {
    primary_model_id: Option<String>,
    secondary_model_id: Option<String>,
    primary_api_key: Option<RedactedApiKey>,
    secondary_api_key: Option<RedactedApiKey>,
    use_same_model_for_both: bool,
}

impl ModelConfigBuilder {
    pub fn with_primary_model(mut self, model_id: impl Into<String>) -> Self {
        self.primary_model_id = Some(model_id.into());
        self
    }

    pub fn with_secondary_model(mut self, model_id: impl Into<String>) -> Self {
        self.secondary_model_id = Some(model_id.into());
        self
    }

    pub fn with_primary_api_key(mut self, key: impl Into<String>) -> Self {
        self.primary_api_key = Some(RedactedApiKey::new(key));
        self
    }

    pub fn with_secondary_api_key(mut self, key: impl Into<String>) -> Self {
        self.secondary_api_key = Some(RedactedApiKey::new(key));
        self
    }

    pub fn with_same_model_for_both(mut self, same: bool) -> Self {
        self.use_same_model_for_both = same;
        self
    }

    /// Build the ModelConfig with validation.
    #[track_caller]
    pub fn build(self) -> Result<ModelConfig, ModelError> {
        let primary_model_id = self.primary_model_id.ok_or_else(|| ModelError::Validation {
            message: String::from("Primary model is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if primary_model_id.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Primary model cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let primary_api_key = self.primary_api_key.unwrap_or_default();
        if primary_api_key.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Primary model API key is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.use_same_model_for_both {
            return Ok(ModelConfig {
                secondary_model_id: primary_model_id.clone(),
                secondary_api_key: primary_api_key.clone(),
                primary_model_id,
                primary_api_key,
                use_same_model_for_both: true,
            });
        }

        let secondary_model_id = self.secondary_model_id.ok_or_else(|| ModelError::Validation {
            message: String::from("Secondary model is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if secondary_model_id.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Secondary model cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let secondary_api_key = self.secondary_api_key.unwrap_or_default();
        if secondary_api_key.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Secondary model API key is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(ModelConfig {
            primary_model_id,
            secondary_model_id,
            primary_api_key,
            secondary_api_key,
            use_same_model_for_both: false,
        })
    }
}
