//! Persisted settings and prompt templates.
//!
//! Settings live in `{config_dir}/settings.json`, a versioned key/value
//! document. The model configuration is stored under [`AI_CONFIG_KEY`].

pub mod prompts;

pub use prompts::{PromptTemplate, PromptTemplates, fill_template};

use crate::error::ConfigError;
use crate::registry::{DEFAULT_MODEL, ModelRegistry, is_model_supported};

use common::ErrorLocation;

use models::{ModelConfig, Provider};

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const AI_CONFIG_KEY: &str = "com.codeseeker.aiconfig";
pub const ENDPOINTS_KEY: &str = "com.codeseeker.endpoints";
const SETTINGS_VERSION: u32 = 1;

// ============================================
// SETTINGS DOCUMENT
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, serde_json::Value>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

/// Key/value settings persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE_NAME)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let document = self.read_document()?;
        let Some(value) = document.entries.get(key) else {
            return Ok(None);
        };

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: self.path(),
                reason: format!("{key}: {e}"),
            })
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        let mut document = self.read_document()?;
        document.entries.insert(key.to_string(), value);
        self.write_document(&document)
    }

    pub fn remove(&self, key: &str) -> Result<bool, ConfigError> {
        let mut document = self.read_document()?;
        let removed = document.entries.remove(key).is_some();
        if removed {
            self.write_document(&document)?;
        }
        Ok(removed)
    }

    /// Stored model configuration, migrated to supported model ids.
    ///
    /// A migrated record is written back before it is returned.
    pub fn load_model_config(&self) -> Result<Option<ModelConfig>, ConfigError> {
        let Some(mut config) = self.get::<ModelConfig>(AI_CONFIG_KEY)? else {
            info!("No model configuration stored in {}", self.path().display());
            return Ok(None);
        };

        if migrate_model_config(&mut config) {
            self.set(AI_CONFIG_KEY, &config)?;
            info!("Migrated model configuration written back");
        }
        Ok(Some(config))
    }

    pub fn save_model_config(&self, config: &ModelConfig) -> Result<(), ConfigError> {
        validate_model_config(config)?;
        self.set(AI_CONFIG_KEY, config)
    }

    pub fn load_endpoints(&self) -> Result<ProviderEndpoints, ConfigError> {
        Ok(self.get(ENDPOINTS_KEY)?.unwrap_or_default())
    }

    fn read_document(&self) -> Result<SettingsDocument, ConfigError> {
        let path = self.path();
        if !path.exists() {
            return Ok(SettingsDocument::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.clone(),
            source: e,
        })?;

        let document: SettingsDocument =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if document.version == 0 || document.version > SETTINGS_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid settings version: {} (expected 1-{SETTINGS_VERSION})",
                document.version
            )));
        }
        Ok(document)
    }

    /// Temp file + rename, so a crash never leaves a half-written document.
    fn write_document(&self, document: &SettingsDocument) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path();
        let temp_path = self.dir.join(format!("{SETTINGS_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(document).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: path.clone(),
            source: e,
        })?;

        info!("Settings saved to {}", path.display());
        Ok(())
    }
}

// ============================================
// MODEL CONFIG RULES
// ============================================

/// Replace unsupported model ids with [`DEFAULT_MODEL`]. Returns whether
/// anything changed.
pub fn migrate_model_config(config: &mut ModelConfig) -> bool {
    let mut changed = false;

    if !is_model_supported(&config.primary_model_id) {
        warn!(
            "Migrated primary model from {} to {DEFAULT_MODEL}",
            config.primary_model_id
        );
        config.primary_model_id = DEFAULT_MODEL.to_string();
        changed = true;
    }

    let secondary_in_use =
        !config.use_same_model_for_both || !config.secondary_model_id.is_empty();
    if secondary_in_use && !is_model_supported(&config.secondary_model_id) {
        warn!(
            "Migrated secondary model from {} to {DEFAULT_MODEL}",
            config.secondary_model_id
        );
        config.secondary_model_id = DEFAULT_MODEL.to_string();
        changed = true;
    }

    changed
}

/// Checks run before a configuration is saved or any client is built.
#[track_caller]
pub fn validate_model_config(config: &ModelConfig) -> Result<(), ConfigError> {
    if !is_model_supported(&config.primary_model_id) {
        return Err(ConfigError::UnsupportedModel {
            location: ErrorLocation::from(Location::caller()),
            role: "primary",
            model_id: config.primary_model_id.clone(),
        });
    }
    if config.primary_api_key.is_empty() {
        return Err(ConfigError::validation("Primary model API key is required"));
    }

    if config.use_same_model_for_both {
        return Ok(());
    }

    if !is_model_supported(&config.secondary_model_id) {
        return Err(ConfigError::UnsupportedModel {
            location: ErrorLocation::from(Location::caller()),
            role: "secondary",
            model_id: config.secondary_model_id.clone(),
        });
    }
    if config.secondary_api_key.is_empty() {
        return Err(ConfigError::validation("Secondary model API key is required"));
    }

    Ok(())
}

// ============================================
// PROVIDER ENDPOINTS
// ============================================

/// Base URL overrides per provider; `None` keeps the public endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEndpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek: Option<String>,
}

impl ProviderEndpoints {
    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Anthropic => self.anthropic.as_deref(),
            Provider::Deepseek => self.deepseek.as_deref(),
        }
    }

    /// Later values win field by field.
    pub fn merge(mut self, other: ProviderEndpoints) -> Self {
        if other.anthropic.is_some() {
            self.anthropic = other.anthropic;
        }
        if other.deepseek.is_some() {
            self.deepseek = other.deepseek;
        }
        self
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for provider in Provider::ALL {
            let Some(url) = self.get(provider) else {
                continue;
            };
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::validation(format!(
                    "Invalid {provider} endpoint: {url}"
                )));
            }
        }
        Ok(())
    }

    pub fn apply(&self, registry: ModelRegistry) -> ModelRegistry {
        Provider::ALL
            .into_iter()
            .fold(registry, |registry, provider| match self.get(provider) {
                Some(url) => registry.with_endpoint(provider, url),
                None => registry,
            })
    }
}
