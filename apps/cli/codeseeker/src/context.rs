use crate::cli::GlobalArgs;
use crate::error::CodeseekerError;

use seeker_core::{AiService, ModelRegistry, PromptTemplates, SettingsStore};

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub service: AiService,
    pub prompts: Arc<PromptTemplates>,
    pub call_timeout: Duration,
}

impl AppContext {
    /// Resolve endpoints, build the service and activate any stored configuration.
    pub async fn open(args: &GlobalArgs) -> Result<Self, CodeseekerError> {
        let config_dir = resolve_config_dir(args.config_dir.as_deref())?;
        let store = SettingsStore::new(&config_dir);

        let endpoints = store.load_endpoints()?.merge(args.endpoints());
        endpoints.validate()?;
        debug!("Provider endpoints: {endpoints:?}");

        let registry = endpoints.apply(ModelRegistry::default().with_request_timeout(args.timeout));
        let service = AiService::new(registry, store)?.with_max_retries(args.retries);

        if service.load().await? {
            info!("Loaded model configuration from {}", config_dir.display());
        } else {
            debug!("No usable model configuration in {}", config_dir.display());
        }

        let prompts = match &args.prompts {
            Some(path) => PromptTemplates::load(path)?,
            None => PromptTemplates::bundled()?,
        };

        Ok(Self {
            service,
            prompts: Arc::new(prompts),
            call_timeout: args.timeout,
        })
    }
}

/// `--config-dir` when given, else the platform config directory.
pub fn resolve_config_dir(explicit: Option<&Path>) -> Result<PathBuf, CodeseekerError> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()
            .ok_or_else(|| CodeseekerError::app("Failed to get config directory"))?
            .join(seeker_core::APP_NAME),
    };
    create_dir_all(&dir).map_err(|e| {
        CodeseekerError::app(format!(
            "Failed to create config directory {}: {e}",
            dir.display()
        ))
    })?;
    Ok(dir)
}

/// Platform data directory for logs, falling back to the config directory.
pub fn resolve_log_dir(config_dir: &Path) -> Result<PathBuf, CodeseekerError> {
    let dir = dirs::data_local_dir()
        .map(|d| d.join(seeker_core::APP_NAME))
        .unwrap_or_else(|| config_dir.to_path_buf());
    create_dir_all(&dir).map_err(|e| {
        CodeseekerError::app(format!("Failed to create log directory: {e}"))
    })?;
    Ok(dir)
}
