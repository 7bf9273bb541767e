use common::ErrorLocation;

use seeker_core::CoreError;
use seeker_core::error::{ConfigError, PipelineError, TokenError, WorkspaceError};

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the command-line front end.
///
/// Core failures pass through unchanged so their own location is kept.
#[derive(Debug, Error)]
pub enum CodeseekerError {
    /// Error from this app (setup, arguments, local I/O)
    #[error("Codeseeker Error: {message} {location}")]
    Codeseeker {
        message: String,
        location: ErrorLocation,
    },

    /// Error from seeker-core (config, providers, pipeline, tokens)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A model configuration could not be assembled from the arguments
    #[error("Invalid Model Configuration: {message} {location}")]
    InvalidConfig {
        message: String,
        location: ErrorLocation,
    },
}

impl CodeseekerError {
    #[track_caller]
    pub fn app(message: impl Into<String>) -> Self {
        Self::Codeseeker {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Remedy printed under the error, when one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(CoreError::Provider(e)) => e.hint(),
            Self::Core(CoreError::Config(ConfigError::NotConfigured { .. })) => {
                Some("run `codeseeker config set` first")
            }
            _ => None,
        }
    }

    #[track_caller]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CodeseekerError {
    fn from(e: ConfigError) -> Self {
        Self::Core(CoreError::from(e))
    }
}

impl From<PipelineError> for CodeseekerError {
    fn from(e: PipelineError) -> Self {
        Self::Core(CoreError::from(e))
    }
}

impl From<WorkspaceError> for CodeseekerError {
    fn from(e: WorkspaceError) -> Self {
        Self::Core(CoreError::from(e))
    }
}

impl From<TokenError> for CodeseekerError {
    fn from(e: TokenError) -> Self {
        Self::Core(CoreError::from(e))
    }
}
