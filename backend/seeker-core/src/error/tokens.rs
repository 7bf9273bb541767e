use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TokenError {
    #[error("Tokenizer Error: {message} {location}")]
    Tokenizer {
        message: String,
        location: ErrorLocation,
    },

    #[error("Project root not found: {path} {location}")]
    RootNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Token analysis task failed: {message} {location}")]
    Task {
        message: String,
        location: ErrorLocation,
    },
}

impl TokenError {
    #[track_caller]
    pub fn tokenizer(message: impl Into<String>) -> Self {
        TokenError::Tokenizer {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<tokio::task::JoinError> for TokenError {
    #[track_caller]
    fn from(error: tokio::task::JoinError) -> Self {
        TokenError::Task {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
