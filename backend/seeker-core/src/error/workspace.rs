use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum WorkspaceError {
    #[error("Workspace root not found: {path} {location}")]
    RootNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Invalid file pattern '{pattern}': {reason} {location}")]
    Pattern {
        pattern: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("File Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("File enumeration failed under {path}: {message} {location}")]
    Enumerate {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },
}
