use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Line Range Error: '{input}' is not a line range {location}")]
    LineRange {
        input: String,
        location: ErrorLocation,
    },
}
