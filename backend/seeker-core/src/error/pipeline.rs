use crate::pipeline::PipelineStage;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// A query that could not produce an answer.
///
/// Every variant keeps the question so the front end can offer a retry.
#[derive(Debug, ThisError)]
pub enum PipelineError {
    #[error("Failed to generate answer for '{question}': {message} {location}")]
    NotConfigured {
        question: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to generate answer for '{question}': file discovery failed: {message} {location}")]
    Discovery {
        question: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to generate answer for '{question}': no candidate files matched the workspace {location}")]
    NoCandidateFiles {
        question: String,
        location: ErrorLocation,
    },

    #[error("Failed to generate answer for '{question}': all {attempted} candidate files failed analysis {location}")]
    NoAnalyzedFiles {
        question: String,
        attempted: usize,
        location: ErrorLocation,
    },

    #[error("Failed to generate answer for '{question}': synthesis failed: {message} {location}")]
    Synthesis {
        question: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Query '{question}' cancelled during {stage} {location}")]
    Cancelled {
        question: String,
        stage: PipelineStage,
        location: ErrorLocation,
    },
}

impl PipelineError {
    #[track_caller]
    pub fn discovery(question: &str, cause: impl ToString) -> Self {
        PipelineError::Discovery {
            question: question.to_string(),
            message: cause.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn synthesis(question: &str, cause: impl ToString) -> Self {
        PipelineError::Synthesis {
            question: question.to_string(),
            message: cause.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled(question: &str, stage: PipelineStage) -> Self {
        PipelineError::Cancelled {
            question: question.to_string(),
            stage,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn question(&self) -> &str {
        match self {
            PipelineError::NotConfigured { question, .. }
            | PipelineError::Discovery { question, .. }
            | PipelineError::NoCandidateFiles { question, .. }
            | PipelineError::NoAnalyzedFiles { question, .. }
            | PipelineError::Synthesis { question, .. }
            | PipelineError::Cancelled { question, .. } => question,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled { .. })
    }
}
