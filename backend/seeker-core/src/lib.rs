pub mod config;
pub mod error;
pub mod model_client;
pub mod pipeline;
pub mod registry;
pub mod response_parser;
pub mod service;
pub mod token_estimator;
pub mod workspace;

#[cfg(test)]
mod tests;

pub use config::{PromptTemplates, ProviderEndpoints, SettingsStore};
pub use error::CoreError;
pub use model_client::ModelClient;
pub use pipeline::{PipelineStage, QueryPipeline};
pub use registry::ModelRegistry;
pub use service::{AiService, ClientHandle, ModelClients};
pub use token_estimator::{ProjectTokenCount, TokenEstimator};
pub use workspace::{FileEnumerator, FileReader, LocalWorkspace};

pub const APP_NAME: &str = "codeseeker";
