pub mod config;
pub mod pipeline;
pub mod provider;
pub mod registry;
pub mod tokens;
pub mod workspace;

pub use config::ConfigError;
pub use pipeline::PipelineError;
pub use provider::ProviderError;
pub use registry::RegistryError;
pub use tokens::TokenError;
pub use workspace::WorkspaceError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Tokens(#[from] TokenError),
}
