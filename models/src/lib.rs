//! Domain models for codeseeker.
//!
//! Pure data passed between the model clients, the response parser, the query
//! pipeline and the front end. No I/O and no business logic beyond validation
//! and normalization of values.
//!
//! ## Architecture
//!
//! - **models** (this crate): data structures
//! - **seeker-core**: providers, parsing, the query pipeline
//! - **codeseeker**: command-line wiring

pub mod answer;
pub mod answer_tree;
pub mod catalog;
pub mod error;
pub mod model_config;
pub mod model_response;

pub use answer::{Answer, CodeSection, FileSearchResult, LineRange};
pub use answer_tree::{AnswerNode, SourceLocation};
pub use catalog::{Provider, SupportedModel};
pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use model_config::ModelConfig;
pub use model_config::builder::ModelConfigBuilder;
pub use model_response::{ModelPricing, ModelResponse, TokenDirection};

#[cfg(test)]
mod tests;
