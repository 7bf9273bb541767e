use common::ErrorLocation;

use models::Provider;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("Unsupported model: {model_id} {location}")]
    UnsupportedModel {
        model_id: String,
        location: ErrorLocation,
    },

    #[error("No service implementation for model: {model_id} ({provider}) {location}")]
    NoImplementation {
        model_id: String,
        provider: Provider,
        location: ErrorLocation,
    },

    /// Catalog and pricing table disagree. A programming error, not a user one.
    #[error("Pricing not available for model: {model_id} {location}")]
    UnknownPricing {
        model_id: String,
        location: ErrorLocation,
    },

    #[error("Client Init Error for {provider}: {message} {location}")]
    ClientInit {
        provider: Provider,
        message: String,
        location: ErrorLocation,
    },
}
