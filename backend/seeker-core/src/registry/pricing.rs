use crate::error::RegistryError;

use common::ErrorLocation;

use models::ModelPricing;

use std::panic::Location;

/// USD per million tokens (input, output).
static MODEL_PRICING: &[(&str, ModelPricing)] = &[
    ("claude-3-opus-20240229", ModelPricing::new(15.0, 75.0)),
    ("claude-3-sonnet-20240229", ModelPricing::new(3.0, 15.0)),
    ("claude-2.1", ModelPricing::new(8.0, 24.0)),
    ("deepseek-coder-33b-instruct", ModelPricing::new(0.14, 0.28)),
    ("deepseek-coder-6.7b-instruct", ModelPricing::new(0.10, 0.10)),
];

#[track_caller]
pub fn pricing_for(model_id: &str) -> Result<ModelPricing, RegistryError> {
    MODEL_PRICING
        .iter()
        .find(|(id, _)| *id == model_id)
        .map(|(_, pricing)| *pricing)
        .ok_or_else(|| RegistryError::UnknownPricing {
            model_id: model_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
