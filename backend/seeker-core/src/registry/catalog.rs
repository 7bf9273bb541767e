use models::{Provider, SupportedModel};

/// Model used when a stored identifier is no longer in the catalog.
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Declaration order is the order shown in model pickers.
pub(crate) static SUPPORTED_MODELS: [SupportedModel; 5] = [
    SupportedModel {
        id: "claude-3-opus-20240229",
        display_name: "Claude 3 Opus",
        provider: Provider::Anthropic,
    },
    SupportedModel {
        id: "claude-3-sonnet-20240229",
        display_name: "Claude 3 Sonnet",
        provider: Provider::Anthropic,
    },
    SupportedModel {
        id: "claude-2.1",
        display_name: "Claude 2.1",
        provider: Provider::Anthropic,
    },
    SupportedModel {
        id: "deepseek-coder-33b-instruct",
        display_name: "Deepseek Coder 33B",
        provider: Provider::Deepseek,
    },
    SupportedModel {
        id: "deepseek-coder-6.7b-instruct",
        display_name: "Deepseek Coder 6.7B",
        provider: Provider::Deepseek,
    },
];

/// Catalog snapshot; callers may reorder or filter it freely.
pub fn supported_models() -> Vec<SupportedModel> {
    SUPPORTED_MODELS.to_vec()
}

pub fn model_by_id(model_id: &str) -> Option<SupportedModel> {
    SUPPORTED_MODELS.iter().find(|m| m.id == model_id).copied()
}

pub fn is_model_supported(model_id: &str) -> bool {
    SUPPORTED_MODELS.iter().any(|m| m.id == model_id)
}
