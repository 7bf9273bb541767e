use crate::{ModelConfig, ModelError};

/// **VALUE**: Verifies that the builder rejects a config without a primary API key.
///
/// **WHY THIS MATTERS**: Every question goes through the primary model. A missing key
/// would only surface as a 401 after discovery already spent a request.
///
/// **BUG THIS CATCHES**: Would catch if the primary key check is removed, letting
/// unusable configs reach the settings store.
#[test]
fn given_missing_primary_key_when_building_then_returns_validation_error() {
    // GIVEN: Builder with a model but no key
    let builder = ModelConfig::builder()
        .with_primary_model("claude-3-sonnet-20240229")
        .with_same_model_for_both(true);

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Validation error naming the primary key
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Primary model API key is required");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_missing_secondary_key_when_not_sharing_model_then_returns_validation_error() {
    // GIVEN: Separate secondary model without its key
    let builder = ModelConfig::builder()
        .with_primary_model("claude-3-opus-20240229")
        .with_primary_api_key("sk-ant-primary")
        .with_secondary_model("deepseek-coder-6.7b-instruct");

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Secondary key is required
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Secondary model API key is required");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// **VALUE**: Verifies the shared-model flag mirrors the primary fields into the secondary ones.
///
/// **WHY THIS MATTERS**: Discovery reads the effective secondary model. With the flag set,
/// stale secondary values from an earlier config must never be used.
///
/// **BUG THIS CATCHES**: Would catch if the effective accessors ignore the flag.
#[test]
fn given_same_model_flag_when_building_then_secondary_mirrors_primary() {
    // GIVEN: Shared-model config with a stray secondary model
    let config = ModelConfig::builder()
        .with_primary_model("claude-3-sonnet-20240229")
        .with_primary_api_key("sk-ant-primary")
        .with_secondary_model("deepseek-coder-33b-instruct")
        .with_same_model_for_both(true)
        .build()
        .unwrap();

    // THEN: Effective secondary equals primary
    assert!(config.use_same_model_for_both);
    assert_eq!(config.effective_secondary_model_id(), "claude-3-sonnet-20240229");
    assert_eq!(config.effective_secondary_api_key().as_str(), "sk-ant-primary");
    assert!(config.is_configured());
}

#[test]
fn given_valid_config_when_serialized_then_keys_are_persisted_in_camel_case() {
    // GIVEN: A complete two-model config
    let config = ModelConfig::builder()
        .with_primary_model("claude-3-opus-20240229")
        .with_primary_api_key("sk-ant-primary")
        .with_secondary_model("deepseek-coder-6.7b-instruct")
        .with_secondary_api_key("dsk-secondary")
        .build()
        .unwrap();

    // WHEN: Round-tripping through JSON
    let json = serde_json::to_string(&config).unwrap();
    let restored: ModelConfig = serde_json::from_str(&json).unwrap();

    // THEN: Field names follow the stored record layout
    assert!(json.contains("\"primaryModelId\""));
    assert!(json.contains("\"useSameModelForBoth\":false"));
    assert_eq!(restored, config);
}
