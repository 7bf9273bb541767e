use crate::config::{ProviderEndpoints, migrate_model_config, validate_model_config};
use crate::error::ConfigError;
use crate::registry::{DEFAULT_MODEL, ModelRegistry};

use common::RedactedApiKey;

use models::{ModelConfig, Provider};

fn config(primary: &str, secondary: &str, same: bool) -> ModelConfig {
    ModelConfig {
        primary_model_id: primary.to_string(),
        secondary_model_id: secondary.to_string(),
        primary_api_key: RedactedApiKey::new("primary-key"),
        secondary_api_key: RedactedApiKey::new("secondary-key"),
        use_same_model_for_both: same,
    }
}

// ============================================
// MIGRATION
// ============================================

#[test]
fn given_retired_model_ids_when_migrating_then_both_become_default() {
    // GIVEN
    let mut stored = config("claude-instant-1", "gpt-4", false);

    // WHEN
    let changed = migrate_model_config(&mut stored);

    // THEN
    assert!(changed);
    assert_eq!(stored.primary_model_id, DEFAULT_MODEL);
    assert_eq!(stored.secondary_model_id, DEFAULT_MODEL);
}

#[test]
fn given_supported_ids_when_migrating_then_nothing_changes() {
    let mut stored = config("claude-2.1", "deepseek-coder-6.7b-instruct", false);
    let before = stored.clone();

    assert!(!migrate_model_config(&mut stored));
    assert_eq!(stored, before);
}

#[test]
fn given_shared_model_with_blank_secondary_when_migrating_then_secondary_stays_blank() {
    let mut stored = config("claude-2.1", "", true);

    assert!(!migrate_model_config(&mut stored));
    assert_eq!(stored.secondary_model_id, "");
}

// ============================================
// VALIDATION
// ============================================

#[test]
fn given_unsupported_secondary_when_validating_then_error_names_role() {
    // GIVEN
    let candidate = config(DEFAULT_MODEL, "gpt-5-nonexistent", false);

    // WHEN
    let result = validate_model_config(&candidate);

    // THEN
    match result {
        Err(ConfigError::UnsupportedModel { role, model_id, .. }) => {
            assert_eq!(role, "secondary");
            assert_eq!(model_id, "gpt-5-nonexistent");
        }
        other => panic!("expected UnsupportedModel, got {other:?}"),
    }
}

#[test]
fn given_blank_primary_key_when_validating_then_validation_error() {
    let mut candidate = config(DEFAULT_MODEL, DEFAULT_MODEL, false);
    candidate.primary_api_key = RedactedApiKey::new("   ");

    let result = validate_model_config(&candidate);

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// **VALUE**: Secondary fields are ignored when the primary model is reused.
///
/// **BUG THIS CATCHES**: Rejecting a valid "same model" config because its
/// unused secondary key is blank.
#[test]
fn given_same_model_flag_and_no_secondary_key_when_validating_then_accepted() {
    // GIVEN
    let mut candidate = config(DEFAULT_MODEL, "", true);
    candidate.secondary_api_key = RedactedApiKey::default();

    // THEN
    assert!(validate_model_config(&candidate).is_ok());
}

#[test]
fn given_missing_secondary_key_when_validating_then_validation_error() {
    let mut candidate = config(DEFAULT_MODEL, DEFAULT_MODEL, false);
    candidate.secondary_api_key = RedactedApiKey::default();

    let err = validate_model_config(&candidate).expect_err("secondary key required");

    assert!(err.to_string().contains("Secondary model API key is required"));
}

// ============================================
// ENDPOINTS
// ============================================

#[test]
fn given_two_endpoint_sets_when_merged_then_later_values_win_per_field() {
    let stored = ProviderEndpoints {
        anthropic: Some("https://proxy.example".to_string()),
        deepseek: Some("https://deepseek.example".to_string()),
    };
    let flags = ProviderEndpoints {
        anthropic: Some("http://localhost:9000".to_string()),
        deepseek: None,
    };

    let merged = stored.merge(flags);

    assert_eq!(merged.get(Provider::Anthropic), Some("http://localhost:9000"));
    assert_eq!(merged.get(Provider::Deepseek), Some("https://deepseek.example"));
}

#[test]
fn given_endpoint_without_scheme_when_validating_then_error() {
    let endpoints = ProviderEndpoints {
        anthropic: None,
        deepseek: Some("api.deepseek.com".to_string()),
    };

    assert!(endpoints.validate().is_err());
}

#[test]
fn given_endpoint_override_when_applied_then_registry_builds_against_it() {
    let endpoints = ProviderEndpoints {
        anthropic: Some("http://127.0.0.1:1".to_string()),
        deepseek: None,
    };

    let registry = endpoints.apply(ModelRegistry::empty());

    // Deepseek was never configured on the empty registry.
    assert!(registry.validate().is_err());
    assert!(
        registry
            .create_client(DEFAULT_MODEL, &RedactedApiKey::new("k"))
            .is_ok()
    );
}
