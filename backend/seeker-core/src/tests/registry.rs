use crate::error::RegistryError;
use crate::registry::{
    DEFAULT_MODEL, ModelRegistry, is_model_supported, model_by_id, pricing_for, supported_models,
};

use common::RedactedApiKey;

use models::Provider;

/// **VALUE**: Every catalog id is reported as supported; an unregistered id is not.
///
/// **WHY THIS MATTERS**: Config migration relies on `is_model_supported` to decide
/// whether a stored id must be replaced.
#[test]
fn given_catalog_when_checking_support_then_every_listed_id_is_supported() {
    // GIVEN
    let models = supported_models();

    // THEN
    assert!(!models.is_empty());
    assert!(models.iter().all(|m| is_model_supported(m.id)));
    assert!(!is_model_supported("gpt-5-nonexistent"));
    assert!(!is_model_supported(""));
}

#[test]
fn given_catalog_when_listed_twice_then_order_is_stable_and_declared() {
    let first: Vec<&str> = supported_models().iter().map(|m| m.id).collect();
    let second: Vec<&str> = supported_models().iter().map(|m| m.id).collect();

    assert_eq!(first, second);
    assert_eq!(first[0], "claude-3-opus-20240229");
    assert_eq!(first[3], "deepseek-coder-33b-instruct");
}

#[test]
fn given_returned_catalog_when_mutated_then_registry_is_unaffected() {
    let mut copy = supported_models();
    copy.clear();

    assert_eq!(supported_models().len(), 5);
}

#[test]
fn given_default_model_when_looked_up_then_it_is_in_catalog() {
    let model = model_by_id(DEFAULT_MODEL).expect("default model is supported");

    assert_eq!(model.provider, Provider::Anthropic);
}

#[test]
fn given_every_catalog_entry_when_pricing_requested_then_price_exists() {
    for model in supported_models() {
        assert!(pricing_for(model.id).is_ok(), "missing price for {}", model.id);
    }
}

#[test]
fn given_unknown_id_when_pricing_requested_then_unknown_pricing_error() {
    let result = pricing_for("gpt-5-nonexistent");

    assert!(matches!(result, Err(RegistryError::UnknownPricing { .. })));
}

#[test]
fn given_default_registry_when_validated_then_succeeds() {
    assert!(ModelRegistry::default().validate().is_ok());
}

/// **VALUE**: Startup validation catches a provider with no endpoint.
///
/// **BUG THIS CATCHES**: Adding a catalog entry for a new provider without
/// wiring its client would otherwise only fail on first use.
#[test]
fn given_registry_missing_deepseek_when_validated_then_no_implementation_error() {
    // GIVEN
    let registry = ModelRegistry::empty().with_endpoint(Provider::Anthropic, "http://localhost:1");

    // WHEN
    let result = registry.validate();

    // THEN
    match result {
        Err(RegistryError::NoImplementation { provider, .. }) => {
            assert_eq!(provider, Provider::Deepseek)
        }
        other => panic!("expected NoImplementation, got {other:?}"),
    }
}

#[test]
fn given_supported_ids_when_creating_clients_then_provider_matches_catalog() {
    let registry = ModelRegistry::default();
    let key = RedactedApiKey::new("test-key");

    for model in supported_models() {
        let client = registry.create_client(model.id, &key).expect("client builds");
        assert_eq!(client.provider(), model.provider);
        assert_eq!(client.model_id(), model.id);
    }
}

#[test]
fn given_unsupported_id_when_creating_client_then_unsupported_model_error() {
    let registry = ModelRegistry::default();

    let result = registry.create_client("gpt-5-nonexistent", &RedactedApiKey::new("k"));

    assert!(matches!(result, Err(RegistryError::UnsupportedModel { .. })));
}

#[test]
fn given_invalid_endpoint_when_creating_client_then_client_init_error() {
    let registry = ModelRegistry::default().with_endpoint(Provider::Anthropic, "not a url");

    let result = registry.create_client(DEFAULT_MODEL, &RedactedApiKey::new("k"));

    assert!(matches!(result, Err(RegistryError::ClientInit { .. })));
}
