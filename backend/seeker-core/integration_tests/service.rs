use seeker_core::config::{AI_CONFIG_KEY, SETTINGS_FILE_NAME};
use seeker_core::error::{ConfigError, CoreError};
use seeker_core::registry::DEFAULT_MODEL;
use seeker_core::{AiService, ModelRegistry, SettingsStore};

use models::{ModelConfig, Provider, TokenDirection};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(dir: &TempDir) -> AiService {
    AiService::new(ModelRegistry::default(), SettingsStore::new(dir.path())).expect("registry valid")
}

fn sonnet_config() -> ModelConfig {
    ModelConfig::builder()
        .with_primary_model("claude-3-sonnet-20240229")
        .with_primary_api_key("sk-primary")
        .with_secondary_model("deepseek-coder-6.7b-instruct")
        .with_secondary_api_key("sk-secondary")
        .build()
        .expect("valid config")
}

fn read_settings(dir: &TempDir) -> Value {
    let raw = std::fs::read_to_string(dir.path().join(SETTINGS_FILE_NAME)).expect("settings written");
    serde_json::from_str(&raw).expect("settings are JSON")
}

// ============================================================================
// Load / save
// ============================================================================

#[tokio::test]
async fn given_empty_config_dir_when_loading_then_service_is_unconfigured() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let service = service(&dir);

    // WHEN
    let loaded = service.load().await.expect("load succeeds");

    // THEN
    assert!(!loaded);
    assert!(!service.is_configured().await);
    assert!(service.config().await.is_none());
    assert!(!service.test_primary_model().await);
    assert!(!service.test_secondary_model().await);
}

#[tokio::test]
async fn given_unconfigured_service_when_querying_then_not_configured_error() {
    let dir = TempDir::new().expect("temp dir");
    let service = service(&dir);

    let err = service.query_primary_model("hi").await.expect_err("no clients");

    assert!(matches!(err, CoreError::Config(ConfigError::NotConfigured { role: "Primary", .. })));
}

/// **VALUE**: A saved configuration survives a restart.
///
/// **WHY THIS MATTERS**: Users configure keys once; losing them on restart
/// or storing them redacted would force re-entry every session.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - keys were serialized as "[REDACTED]" instead of their value
/// - the record was stored under a different key than it is read from
#[tokio::test]
async fn given_saved_config_when_new_service_loads_then_same_config_is_active() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    service(&dir).save_config(sonnet_config()).await.expect("save succeeds");

    // WHEN
    let restarted = service(&dir);
    let loaded = restarted.load().await.expect("load succeeds");

    // THEN
    assert!(loaded);
    assert!(restarted.is_configured().await);
    assert_eq!(restarted.config().await, Some(sonnet_config()));

    let settings = read_settings(&dir);
    assert_eq!(settings["entries"][AI_CONFIG_KEY]["primaryApiKey"], "sk-primary");
    assert_eq!(settings["entries"][AI_CONFIG_KEY]["useSameModelForBoth"], false);
}

#[tokio::test]
async fn given_invalid_config_when_saving_then_nothing_is_written_and_old_config_stays() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let service = service(&dir);
    service.save_config(sonnet_config()).await.expect("first save");

    let mut invalid = sonnet_config();
    invalid.secondary_model_id = "gpt-5-nonexistent".to_string();

    // WHEN
    let err = service.save_config(invalid).await.expect_err("rejected");

    // THEN
    assert!(matches!(err, CoreError::Config(ConfigError::UnsupportedModel { .. })));
    assert_eq!(service.config().await, Some(sonnet_config()));
    let settings = read_settings(&dir);
    assert_eq!(
        settings["entries"][AI_CONFIG_KEY]["secondaryModelId"],
        "deepseek-coder-6.7b-instruct"
    );
}

/// **VALUE**: A stored id that left the catalog is replaced by the default
/// model and the fix is persisted.
#[tokio::test]
async fn given_stored_retired_model_when_loading_then_migrated_and_written_back() {
    // GIVEN: a settings file written by an older version
    let dir = TempDir::new().expect("temp dir");
    let stored = json!({
        "version": 1,
        "entries": {
            AI_CONFIG_KEY: {
                "primaryModelId": "claude-instant-1.2",
                "secondaryModelId": "deepseek-coder-6.7b-instruct",
                "primaryApiKey": "sk-primary",
                "secondaryApiKey": "sk-secondary",
                "useSameModelForBoth": false
            }
        }
    });
    std::fs::write(dir.path().join(SETTINGS_FILE_NAME), stored.to_string()).expect("seed settings");

    // WHEN
    let service = service(&dir);
    let loaded = service.load().await.expect("load succeeds");

    // THEN
    assert!(loaded);
    let active = service.config().await.expect("config active");
    assert_eq!(active.primary_model_id, DEFAULT_MODEL);
    assert_eq!(active.secondary_model_id, "deepseek-coder-6.7b-instruct");
    assert_eq!(
        read_settings(&dir)["entries"][AI_CONFIG_KEY]["primaryModelId"],
        DEFAULT_MODEL
    );
}

#[tokio::test]
async fn given_stored_config_without_keys_when_loading_then_left_inactive() {
    let dir = TempDir::new().expect("temp dir");
    let stored = json!({
        "version": 1,
        "entries": {
            AI_CONFIG_KEY: {
                "primaryModelId": DEFAULT_MODEL,
                "primaryApiKey": ""
            }
        }
    });
    std::fs::write(dir.path().join(SETTINGS_FILE_NAME), stored.to_string()).expect("seed settings");

    let service = service(&dir);

    assert!(!service.load().await.expect("load succeeds"));
    assert!(!service.is_configured().await);
}

#[tokio::test]
async fn given_corrupt_settings_file_when_loading_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join(SETTINGS_FILE_NAME), "{ not json").expect("seed settings");

    let err = service(&dir).load().await.expect_err("corrupt file");

    assert!(matches!(err, CoreError::Config(ConfigError::ParseError { .. })));
}

#[tokio::test]
async fn given_unrelated_settings_entries_when_saving_then_they_are_preserved() {
    let dir = TempDir::new().expect("temp dir");
    let store = SettingsStore::new(dir.path());
    store.set("com.codeseeker.viewState", &json!({ "visible": true })).expect("seed entry");

    service(&dir).save_config(sonnet_config()).await.expect("save succeeds");

    let settings = read_settings(&dir);
    assert_eq!(settings["entries"]["com.codeseeker.viewState"]["visible"], true);
    assert!(!dir.path().join(format!("{SETTINGS_FILE_NAME}.tmp")).exists());
}

// ============================================================================
// Pricing and cost
// ============================================================================

#[tokio::test]
async fn given_sonnet_primary_when_estimating_input_cost_then_uses_primary_pricing() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let service = service(&dir);
    service.save_config(sonnet_config()).await.expect("save succeeds");

    // WHEN
    let cost = service
        .estimate_cost(2_000_000, TokenDirection::Input)
        .await
        .expect("priced");

    // THEN: $3 per million input tokens
    assert_eq!(cost, 6.0);
    let secondary = service.secondary_model_pricing().await.expect("priced");
    assert_eq!(secondary.output_price_per_million_tokens, 0.10);
}

#[tokio::test]
async fn given_same_model_for_both_when_pricing_then_secondary_matches_primary() {
    let dir = TempDir::new().expect("temp dir");
    let service = service(&dir);
    let config = ModelConfig::builder()
        .with_primary_model("claude-3-opus-20240229")
        .with_primary_api_key("sk-primary")
        .with_same_model_for_both(true)
        .build()
        .expect("valid config");
    service.save_config(config).await.expect("save succeeds");

    let primary = service.primary_model_pricing().await.expect("priced");
    let secondary = service.secondary_model_pricing().await.expect("priced");

    assert_eq!(primary, secondary);
    assert_eq!(primary.input_price_per_million_tokens, 15.0);
}

// ============================================================================
// Queries through configured endpoints
// ============================================================================

#[tokio::test]
async fn given_endpoint_override_when_querying_secondary_then_secondary_key_is_used() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-secondary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "discovered" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let registry = ModelRegistry::default().with_endpoint(Provider::Deepseek, server.uri());
    let service = AiService::new(registry, SettingsStore::new(dir.path())).expect("registry valid");
    service.save_config(sonnet_config()).await.expect("save succeeds");

    // WHEN
    let response = service.query_secondary_model("find files").await.expect("query succeeds");

    // THEN
    assert_eq!(response.content, "discovered");
    assert_eq!(response.model_used, "deepseek-coder-6.7b-instruct");
}

#[tokio::test]
async fn given_registry_without_provider_when_building_service_then_fails_fast() {
    let dir = TempDir::new().expect("temp dir");
    let registry = ModelRegistry::empty().with_endpoint(Provider::Anthropic, "http://localhost:1");

    let result = AiService::new(registry, SettingsStore::new(dir.path()));

    assert!(matches!(result, Err(CoreError::Registry(_))));
}

// ============================================================================
// Tokens
// ============================================================================

#[tokio::test]
async fn given_custom_extension_when_analyzing_project_then_those_files_are_counted() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let project = TempDir::new().expect("project dir");
    std::fs::write(project.path().join("App.vue"), "<template><div/></template>").expect("write");
    let service = service(&dir);

    // WHEN
    let before = service
        .analyze_project_tokens(project.path().to_path_buf())
        .await
        .expect("counted");
    assert!(service.add_custom_code_extension("vue").await);
    assert!(!service.add_custom_code_extension(".VUE").await);
    let after = service
        .analyze_project_tokens(project.path().to_path_buf())
        .await
        .expect("counted");

    // THEN
    assert_eq!(before.total_tokens, 0);
    assert!(after.total_tokens > 0);
    assert!(after.per_file_token_counts.contains_key("App.vue"));
}

#[tokio::test]
async fn given_text_when_counting_tokens_through_service_then_positive() {
    let dir = TempDir::new().expect("temp dir");

    let count = service(&dir).count_tokens("hello world").await.expect("counted");

    assert!(count > 0);
}
