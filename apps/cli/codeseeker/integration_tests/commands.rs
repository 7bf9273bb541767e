use crate::support::{Harness, SONNET, anthropic_reply, write_file};

use codeseeker::error::CodeseekerError;

use seeker_core::CoreError;
use seeker_core::error::PipelineError;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn given_fresh_install_when_listing_models_then_catalog_printed() {
    // GIVEN
    let harness = Harness::new().await;

    // WHEN
    let output = harness.run(&["models"]).await.unwrap();

    // THEN
    assert!(output.contains("claude-3-opus-20240229"));
    assert!(output.contains("deepseek-coder-33b-instruct"));
    assert!(output.contains("(default)"));
}

/// **VALUE**: A configuration stored by one invocation is active in the next.
///
/// **WHY THIS MATTERS**: Every CLI run is a new process. If `config set` did
/// not persist, every other command would report "not configured".
///
/// **BUG THIS CATCHES**: Would catch a save that only swaps in-memory clients,
/// or `config show` printing the raw key.
#[tokio::test]
async fn given_config_set_when_showing_in_next_run_then_config_is_active() {
    // GIVEN
    let harness = Harness::new().await;
    harness.configure().await;

    // WHEN
    let output = harness.run(&["config", "show"]).await.unwrap();

    // THEN
    assert!(output.contains(SONNET));
    assert!(output.contains("same as primary"));
    assert!(!output.contains("sk-test"));
}

#[tokio::test]
async fn given_unsupported_model_when_setting_config_then_rejected_and_nothing_stored() {
    let harness = Harness::new().await;

    let result = harness
        .run(&[
            "config",
            "set",
            "--primary",
            "gpt-4",
            "--primary-key",
            "k",
            "--same-model",
        ])
        .await;

    assert!(matches!(result, Err(CodeseekerError::Core(CoreError::Config(_)))));
    let shown = harness.run(&["config", "show"]).await.unwrap();
    assert!(shown.contains("No model configuration"));
}

#[tokio::test]
async fn given_stored_endpoint_when_testing_then_stored_url_is_used_without_flag() {
    // GIVEN: the endpoint is stored rather than passed per run
    let harness = Harness::new().await;
    let uri = harness.server.uri();
    harness
        .run(&["config", "endpoints", "--anthropic", uri.as_str()])
        .await
        .unwrap();
    harness.configure().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .respond_with(anthropic_reply("pong"))
        .expect(1)
        .mount(&harness.server)
        .await;

    // WHEN: running without --anthropic-url
    let mut cli = harness.cli(&["test"]);
    cli.global.anthropic_url = None;
    let output = codeseeker::run(&cli, &CancellationToken::new()).await.unwrap();

    // THEN
    assert!(output.contains("ok"));
}

#[tokio::test]
async fn given_invalid_endpoint_when_storing_then_validation_error() {
    let harness = Harness::new().await;

    let result = harness
        .run(&["config", "endpoints", "--deepseek", "ftp://example.com"])
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn given_no_config_when_testing_models_then_error_explains_setup() {
    let harness = Harness::new().await;

    let err = harness.run(&["test"]).await.unwrap_err();

    assert!(err.to_string().contains("config set"));
}

#[tokio::test]
async fn given_provider_rejects_key_when_testing_models_then_command_fails() {
    let harness = Harness::new().await;
    harness.configure().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let err = harness.run(&["test"]).await.unwrap_err();

    assert!(err.to_string().contains("FAILED"));
}

/// **VALUE**: The full question flow works from the command line.
///
/// **WHY THIS MATTERS**: This is the only test covering argument parsing,
/// stored config, the local workspace and real HTTP clients together.
///
/// **BUG THIS CATCHES**: Would catch a pipeline wired to the wrong workspace
/// root, or prompts not loaded from `--prompts`.
#[tokio::test]
async fn given_configured_project_when_asking_then_answer_tree_printed() {
    // GIVEN
    let harness = Harness::new().await;
    harness.configure().await;

    let project = TempDir::new().unwrap();
    write_file(
        project.path(),
        "src/retry.rs",
        "pub fn backoff() {}\npub const MAX: u32 = 5;\n",
    );

    harness
        .reply_when(
            "STAGE_DISCOVER",
            "*FILE_SEARCH*\npath: src/retry.rs\nreason: defines the retry policy\n*END_FILE_SEARCH*",
        )
        .await;
    harness
        .reply_when(
            "STAGE_ANALYZE",
            "*CODE_SECTION*\nlines: 2\ncode: pub const MAX: u32 = 5;\nexplanation: maximum attempts\n*END_CODE_SECTION*",
        )
        .await;
    harness
        .reply_when(
            "STAGE_SYNTHESIZE",
            "*ANSWER*\nsummary: Retries are capped at five\ndetails: MAX in retry.rs\nreferences: src/retry.rs\n*END_ANSWER*",
        )
        .await;

    let root = project.path().to_string_lossy().into_owned();

    // WHEN
    let output = harness
        .run(&["ask", "How many retries?", "--root", root.as_str()])
        .await
        .unwrap();

    // THEN
    assert!(output.starts_with("Answer\n"));
    assert!(output.contains("Retries are capped at five"));
    assert!(output.contains("src/retry.rs"));
    assert!(output.contains("Why: defines the retry policy"));
    assert!(output.contains("Lines 2-2: maximum attempts"));
}

#[tokio::test]
async fn given_json_flag_when_asking_then_tree_is_json() {
    let harness = Harness::new().await;
    harness.configure().await;
    let project = TempDir::new().unwrap();
    write_file(project.path(), "main.py", "print('hi')\n");
    harness
        .reply_when(
            "STAGE_DISCOVER",
            "*FILE_SEARCH*\npath: main.py\nreason: entry point\n*END_FILE_SEARCH*",
        )
        .await;
    harness
        .reply_when(
            "STAGE_ANALYZE",
            "*CODE_SECTION*\nlines: 1\ncode: print('hi')\nexplanation: greets\n*END_CODE_SECTION*",
        )
        .await;
    harness
        .reply_when(
            "STAGE_SYNTHESIZE",
            "*ANSWER*\nsummary: It prints hi\ndetails: one line\n*END_ANSWER*",
        )
        .await;
    let root = project.path().to_string_lossy().into_owned();

    let output = harness
        .run(&["ask", "What does it print?", "--root", root.as_str(), "--json"])
        .await
        .unwrap();

    let tree: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(tree["label"], "Answer");
}

#[tokio::test]
async fn given_cancelled_token_when_asking_then_cancelled_error() {
    let harness = Harness::new().await;
    harness.configure().await;
    let project = TempDir::new().unwrap();
    let root = project.path().to_string_lossy().into_owned();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let cli = harness.cli(&["ask", "anything?", "--root", root.as_str()]);
    let err = codeseeker::run(&cli, &cancel).await.unwrap_err();

    assert!(matches!(
        err,
        CodeseekerError::Core(CoreError::Pipeline(PipelineError::Cancelled { .. }))
    ));
}

#[tokio::test]
async fn given_unconfigured_service_when_asking_then_not_configured_error() {
    let harness = Harness::new().await;
    let project = TempDir::new().unwrap();
    let root = project.path().to_string_lossy().into_owned();

    let err = harness
        .run(&["ask", "anything?", "--root", root.as_str()])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CodeseekerError::Core(CoreError::Pipeline(PipelineError::NotConfigured { .. }))
    ));
}

#[tokio::test]
async fn given_project_when_counting_tokens_with_extra_extension_then_it_is_included() {
    // GIVEN
    let harness = Harness::new().await;
    harness.configure().await;
    let project = TempDir::new().unwrap();
    write_file(project.path(), "App.vue", "<template><div/></template>\n");
    write_file(project.path(), "lib.rs", "fn main() {}\n");
    let root = project.path().to_string_lossy().into_owned();

    // WHEN
    let plain = harness.run(&["tokens", root.as_str()]).await.unwrap();
    let with_vue = harness
        .run(&["tokens", root.as_str(), "--ext", "vue", "--json"])
        .await
        .unwrap();

    // THEN
    assert!(!plain.contains("App.vue"));
    assert!(plain.contains("estimated input cost with claude-3-sonnet-20240229"));
    let counted: serde_json::Value = serde_json::from_str(&with_vue).unwrap();
    assert!(counted["perFileTokenCounts"]["App.vue"].as_u64().unwrap() > 0);
    assert!(counted["perFileTokenCounts"]["lib.rs"].as_u64().unwrap() > 0);
}
