use seeker_core::error::ProviderError;
use seeker_core::model_client::{
    AnthropicClient, DEFAULT_REQUEST_TIMEOUT, DeepseekClient, MAX_OUTPUT_TOKENS, RetryingClient,
};
use seeker_core::{ModelClient, ModelRegistry};

use common::RedactedApiKey;

use models::Provider;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SONNET: &str = "claude-3-sonnet-20240229";
const DEEPSEEK: &str = "deepseek-coder-33b-instruct";

fn anthropic(server: &MockServer) -> AnthropicClient {
    AnthropicClient::with_base_url(
        RedactedApiKey::new("sk-ant-test"),
        SONNET,
        &server.uri(),
        DEFAULT_REQUEST_TIMEOUT,
    )
    .expect("client builds")
}

fn deepseek(server: &MockServer) -> DeepseekClient {
    DeepseekClient::with_base_url(
        RedactedApiKey::new("sk-ds-test"),
        DEEPSEEK,
        &server.uri(),
        DEFAULT_REQUEST_TIMEOUT,
    )
    .expect("client builds")
}

// ============================================================================
// Anthropic
// ============================================================================

/// **VALUE**: The Anthropic client sends the single-turn body with auth and
/// version headers and normalizes the reply.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - the `x-api-key` or `anthropic-version` header went missing
/// - `max_tokens` stopped being capped
/// - usage was not summed into `token_count`
#[tokio::test]
async fn given_anthropic_success_when_querying_then_returns_first_text_block() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": SONNET,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{ "role": "user", "content": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Hi there" }],
            "usage": { "input_tokens": 7, "output_tokens": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let response = anthropic(&server).query("hello").await.expect("query succeeds");

    // THEN
    assert_eq!(response.content, "Hi there");
    assert_eq!(response.model_used, SONNET);
    assert_eq!(response.token_count, Some(10));
}

#[tokio::test]
async fn given_anthropic_unauthorized_when_querying_then_status_error_with_status_text() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .mount(&server)
        .await;

    // WHEN
    let err = anthropic(&server).query("hello").await.expect_err("401");

    // THEN
    assert_eq!(err.status_code(), Some(401));
    assert!(!err.is_retryable());
    let message = err.to_string();
    assert!(message.contains("Unauthorized"), "{message}");
    assert!(message.contains("invalid x-api-key"), "{message}");
}

#[tokio::test]
async fn given_anthropic_envelope_without_content_when_querying_then_malformed_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = anthropic(&server).query("hello").await.expect_err("empty content");

    assert!(matches!(
        err,
        ProviderError::MalformedEnvelope {
            provider: Provider::Anthropic,
            ..
        }
    ));
}

#[tokio::test]
async fn given_non_json_body_when_querying_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = anthropic(&server).query("hello").await.expect_err("not JSON");

    assert!(matches!(err, ProviderError::Json { .. }));
}

#[tokio::test]
async fn given_base_url_with_path_prefix_when_querying_then_endpoint_is_appended() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proxy/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "via proxy" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::with_base_url(
        RedactedApiKey::new("k"),
        SONNET,
        &format!("{}/proxy", server.uri()),
        DEFAULT_REQUEST_TIMEOUT,
    )
    .expect("client builds");

    let response = client.query("hello").await.expect("query succeeds");

    assert_eq!(response.content, "via proxy");
    assert_eq!(response.token_count, None);
}

// ============================================================================
// Deepseek
// ============================================================================

#[tokio::test]
async fn given_deepseek_success_when_querying_then_returns_first_choice() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-ds-test"))
        .and(body_partial_json(json!({
            "model": DEEPSEEK,
            "max_tokens": MAX_OUTPUT_TOKENS
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "def main(): pass" } }],
            "usage": { "prompt_tokens": 5, "completion_tokens": 6, "total_tokens": 11 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let response = deepseek(&server).query("write main").await.expect("query succeeds");

    // THEN
    assert_eq!(response.content, "def main(): pass");
    assert_eq!(response.model_used, DEEPSEEK);
    assert_eq!(response.token_count, Some(11));
}

#[tokio::test]
async fn given_deepseek_envelope_without_choices_when_querying_then_malformed_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = deepseek(&server).query("hello").await.expect_err("no choices");

    assert!(matches!(
        err,
        ProviderError::MalformedEnvelope {
            provider: Provider::Deepseek,
            ..
        }
    ));
}

#[tokio::test]
async fn given_server_error_when_testing_connection_then_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!deepseek(&server).test_connection().await);
}

#[tokio::test]
async fn given_healthy_provider_when_testing_connection_then_sends_test_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "user", "content": "Test connection" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "ok" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(anthropic(&server).test_connection().await);
}

#[tokio::test]
async fn given_slow_provider_when_client_timeout_elapses_then_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({ "content": [{ "type": "text", "text": "late" }] })),
        )
        .mount(&server)
        .await;

    let client = AnthropicClient::with_base_url(
        RedactedApiKey::new("k"),
        SONNET,
        &server.uri(),
        Duration::from_millis(100),
    )
    .expect("client builds");

    let err = client.query("hello").await.expect_err("timed out");

    assert!(matches!(err, ProviderError::Timeout { .. }));
    assert!(err.is_retryable());
}

// ============================================================================
// Registry and retry against a live mock
// ============================================================================

#[tokio::test]
async fn given_registry_pointed_at_mock_when_creating_client_then_requests_reach_mock() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "from registry" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let registry = ModelRegistry::default().with_endpoint(Provider::Deepseek, server.uri());

    // WHEN
    let client = registry
        .create_client(DEEPSEEK, &RedactedApiKey::new("k"))
        .expect("client builds");
    let response = client.query("hi").await.expect("query succeeds");

    // THEN
    assert_eq!(client.provider(), Provider::Deepseek);
    assert_eq!(response.content, "from registry");
}

/// **VALUE**: An overloaded provider is retried until it answers.
///
/// **BUG THIS CATCHES**: Treating 529 as permanent, or retrying without
/// ever re-sending the request.
#[tokio::test]
async fn given_one_overloaded_response_when_querying_with_retry_then_second_attempt_succeeds() {
    // GIVEN: the first request gets a 529, later ones succeed
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "recovered" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RetryingClient::new(Arc::new(anthropic(&server)), 2)
        .with_initial_interval(Duration::from_millis(10));

    // WHEN
    let response = client.query("hello").await.expect("retry succeeds");

    // THEN
    assert_eq!(response.content, "recovered");
}
