use crate::HttpStatusCode;

#[test]
fn given_rate_limit_status_when_classified_then_is_retryable_client_error() {
    let status = HttpStatusCode::from(429);

    assert!(status.is_client_error());
    assert!(status.is_retryable());
}

#[test]
fn given_unauthorized_status_when_classified_then_is_not_retryable() {
    let status = HttpStatusCode(401);

    assert!(status.is_unauthorized());
    assert!(!status.is_retryable());
}

#[test]
fn given_overloaded_status_when_classified_then_is_retryable_server_error() {
    // 529 is the Anthropic "overloaded" status
    let status = HttpStatusCode(529);

    assert!(status.is_server_error());
    assert!(status.is_retryable());
}

#[test]
fn given_rejected_key_when_asking_for_hint_then_points_at_api_key() {
    assert_eq!(
        HttpStatusCode(401).hint(),
        Some("check the API key for this model")
    );
}

#[test]
fn given_success_or_unknown_status_when_asking_for_hint_then_none() {
    assert_eq!(HttpStatusCode(200).hint(), None);
    assert_eq!(HttpStatusCode(418).hint(), None);
}

#[test]
fn given_gateway_timeout_when_classified_then_retryable_but_not_rate_limited() {
    let status = HttpStatusCode(504);

    assert!(status.is_retryable());
    assert!(!status.is_rate_limited());
}
