use crate::RedactedApiKey;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct StoredKey {
    #[serde(serialize_with = "crate::redacted_key::serialize_exposed")]
    key: RedactedApiKey,
}

/// **VALUE**: Verifies API keys never appear in Debug or Display output.
///
/// **WHY THIS MATTERS**: ModelConfig is logged at debug level during config reloads.
/// A leaked provider key in a log file is a credential exposure.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug replacing the manual impl.
#[test]
fn given_api_key_when_formatted_then_value_is_redacted() {
    // GIVEN: A key with a recognizable value
    let key = RedactedApiKey::new("sk-ant-secret-value");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{:?}", key);
    let display = format!("{}", key);

    // THEN: Neither contains the secret
    assert!(!debug.contains("secret"));
    assert!(!display.contains("secret"));
    assert_eq!(key.len(), "sk-ant-secret-value".len());
}

#[test]
fn given_api_key_when_serialized_directly_then_fails() {
    let key = RedactedApiKey::new("sk-ant-secret-value");

    let result = serde_json::to_string(&key);

    assert!(result.is_err(), "Plain serialization must be refused");
}

#[test]
fn given_explicit_exposed_field_when_serialized_then_round_trips() {
    // GIVEN: A struct that opts in to persisting the raw key
    let stored = StoredKey {
        key: RedactedApiKey::new("dsk-12345"),
    };

    // WHEN: Serializing and reading it back
    let json = serde_json::to_string(&stored).unwrap();
    let restored: StoredKey = serde_json::from_str(&json).unwrap();

    // THEN: Raw value persisted, restored key equal
    assert!(json.contains("dsk-12345"));
    assert_eq!(restored.key.as_str(), "dsk-12345");
}

#[test]
fn given_blank_key_when_try_new_then_returns_empty_error() {
    let result = RedactedApiKey::try_new("   ");

    assert!(matches!(result, Err(crate::RedactError::Empty { .. })));
}

#[test]
fn given_padded_key_when_try_new_then_trims_whitespace() {
    let key = RedactedApiKey::try_new("  abc123  \n").unwrap();

    assert_eq!(key.as_str(), "abc123");
}
