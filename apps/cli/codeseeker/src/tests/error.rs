use crate::error::CodeseekerError;

use seeker_core::CoreError;
use seeker_core::error::{ConfigError, PipelineError};

#[test]
fn given_app_error_when_displayed_then_message_and_location_present() {
    // GIVEN
    let err = CodeseekerError::app("Question cannot be empty");

    // WHEN
    let text = err.to_string();

    // THEN
    assert!(text.starts_with("Codeseeker Error: Question cannot be empty"));
    assert!(text.contains("error.rs"), "location should point here: {text}");
}

/// **VALUE**: Core errors keep their own text when surfaced by the CLI.
///
/// **BUG THIS CATCHES**: Would catch a wrapper that replaced the core message
/// (and its location) with a generic one.
#[test]
fn given_config_error_when_converted_then_display_is_unchanged() {
    let core = ConfigError::validation("Primary model API key is required");
    let expected = core.to_string();

    let err = CodeseekerError::from(core);

    assert!(matches!(err, CodeseekerError::Core(CoreError::Config(_))));
    assert_eq!(err.to_string(), expected);
}

#[test]
fn given_pipeline_error_when_converted_then_question_is_kept() {
    let err = CodeseekerError::from(PipelineError::discovery("why is it slow?", "provider unreachable"));

    assert!(err.to_string().contains("why is it slow?"));
}

#[test]
fn given_not_configured_error_when_asking_for_hint_then_points_at_config_set() {
    let err = CodeseekerError::from(ConfigError::not_configured("Primary"));

    assert_eq!(err.hint(), Some("run `codeseeker config set` first"));
}

#[test]
fn given_app_error_when_asking_for_hint_then_none() {
    assert_eq!(CodeseekerError::app("boom").hint(), None);
}
