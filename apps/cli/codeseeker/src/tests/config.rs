use crate::cli::SetConfigArgs;
use crate::commands::config::build_config;
use crate::error::CodeseekerError;

const SONNET: &str = "claude-3-sonnet-20240229";
const DEEPSEEK: &str = "deepseek-coder-6.7b-instruct";

fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |name| {
        pairs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    }
}

/// **VALUE**: Each model's key is read from its own provider's variable.
///
/// **WHY THIS MATTERS**: A mixed Anthropic/Deepseek setup needs two different
/// keys. Using one variable for both would send an Anthropic key to Deepseek.
#[test]
fn given_keys_in_environment_when_building_config_then_each_provider_gets_its_own() {
    // GIVEN
    let args = SetConfigArgs {
        primary: SONNET.into(),
        secondary: Some(DEEPSEEK.into()),
        ..Default::default()
    };
    let lookup = env(&[("ANTHROPIC_API_KEY", "ant-key"), ("DEEPSEEK_API_KEY", "ds-key")]);

    // WHEN
    let config = build_config(&args, lookup).unwrap();

    // THEN
    assert_eq!(config.primary_api_key.as_str(), "ant-key");
    assert_eq!(config.secondary_api_key.as_str(), "ds-key");
    assert_eq!(config.secondary_model_id, DEEPSEEK);
    assert!(!config.use_same_model_for_both);
}

#[test]
fn given_key_flag_and_environment_when_building_config_then_flag_wins() {
    let args = SetConfigArgs {
        primary: SONNET.into(),
        primary_key: Some("from-flag".into()),
        same_model: true,
        ..Default::default()
    };

    let config = build_config(&args, env(&[("ANTHROPIC_API_KEY", "from-env")])).unwrap();

    assert_eq!(config.primary_api_key.as_str(), "from-flag");
    assert_eq!(config.effective_secondary_model_id(), SONNET);
}

#[test]
fn given_no_key_anywhere_when_building_config_then_invalid_config_error() {
    let args = SetConfigArgs {
        primary: SONNET.into(),
        same_model: true,
        ..Default::default()
    };

    let err = build_config(&args, env(&[])).unwrap_err();

    assert!(matches!(err, CodeseekerError::InvalidConfig { .. }));
    assert!(err.to_string().contains("Primary model API key is required"));
}

#[test]
fn given_blank_environment_key_when_building_config_then_treated_as_missing() {
    let args = SetConfigArgs {
        primary: SONNET.into(),
        secondary: Some(DEEPSEEK.into()),
        ..Default::default()
    };

    let err = build_config(
        &args,
        env(&[("ANTHROPIC_API_KEY", "ant-key"), ("DEEPSEEK_API_KEY", "   ")]),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Secondary model API key is required"));
}

#[test]
fn given_unknown_model_when_building_config_then_environment_is_not_consulted() {
    let args = SetConfigArgs {
        primary: String::from("gpt-4"),
        same_model: true,
        ..Default::default()
    };

    let result = build_config(&args, |_| panic!("no provider variable for unknown models"));

    assert!(result.is_err());
}
