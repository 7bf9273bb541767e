use crate::cli::{Cli, Command, ConfigCommand};

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[test]
fn given_bare_ask_when_parsing_then_defaults_apply() {
    // GIVEN / WHEN
    let cli = Cli::try_parse_from(["codeseeker", "ask", "Where are retries configured?"]).unwrap();

    // THEN
    assert_eq!(cli.global.timeout, Duration::from_secs(60));
    assert_eq!(cli.global.retries, 0);
    assert!(!cli.global.verbose);
    match cli.command {
        Command::Ask {
            question,
            root,
            json,
        } => {
            assert_eq!(question, "Where are retries configured?");
            assert_eq!(root, PathBuf::from("."));
            assert!(!json);
        }
        other => panic!("expected Ask, got {other:?}"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_they_are_accepted() {
    let cli = Cli::try_parse_from([
        "codeseeker",
        "tokens",
        "src",
        "--ext",
        ".vue",
        "--ext",
        "svelte",
        "--timeout",
        "2m",
        "--retries",
        "3",
        "--anthropic-url",
        "http://127.0.0.1:9000",
    ])
    .unwrap();

    assert_eq!(cli.global.timeout, Duration::from_secs(120));
    assert_eq!(cli.global.retries, 3);
    assert_eq!(
        cli.global.endpoints().anthropic.as_deref(),
        Some("http://127.0.0.1:9000")
    );
    assert_eq!(cli.global.endpoints().deepseek, None);
    match cli.command {
        Command::Tokens { root, extensions, .. } => {
            assert_eq!(root, PathBuf::from("src"));
            assert_eq!(extensions, vec![".vue", "svelte"]);
        }
        other => panic!("expected Tokens, got {other:?}"),
    }
}

/// **VALUE**: `config set` demands a discovery model unless the primary is reused.
///
/// **BUG THIS CATCHES**: Would catch dropping `required_unless_present`, which
/// would push the error down to the builder with a less useful message.
#[test]
fn given_config_set_without_secondary_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "codeseeker",
        "config",
        "set",
        "--primary",
        "claude-3-sonnet-20240229",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_config_set_with_same_model_when_parsing_then_secondary_optional() {
    let cli = Cli::try_parse_from([
        "codeseeker",
        "config",
        "set",
        "--primary",
        "claude-3-sonnet-20240229",
        "--same-model",
    ])
    .unwrap();

    match cli.command {
        Command::Config(ConfigCommand::Set(args)) => {
            assert!(args.same_model);
            assert_eq!(args.secondary, None);
        }
        other => panic!("expected Config Set, got {other:?}"),
    }
}

#[test]
fn given_malformed_timeout_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["codeseeker", "--timeout", "soon", "models"]);

    assert!(result.is_err());
}
