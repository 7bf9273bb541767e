//! Harness running parsed commands against a temporary config directory and a
//! mock Anthropic endpoint.

use codeseeker::cli::Cli;
use codeseeker::error::CodeseekerError;

use std::path::Path;

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SONNET: &str = "claude-3-sonnet-20240229";

/// Templates tagged so mocks can tell the stages apart.
pub const TEST_PROMPTS: &str = r#"
[prompts.file_discovery]
template = "STAGE_DISCOVER ${question}"

[prompts.code_analysis]
template = "STAGE_ANALYZE ${filePath} ${question} ${fileContent}"

[prompts.final_answer]
template = "STAGE_SYNTHESIZE ${question} ${codeResults}"
"#;

pub struct Harness {
    pub config_dir: TempDir,
    pub server: MockServer,
}

impl Harness {
    pub async fn new() -> Self {
        let config_dir = TempDir::new().unwrap();
        std::fs::write(config_dir.path().join("prompts.toml"), TEST_PROMPTS).unwrap();
        Self {
            config_dir,
            server: MockServer::start().await,
        }
    }

    pub fn cli(&self, args: &[&str]) -> Cli {
        let config_dir = self.config_dir.path().to_string_lossy().into_owned();
        let prompts = self
            .config_dir
            .path()
            .join("prompts.toml")
            .to_string_lossy()
            .into_owned();
        let mut argv = vec![
            String::from("codeseeker"),
            String::from("--config-dir"),
            config_dir,
            String::from("--prompts"),
            prompts,
            String::from("--anthropic-url"),
            self.server.uri(),
            String::from("--timeout"),
            String::from("5s"),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    pub async fn run(&self, args: &[&str]) -> Result<String, CodeseekerError> {
        codeseeker::run(&self.cli(args), &CancellationToken::new()).await
    }

    /// Store a same-model Sonnet configuration.
    pub async fn configure(&self) {
        self.run(&[
            "config",
            "set",
            "--primary",
            SONNET,
            "--primary-key",
            "sk-test",
            "--same-model",
        ])
        .await
        .unwrap();
    }

    /// Answer any request whose body contains `marker` with `text`.
    pub async fn reply_when(&self, marker: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_string_contains(marker))
            .respond_with(anthropic_reply(text))
            .mount(&self.server)
            .await;
    }
}

pub fn anthropic_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    }))
}

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}
