//! Test doubles for pipeline and service tests.
//!
//! - `ScriptedClient`: a model client answering from a closure and recording prompts
//! - `MemoryWorkspace`: an in-memory file enumerator and reader
//! - `test_prompts()`: short templates whose first word identifies the stage

use seeker_core::config::{PromptTemplate, PromptTemplates};
use seeker_core::error::{ProviderError, WorkspaceError};
use seeker_core::{FileEnumerator, FileReader, ModelClient};

use common::ErrorLocation;

use models::{ModelResponse, Provider};

use std::collections::BTreeMap;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

pub const WORKSPACE_ROOT: &str = "/workspace";

type Handler = Box<dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync>;

pub struct ScriptedClient {
    model_id: &'static str,
    handler: Handler,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(
        model_id: &'static str,
        handler: impl Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            model_id,
            handler: Box::new(handler),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `status`.
    pub fn failing(model_id: &'static str, status: StatusCode) -> Self {
        Self::new(model_id, move |_| {
            Err(ProviderError::from_status(Provider::Anthropic, status, "scripted failure"))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_id(&self) -> &str {
        self.model_id
    }

    async fn query(&self, prompt: &str) -> Result<ModelResponse, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let content = (self.handler)(prompt)?;
        Ok(ModelResponse {
            content,
            model_used: self.model_id.to_string(),
            token_count: Some(42),
        })
    }
}

/// Files keyed by workspace-relative path. `None` content fails to read.
#[derive(Default)]
pub struct MemoryWorkspace {
    files: BTreeMap<String, Option<String>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.insert(relative.to_string(), Some(content.to_string()));
        self
    }

    pub fn with_unreadable_file(mut self, relative: &str) -> Self {
        self.files.insert(relative.to_string(), None);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl FileEnumerator for MemoryWorkspace {
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>, WorkspaceError> {
        Ok(self
            .files
            .keys()
            .filter(|path| path.as_str() == pattern)
            .map(|path| Path::new(WORKSPACE_ROOT).join(path))
            .collect())
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(WORKSPACE_ROOT)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait]
impl FileReader for MemoryWorkspace {
    async fn read_to_string(&self, path: &Path) -> Result<String, WorkspaceError> {
        let relative = self.relative_path(path);
        match self.files.get(&relative) {
            Some(Some(content)) => Ok(content.clone()),
            _ => Err(WorkspaceError::Read {
                path: path.to_path_buf(),
                source: IoError::new(ErrorKind::PermissionDenied, "scripted read failure"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

pub fn test_prompts() -> Arc<PromptTemplates> {
    Arc::new(PromptTemplates {
        file_discovery: PromptTemplate {
            template: "DISCOVER ${question}".to_string(),
        },
        code_analysis: PromptTemplate {
            template: "ANALYZE ${filePath}\nQ: ${question}\n${fileContent}".to_string(),
        },
        final_answer: PromptTemplate {
            template: "SYNTHESIZE ${question}\n${codeResults}".to_string(),
        },
    })
}

pub fn file_search(path: &str, reason: &str) -> String {
    format!("*FILE_SEARCH*\npath: {path}\nreason: {reason}\n*END_FILE_SEARCH*\n")
}

pub fn code_section(lines: &str, code: &str, explanation: &str) -> String {
    format!("*CODE_SECTION*\nlines: {lines}\ncode: {code}\nexplanation: {explanation}\n*END_CODE_SECTION*\n")
}

pub fn answer_block(summary: &str, details: &str, references: &str) -> String {
    format!("*ANSWER*\nsummary: {summary}\ndetails: {details}\nreferences: {references}\n*END_ANSWER*")
}
