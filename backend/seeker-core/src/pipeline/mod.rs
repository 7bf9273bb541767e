//! The three-stage question answering flow.
//!
//! ```text
//! Idle -> Discovering -> Analyzing -> Synthesizing -> Done
//!              \              \              \
//!               +--------------+--------------+--> Failed
//! ```
//!
//! Discovery runs on the secondary model and must yield at least one file in
//! the workspace. Files are analyzed one at a time on the primary model; a file
//! that cannot be read or analyzed is skipped with a warning. Synthesis is a
//! single primary-model call whose failure fails the query.

pub mod tree;

pub use tree::build_answer_tree;

use crate::config::{PromptTemplates, fill_template};
use crate::error::{PipelineError, ProviderError};
use crate::model_client::{DEFAULT_REQUEST_TIMEOUT, ModelClient};
use crate::response_parser::{parse_answer, parse_code_sections, parse_file_search};
use crate::service::ClientHandle;
use crate::workspace::{FileEnumerator, FileReader};

use common::ErrorLocation;

use models::{AnswerNode, CodeSection, ModelResponse};

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Discovering,
    Analyzing,
    Synthesizing,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Discovering => "file discovery",
            PipelineStage::Analyzing => "code analysis",
            PipelineStage::Synthesizing => "answer synthesis",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A discovery candidate that resolved to a workspace file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub reason: String,
}

/// A file whose analysis call succeeded, possibly with zero sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub reason: String,
    pub sections: Vec<CodeSection>,
    pub line_count: u32,
}

/// Shape of one entry in the `${codeResults}` JSON.
#[derive(Serialize)]
struct CodeResult<'a> {
    path: &'a str,
    reason: &'a str,
    sections: &'a [CodeSection],
}

pub struct QueryPipeline {
    clients: ClientHandle,
    enumerator: Arc<dyn FileEnumerator>,
    reader: Arc<dyn FileReader>,
    prompts: Arc<PromptTemplates>,
    call_timeout: Duration,
}

impl QueryPipeline {
    pub fn new(
        clients: ClientHandle,
        enumerator: Arc<dyn FileEnumerator>,
        reader: Arc<dyn FileReader>,
        prompts: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            clients,
            enumerator,
            reader,
            prompts,
            call_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Upper bound on each individual model call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub async fn get_answer(&self, question: &str) -> Result<AnswerNode, PipelineError> {
        self.get_answer_with_cancel(question, &CancellationToken::new())
            .await
    }

    /// Run all stages. `cancel` is honored before every model call and file
    /// read, and interrupts a model call already in flight.
    pub async fn get_answer_with_cancel(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<AnswerNode, PipelineError> {
        let mut run = QueryRun::new(question, cancel, self.call_timeout);
        info!("[{}] Question: {question}", run.id);

        let result = self.execute(&mut run).await;
        match &result {
            Ok(_) => run.enter(PipelineStage::Done),
            Err(e) => {
                warn!("[{}] Query failed during {}: {e}", run.id, run.stage);
                run.enter(PipelineStage::Failed);
            }
        }
        result
    }

    async fn execute(&self, run: &mut QueryRun<'_>) -> Result<AnswerNode, PipelineError> {
        // One snapshot per query; a concurrent reload never mixes client sets.
        let clients = self
            .clients
            .snapshot()
            .await
            .ok_or_else(|| PipelineError::NotConfigured {
                question: run.question.to_string(),
                message: "AI models are not configured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        run.enter(PipelineStage::Discovering);
        let resolved = self.discover(run, clients.secondary.as_ref()).await?;

        run.enter(PipelineStage::Analyzing);
        let analyzed = self.analyze(run, clients.primary.as_ref(), &resolved).await?;

        run.enter(PipelineStage::Synthesizing);
        let code_results: Vec<CodeResult<'_>> = analyzed
            .iter()
            .map(|file| CodeResult {
                path: &file.relative_path,
                reason: &file.reason,
                sections: &file.sections,
            })
            .collect();
        let code_results = serde_json::to_string(&code_results)
            .map_err(|e| PipelineError::synthesis(run.question, e))?;

        let prompt = fill_template(
            &self.prompts.final_answer.template,
            &[("question", run.question), ("codeResults", &code_results)],
        );
        let response = run
            .call(clients.primary.as_ref(), &prompt)
            .await
            .map_err(|e| run.stage_error(e))?;

        let answer = parse_answer(&response.content);
        if answer.is_none() {
            warn!("[{}] Synthesis response contained no usable ANSWER block", run.id);
        }

        Ok(build_answer_tree(answer.as_ref(), &analyzed))
    }

    async fn discover(
        &self,
        run: &QueryRun<'_>,
        client: &dyn ModelClient,
    ) -> Result<Vec<ResolvedFile>, PipelineError> {
        let prompt = fill_template(
            &self.prompts.file_discovery.template,
            &[("question", run.question)],
        );
        let response = run
            .call(client, &prompt)
            .await
            .map_err(|e| run.stage_error(e))?;

        let candidates = parse_file_search(&response.content);
        debug!("[{}] Discovery named {} candidate(s)", run.id, candidates.len());

        let mut resolved: Vec<ResolvedFile> = Vec::new();
        for candidate in candidates {
            run.ensure_active()?;

            let path = match self.enumerator.find_files(&candidate.path).await {
                Ok(matches) => match matches.into_iter().next() {
                    Some(path) => path,
                    None => {
                        warn!("[{}] No workspace file matches {}", run.id, candidate.path);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("[{}] Failed to find file {}: {e}", run.id, candidate.path);
                    continue;
                }
            };

            if resolved.iter().any(|r| r.path == path) {
                debug!("[{}] Skipping duplicate candidate {}", run.id, path.display());
                continue;
            }
            resolved.push(ResolvedFile {
                relative_path: self.enumerator.relative_path(&path),
                path,
                reason: candidate.reason,
            });
        }

        if resolved.is_empty() {
            return Err(PipelineError::NoCandidateFiles {
                question: run.question.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(resolved)
    }

    async fn analyze(
        &self,
        run: &QueryRun<'_>,
        client: &dyn ModelClient,
        files: &[ResolvedFile],
    ) -> Result<Vec<AnalyzedFile>, PipelineError> {
        let mut analyzed = Vec::with_capacity(files.len());

        for file in files {
            run.ensure_active()?;
            let content = match self.reader.read_to_string(&file.path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("[{}] Failed to analyze file {}: {e}", run.id, file.relative_path);
                    continue;
                }
            };

            let prompt = fill_template(
                &self.prompts.code_analysis.template,
                &[
                    ("question", run.question),
                    ("filePath", &file.relative_path),
                    ("fileContent", &content),
                ],
            );

            let response = match run.call(client, &prompt).await {
                Ok(response) => response,
                Err(CallError::Cancelled) => {
                    return Err(PipelineError::cancelled(run.question, run.stage));
                }
                Err(CallError::Provider(e)) => {
                    warn!("[{}] Failed to analyze file {}: {e}", run.id, file.relative_path);
                    continue;
                }
            };

            let sections = parse_code_sections(&response.content);
            debug!(
                "[{}] {} yielded {} section(s)",
                run.id,
                file.relative_path,
                sections.len()
            );
            analyzed.push(AnalyzedFile {
                path: file.path.clone(),
                relative_path: file.relative_path.clone(),
                reason: file.reason.clone(),
                sections,
                line_count: u32::try_from(content.lines().count()).unwrap_or(u32::MAX),
            });
        }

        if analyzed.is_empty() {
            return Err(PipelineError::NoAnalyzedFiles {
                question: run.question.to_string(),
                attempted: files.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(analyzed)
    }
}

// ============================================================================
// Per-query state
// ============================================================================

enum CallError {
    Cancelled,
    Provider(ProviderError),
}

struct QueryRun<'a> {
    id: Uuid,
    question: &'a str,
    cancel: &'a CancellationToken,
    call_timeout: Duration,
    stage: PipelineStage,
    stage_started: Instant,
}

impl<'a> QueryRun<'a> {
    fn new(question: &'a str, cancel: &'a CancellationToken, call_timeout: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            cancel,
            call_timeout,
            stage: PipelineStage::Idle,
            stage_started: Instant::now(),
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug!(
            "[{}] {} -> {} after {}",
            self.id,
            self.stage,
            stage,
            humantime::format_duration(self.stage_started.elapsed())
        );
        self.stage = stage;
        self.stage_started = Instant::now();
    }

    #[track_caller]
    fn ensure_active(&self) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::cancelled(self.question, self.stage));
        }
        Ok(())
    }

    /// One model call bounded by the per-call timeout and the cancel token.
    async fn call(&self, client: &dyn ModelClient, prompt: &str) -> Result<ModelResponse, CallError> {
        if self.cancel.is_cancelled() {
            return Err(CallError::Cancelled);
        }

        let started = Instant::now();
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(CallError::Cancelled),
            outcome = tokio::time::timeout(self.call_timeout, client.query(prompt)) => outcome,
        };

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(CallError::Provider(e)),
            Err(_) => {
                return Err(CallError::Provider(ProviderError::timeout(
                    client.provider(),
                    self.call_timeout.as_secs(),
                )));
            }
        };

        debug!(
            "[{}] {} answered in {} (tokens: {})",
            self.id,
            response.model_used,
            humantime::format_duration(started.elapsed()),
            response
                .token_count
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );
        Ok(response)
    }

    /// Fatal error for a failed discovery or synthesis call.
    #[track_caller]
    fn stage_error(&self, error: CallError) -> PipelineError {
        match (error, self.stage) {
            (CallError::Cancelled, stage) => PipelineError::cancelled(self.question, stage),
            (CallError::Provider(e), PipelineStage::Synthesizing) => {
                PipelineError::synthesis(self.question, e)
            }
            (CallError::Provider(e), _) => PipelineError::discovery(self.question, e),
        }
    }
}
