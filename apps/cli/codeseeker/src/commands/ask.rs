use crate::context::AppContext;
use crate::error::CodeseekerError;
use crate::render::{render_json, render_tree};

use seeker_core::{LocalWorkspace, QueryPipeline};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use tokio_util::sync::CancellationToken;

/// Answer `question` against the workspace at `root`.
pub async fn run(
    ctx: &AppContext,
    question: &str,
    root: &Path,
    json: bool,
    cancel: &CancellationToken,
) -> Result<String, CodeseekerError> {
    if question.trim().is_empty() {
        return Err(CodeseekerError::app("Question cannot be empty"));
    }

    let workspace = Arc::new(LocalWorkspace::new(root)?);
    info!("Answering against {}", workspace.root().display());

    let pipeline = QueryPipeline::new(
        ctx.service.client_handle(),
        workspace.clone(),
        workspace,
        ctx.prompts.clone(),
    )
    .with_call_timeout(ctx.call_timeout);

    let started = Instant::now();
    let tree = pipeline.get_answer_with_cancel(question, cancel).await?;
    info!(
        "Answer ready in {}",
        humantime::format_duration(started.elapsed())
    );

    if json {
        render_json(&tree)
    } else {
        Ok(render_tree(&tree))
    }
}
