use crate::support::{
    MemoryWorkspace, ScriptedClient, WORKSPACE_ROOT, answer_block, code_section, file_search,
    test_prompts,
};

use seeker_core::error::PipelineError;
use seeker_core::pipeline::tree::FILES_LABEL;
use seeker_core::{ClientHandle, ModelClient, ModelClients, PipelineStage, QueryPipeline};

use common::RedactedApiKey;

use models::ModelConfig;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

fn test_config() -> ModelConfig {
    ModelConfig {
        primary_model_id: "claude-3-sonnet-20240229".to_string(),
        secondary_model_id: "deepseek-coder-6.7b-instruct".to_string(),
        primary_api_key: RedactedApiKey::new("primary"),
        secondary_api_key: RedactedApiKey::new("secondary"),
        use_same_model_for_both: false,
    }
}

fn handle(primary: Arc<ScriptedClient>, secondary: Arc<ScriptedClient>) -> ClientHandle {
    let primary: Arc<dyn ModelClient> = primary;
    let secondary: Arc<dyn ModelClient> = secondary;
    ClientHandle::with_clients(ModelClients::new(test_config(), primary, secondary))
}

fn pipeline(clients: ClientHandle, workspace: MemoryWorkspace) -> QueryPipeline {
    let workspace = workspace.into_arc();
    QueryPipeline::new(clients, workspace.clone(), workspace, test_prompts())
}

/// Primary model that analyzes any file with one section and then answers.
fn analyzing_primary() -> ScriptedClient {
    ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
        if prompt.starts_with("ANALYZE") {
            Ok(code_section("1-2", "fn x() {}", "relevant bit"))
        } else {
            Ok(answer_block("summary", "details", "a.rs"))
        }
    })
}

// ============================================================================
// Happy path
// ============================================================================

/// **VALUE**: Full discovery -> analysis -> synthesis run produces the tree
/// the front end renders.
///
/// **WHY THIS MATTERS**: This is the single entry point users hit; every
/// stage has to hand the right data to the next.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - discovery used the primary model instead of the secondary
/// - the analysis prompt lacked the file path or content
/// - section labels or locations were built from the wrong fields
#[tokio::test]
async fn given_single_candidate_when_getting_answer_then_tree_has_file_and_section() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok("*FILE_SEARCH*\npath: src/foo.ts\nreason: handles parsing\n*END_FILE_SEARCH*".to_string())
    }));
    let primary = Arc::new(ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
        if prompt.starts_with("ANALYZE") {
            Ok(code_section("10-20", "function parse() {}", "parses input"))
        } else {
            Ok(answer_block("Parsing happens in foo", "See parse()", "src/foo.ts"))
        }
    }));
    let workspace = MemoryWorkspace::new().with_file("src/foo.ts", "line\n".repeat(30).as_str());
    let pipeline = pipeline(handle(primary.clone(), secondary.clone()), workspace);

    // WHEN
    let tree = pipeline
        .get_answer("where is input parsed?")
        .await
        .expect("answer");

    // THEN: secondary did discovery, primary did analysis then synthesis
    assert_eq!(secondary.prompts(), vec!["DISCOVER where is input parsed?".to_string()]);
    let primary_prompts = primary.prompts();
    assert_eq!(primary_prompts.len(), 2);
    assert!(primary_prompts[0].starts_with("ANALYZE src/foo.ts\nQ: where is input parsed?\nline\n"));
    assert!(primary_prompts[1].starts_with("SYNTHESIZE"));

    // THEN: tree shape
    let files = tree.child(FILES_LABEL).expect("files branch");
    assert_eq!(files.children.len(), 1);
    let file = &files.children[0];
    assert_eq!(file.label, "src/foo.ts");
    assert_eq!(file.children[0].label, "Why: handles parsing");
    assert_eq!(file.children[1].label, "Lines 10-20: parses input");

    let location = file.children[1].location.as_ref().expect("location");
    assert_eq!(location.path, PathBuf::from(WORKSPACE_ROOT).join("src/foo.ts"));
    assert_eq!((location.start_line, location.end_line), (10, 20));

    let summary = tree.child("Summary").expect("summary branch");
    assert_eq!(summary.children[0].label, "Parsing happens in foo");
}

#[tokio::test]
async fn given_analyzed_files_when_synthesizing_then_code_results_are_json_with_sections() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(file_search("a.rs", "entry"))
    }));
    let primary = Arc::new(analyzing_primary());
    let pipeline = pipeline(
        handle(primary.clone(), secondary),
        MemoryWorkspace::new().with_file("a.rs", "fn x() {}\n"),
    );

    // WHEN
    pipeline.get_answer("q").await.expect("answer");

    // THEN
    let synthesis = primary.prompts().pop().expect("synthesis prompt");
    let json = synthesis
        .strip_prefix("SYNTHESIZE q\n")
        .expect("template prefix");
    let parsed: serde_json::Value = serde_json::from_str(json).expect("valid JSON");
    assert_eq!(parsed[0]["path"], "a.rs");
    assert_eq!(parsed[0]["reason"], "entry");
    assert_eq!(parsed[0]["sections"][0]["lines"], "1-2");
    assert_eq!(parsed[0]["sections"][0]["explanation"], "relevant bit");
}

#[tokio::test]
async fn given_synthesis_without_answer_block_when_getting_answer_then_tree_has_no_summary() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(file_search("a.rs", "entry"))
    }));
    let primary = Arc::new(ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
        if prompt.starts_with("ANALYZE") {
            Ok(String::new())
        } else {
            Ok("I am not sure.".to_string())
        }
    }));
    let pipeline = pipeline(
        handle(primary, secondary),
        MemoryWorkspace::new().with_file("a.rs", "fn x() {}\n"),
    );

    let tree = pipeline.get_answer("q").await.expect("answer");

    assert!(tree.child("Summary").is_none());
    let file = &tree.child(FILES_LABEL).expect("files").children[0];
    assert_eq!(file.children.len(), 1, "only the Why node");
}

#[tokio::test]
async fn given_duplicate_and_unresolvable_candidates_when_discovering_then_each_file_analyzed_once() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!(
            "{}{}{}",
            file_search("a.rs", "first"),
            file_search("missing.rs", "hallucinated"),
            file_search("a.rs", "again"),
        ))
    }));
    let primary = Arc::new(analyzing_primary());
    let pipeline = pipeline(
        handle(primary.clone(), secondary),
        MemoryWorkspace::new().with_file("a.rs", "fn x() {}\n"),
    );

    // WHEN
    let tree = pipeline.get_answer("q").await.expect("answer");

    // THEN
    let files = tree.child(FILES_LABEL).expect("files");
    assert_eq!(files.children.len(), 1);
    assert_eq!(files.children[0].children[0].label, "Why: first");
    let analyses = primary
        .prompts()
        .iter()
        .filter(|p| p.starts_with("ANALYZE"))
        .count();
    assert_eq!(analyses, 1);
}

// ============================================================================
// Partial failure
// ============================================================================

/// **VALUE**: One unreadable file out of three does not sink the query.
///
/// **BUG THIS CATCHES**: Propagating a per-file error out of the analysis loop,
/// or leaving the failed file in the synthesis input.
#[tokio::test]
async fn given_one_of_three_files_unreadable_when_getting_answer_then_other_two_are_kept() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!(
            "{}{}{}",
            file_search("a.rs", "one"),
            file_search("locked.rs", "two"),
            file_search("c.rs", "three"),
        ))
    }));
    let primary = Arc::new(analyzing_primary());
    let workspace = MemoryWorkspace::new()
        .with_file("a.rs", "fn a() {}\n")
        .with_unreadable_file("locked.rs")
        .with_file("c.rs", "fn c() {}\n");
    let pipeline = pipeline(handle(primary.clone(), secondary), workspace);

    // WHEN
    let tree = pipeline.get_answer("q").await.expect("answer");

    // THEN
    let labels: Vec<&str> = tree
        .child(FILES_LABEL)
        .expect("files")
        .children
        .iter()
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(labels, vec!["a.rs", "c.rs"]);

    let synthesis = primary.prompts().pop().expect("synthesis ran");
    assert!(synthesis.starts_with("SYNTHESIZE"));
    assert!(synthesis.contains("\"a.rs\"") && synthesis.contains("\"c.rs\""));
    assert!(!synthesis.contains("locked.rs"));
}

#[tokio::test]
async fn given_analysis_call_fails_for_one_file_when_getting_answer_then_file_is_skipped() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!("{}{}", file_search("bad.rs", "x"), file_search("good.rs", "y")))
    }));
    let primary = Arc::new(ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
        if prompt.starts_with("ANALYZE bad.rs") {
            Err(seeker_core::error::ProviderError::from_status(
                models::Provider::Anthropic,
                StatusCode::INTERNAL_SERVER_ERROR,
                "boom",
            ))
        } else if prompt.starts_with("ANALYZE") {
            Ok(code_section("1", "x", "y"))
        } else {
            Ok(answer_block("s", "d", ""))
        }
    }));
    let workspace = MemoryWorkspace::new()
        .with_file("bad.rs", "x\n")
        .with_file("good.rs", "y\n");
    let pipeline = pipeline(handle(primary, secondary), workspace);

    let tree = pipeline.get_answer("q").await.expect("answer");

    let files = tree.child(FILES_LABEL).expect("files");
    assert_eq!(files.children.len(), 1);
    assert_eq!(files.children[0].label, "good.rs");
}

// ============================================================================
// Fatal failures
// ============================================================================

/// **VALUE**: A failing discovery call rejects the whole query.
///
/// **BUG THIS CATCHES**: Returning an empty tree instead of an error, which
/// would look like "no relevant code" to the user.
#[tokio::test]
async fn given_secondary_model_fails_when_getting_answer_then_discovery_error_keeps_question() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::failing(
        "deepseek-coder-6.7b-instruct",
        StatusCode::UNAUTHORIZED,
    ));
    let primary = Arc::new(analyzing_primary());
    let pipeline = pipeline(handle(primary.clone(), secondary), MemoryWorkspace::new());

    // WHEN
    let err = pipeline
        .get_answer("how does auth work?")
        .await
        .expect_err("discovery failure is fatal");

    // THEN
    assert!(matches!(err, PipelineError::Discovery { .. }));
    assert_eq!(err.question(), "how does auth work?");
    assert!(err.to_string().contains("401"));
    assert!(primary.prompts().is_empty());
}

#[tokio::test]
async fn given_no_candidate_resolves_when_getting_answer_then_no_candidate_files_error() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(file_search("nowhere.rs", "made up"))
    }));
    let primary = Arc::new(analyzing_primary());
    let pipeline = pipeline(handle(primary.clone(), secondary), MemoryWorkspace::new());

    let err = pipeline.get_answer("q").await.expect_err("nothing to analyze");

    assert!(matches!(err, PipelineError::NoCandidateFiles { .. }));
    assert!(primary.prompts().is_empty());
}

#[tokio::test]
async fn given_discovery_output_without_blocks_when_getting_answer_then_no_candidate_files_error() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok("Sorry, I cannot help with that.".to_string())
    }));
    let pipeline = pipeline(
        handle(Arc::new(analyzing_primary()), secondary),
        MemoryWorkspace::new().with_file("a.rs", ""),
    );

    let err = pipeline.get_answer("q").await.expect_err("nothing to analyze");

    assert!(matches!(err, PipelineError::NoCandidateFiles { .. }));
}

/// **VALUE**: Every file failing analysis fails the query instead of
/// synthesizing an answer from no evidence.
#[tokio::test]
async fn given_every_file_fails_analysis_when_getting_answer_then_no_analyzed_files_error() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!("{}{}", file_search("a.rs", "x"), file_search("b.rs", "y")))
    }));
    let primary = Arc::new(ScriptedClient::failing(
        "claude-3-sonnet-20240229",
        StatusCode::SERVICE_UNAVAILABLE,
    ));
    let workspace = MemoryWorkspace::new().with_file("a.rs", "").with_file("b.rs", "");
    let pipeline = pipeline(handle(primary.clone(), secondary), workspace);

    // WHEN
    let err = pipeline.get_answer("q").await.expect_err("no evidence");

    // THEN
    match err {
        PipelineError::NoAnalyzedFiles { attempted, .. } => assert_eq!(attempted, 2),
        other => panic!("expected NoAnalyzedFiles, got {other:?}"),
    }
    assert!(primary.prompts().iter().all(|p| p.starts_with("ANALYZE")));
}

#[tokio::test]
async fn given_synthesis_call_fails_when_getting_answer_then_synthesis_error() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(file_search("a.rs", "x"))
    }));
    let primary = Arc::new(ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
        if prompt.starts_with("ANALYZE") {
            Ok(code_section("1", "x", "y"))
        } else {
            Err(seeker_core::error::ProviderError::malformed(
                models::Provider::Anthropic,
                "content[].text",
            ))
        }
    }));
    let pipeline = pipeline(
        handle(primary, secondary),
        MemoryWorkspace::new().with_file("a.rs", "x\n"),
    );

    let err = pipeline.get_answer("q").await.expect_err("synthesis is fatal");

    assert!(matches!(err, PipelineError::Synthesis { .. }));
    assert_eq!(err.question(), "q");
}

#[tokio::test]
async fn given_no_clients_when_getting_answer_then_not_configured_error() {
    let pipeline = pipeline(ClientHandle::new(), MemoryWorkspace::new());

    let err = pipeline.get_answer("q").await.expect_err("not configured");

    assert!(matches!(err, PipelineError::NotConfigured { .. }));
}

// ============================================================================
// Timeouts, cancellation, reloads
// ============================================================================

#[tokio::test]
async fn given_slow_discovery_when_call_times_out_then_discovery_error() {
    // GIVEN
    let secondary = Arc::new(
        ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| Ok(file_search("a.rs", "x")))
            .with_delay(Duration::from_secs(5)),
    );
    let pipeline = pipeline(
        handle(Arc::new(analyzing_primary()), secondary),
        MemoryWorkspace::new().with_file("a.rs", ""),
    )
    .with_call_timeout(Duration::from_millis(50));

    // WHEN
    let err = pipeline.get_answer("q").await.expect_err("timed out");

    // THEN
    assert!(matches!(err, PipelineError::Discovery { .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn given_every_analysis_times_out_when_getting_answer_then_no_analyzed_files_error() {
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!("{}{}", file_search("slow.rs", "x"), file_search("fast.rs", "y")))
    }));
    let slow_primary = Arc::new(
        ScriptedClient::new("claude-3-sonnet-20240229", |prompt| {
            if prompt.starts_with("ANALYZE") {
                Ok(code_section("1", "x", "y"))
            } else {
                Ok(answer_block("s", "d", ""))
            }
        })
        .with_delay(Duration::from_secs(5)),
    );
    let pipeline = pipeline(
        handle(slow_primary, secondary),
        MemoryWorkspace::new()
            .with_file("slow.rs", "")
            .with_file("fast.rs", ""),
    )
    .with_call_timeout(Duration::from_millis(20));

    let err = pipeline.get_answer("q").await.expect_err("all analyses timed out");

    assert!(matches!(err, PipelineError::NoAnalyzedFiles { attempted: 2, .. }));
}

#[tokio::test]
async fn given_cancelled_token_when_getting_answer_then_no_model_is_called() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(file_search("a.rs", "x"))
    }));
    let pipeline = pipeline(
        handle(Arc::new(analyzing_primary()), secondary.clone()),
        MemoryWorkspace::new().with_file("a.rs", ""),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    // WHEN
    let err = pipeline
        .get_answer_with_cancel("q", &cancel)
        .await
        .expect_err("cancelled");

    // THEN
    assert!(err.is_cancelled());
    assert!(secondary.prompts().is_empty());
}

/// **VALUE**: Cancelling during a long analysis stops the query without
/// waiting for the remaining files.
#[tokio::test]
async fn given_cancel_during_analysis_when_getting_answer_then_cancelled_in_analysis_stage() {
    // GIVEN
    let secondary = Arc::new(ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| {
        Ok(format!("{}{}", file_search("a.rs", "x"), file_search("b.rs", "y")))
    }));
    let primary = Arc::new(
        ScriptedClient::new("claude-3-sonnet-20240229", |_| Ok(code_section("1", "x", "y")))
            .with_delay(Duration::from_secs(5)),
    );
    let pipeline = pipeline(
        handle(primary.clone(), secondary),
        MemoryWorkspace::new().with_file("a.rs", "").with_file("b.rs", ""),
    );
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    // WHEN
    let err = pipeline
        .get_answer_with_cancel("q", &cancel)
        .await
        .expect_err("cancelled");

    // THEN
    match err {
        PipelineError::Cancelled { stage, .. } => assert_eq!(stage, PipelineStage::Analyzing),
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(primary.prompts().len(), 1, "second file never started");
}

/// **VALUE**: A query keeps the client set it started with when the
/// configuration is swapped mid-flight.
///
/// **BUG THIS CATCHES**: Re-reading the shared handle between stages, which
/// would mix the old discovery model with the new analysis model.
#[tokio::test]
async fn given_clients_swapped_mid_query_when_query_finishes_then_old_set_was_used_throughout() {
    // GIVEN
    let old_secondary = Arc::new(
        ScriptedClient::new("deepseek-coder-6.7b-instruct", |_| Ok(file_search("a.rs", "x")))
            .with_delay(Duration::from_millis(100)),
    );
    let old_primary = Arc::new(analyzing_primary());
    let clients = handle(old_primary.clone(), old_secondary);
    let pipeline = Arc::new(pipeline(
        clients.clone(),
        MemoryWorkspace::new().with_file("a.rs", "fn x() {}\n"),
    ));

    let running = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.get_answer("q").await })
    };

    // WHEN: swap to a set that always fails while discovery is in flight
    tokio::time::sleep(Duration::from_millis(20)).await;
    let new_primary: Arc<dyn ModelClient> = Arc::new(ScriptedClient::failing(
        "claude-2.1",
        StatusCode::UNAUTHORIZED,
    ));
    clients
        .swap(ModelClients::shared(test_config(), new_primary))
        .await;

    // THEN
    let tree = running.await.expect("task joined").expect("old set answered");
    assert_eq!(tree.child(FILES_LABEL).expect("files").children.len(), 1);
    assert_eq!(old_primary.prompts().len(), 2);

    // A query started after the swap sees the new set.
    let err = pipeline.get_answer("q").await.expect_err("new set fails");
    assert!(matches!(err, PipelineError::Discovery { .. }));
}
