//! Plain-text rendering of command results.

use crate::error::CodeseekerError;

use models::{AnswerNode, ModelConfig, ModelPricing, SupportedModel};

use seeker_core::ProjectTokenCount;
use seeker_core::registry::DEFAULT_MODEL;

use std::fmt::Write;

use serde::Serialize;

const INDENT: &str = "  ";

/// Indented outline of the answer tree. Section leaves end with their
/// `path:start-end` location.
pub fn render_tree(root: &AnswerNode) -> String {
    let mut out = String::new();
    for (depth, node) in root.walk() {
        let _ = write!(out, "{}{}", INDENT.repeat(depth), node.label);
        if let Some(location) = &node.location {
            let _ = write!(
                out,
                " ({}:{}-{})",
                location.path.display(),
                location.start_line,
                location.end_line
            );
        }
        out.push('\n');
    }
    out
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, CodeseekerError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CodeseekerError::app(format!("Failed to serialize output: {e}")))
}

pub fn render_models(models: &[SupportedModel]) -> String {
    let width = models.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for model in models {
        let marker = if model.id == DEFAULT_MODEL { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "{:<width$}  {:<10} {}{marker}",
            model.id,
            model.provider.name(),
            model.display_name,
        );
    }
    out
}

/// Model ids and whether keys are present. Key values are never printed.
pub fn render_config(config: Option<&ModelConfig>) -> String {
    let Some(config) = config else {
        return String::from("No model configuration. Run `codeseeker config set`.\n");
    };

    let mut out = String::new();
    let _ = writeln!(out, "primary:   {}", config.primary_model_id);
    let _ = writeln!(out, "           key {}", key_state(config.primary_api_key.len()));
    if config.use_same_model_for_both {
        let _ = writeln!(out, "secondary: same as primary");
    } else {
        let _ = writeln!(out, "secondary: {}", config.secondary_model_id);
        let _ = writeln!(
            out,
            "           key {}",
            key_state(config.secondary_api_key.len())
        );
    }
    out
}

fn key_state(len: usize) -> String {
    if len == 0 {
        String::from("missing")
    } else {
        format!("set ({len} chars)")
    }
}

/// Per-file counts, largest first, then the total and optional input cost.
pub fn render_token_count(count: &ProjectTokenCount, cost: Option<(&str, ModelPricing)>) -> String {
    let mut files: Vec<(&String, &u64)> = count.per_file_token_counts.iter().collect();
    files.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut out = String::new();
    for (path, tokens) in files {
        let _ = writeln!(out, "{tokens:>10}  {path}");
    }
    let _ = writeln!(
        out,
        "{:>10}  total in {} file(s)",
        count.total_tokens,
        count.per_file_token_counts.len()
    );
    if let Some((model_id, pricing)) = cost {
        let usd = seeker_core::token_estimator::estimate_cost(
            &pricing,
            count.total_tokens,
            models::TokenDirection::Input,
        );
        let _ = writeln!(out, "estimated input cost with {model_id}: ${usd:.4}");
    }
    out
}
