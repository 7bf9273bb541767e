use crate::render::{render_config, render_models, render_token_count, render_tree};

use models::{AnswerNode, ModelConfig, ModelPricing, SourceLocation};

use seeker_core::ProjectTokenCount;
use seeker_core::registry::supported_models;

use std::path::PathBuf;

#[test]
fn given_answer_tree_when_rendered_then_outline_is_indented_with_locations() {
    // GIVEN
    let section = AnswerNode::leaf("Lines 3-5: opens the pool").with_location(SourceLocation {
        path: PathBuf::from("/repo/src/db.rs"),
        start_line: 3,
        end_line: 5,
    });
    let tree = AnswerNode::branch(
        "Answer",
        vec![
            AnswerNode::branch("Summary", vec![AnswerNode::leaf("Pool lives in db.rs")]),
            AnswerNode::branch(
                "Relevant Files",
                vec![AnswerNode::branch(
                    "src/db.rs",
                    vec![AnswerNode::leaf("Why: connection setup"), section],
                )],
            ),
        ],
    );

    // WHEN
    let text = render_tree(&tree);

    // THEN
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Answer",
            "  Summary",
            "    Pool lives in db.rs",
            "  Relevant Files",
            "    src/db.rs",
            "      Why: connection setup",
            "      Lines 3-5: opens the pool (/repo/src/db.rs:3-5)",
        ]
    );
}

#[test]
fn given_catalog_when_rendered_then_every_model_listed_and_default_marked() {
    let models = supported_models();

    let text = render_models(&models);

    assert_eq!(text.lines().count(), models.len());
    let default_line = text
        .lines()
        .find(|l| l.contains("(default)"))
        .expect("default marked");
    assert!(default_line.starts_with("claude-3-sonnet-20240229"));
}

/// **VALUE**: `config show` reports key presence without the key itself.
///
/// **BUG THIS CATCHES**: Would catch rendering through `as_str()` or a
/// serializer that exposes the raw key.
#[test]
fn given_config_with_keys_when_rendered_then_keys_never_appear() {
    let config = ModelConfig::builder()
        .with_primary_model("claude-3-opus-20240229")
        .with_secondary_model("deepseek-coder-6.7b-instruct")
        .with_primary_api_key("sk-ant-secret-value")
        .with_secondary_api_key("ds-secret")
        .build()
        .unwrap();

    let text = render_config(Some(&config));

    assert!(!text.contains("sk-ant-secret-value"));
    assert!(!text.contains("ds-secret"));
    assert!(text.contains("set (19 chars)"));
    assert!(text.contains("deepseek-coder-6.7b-instruct"));
}

#[test]
fn given_no_config_when_rendered_then_points_at_config_set() {
    assert!(render_config(None).contains("codeseeker config set"));
}

#[test]
fn given_token_counts_when_rendered_then_largest_first_with_cost() {
    let mut count = ProjectTokenCount::default();
    count.per_file_token_counts.insert("a.rs".into(), 100);
    count.per_file_token_counts.insert("b.rs".into(), 900_000);
    count.total_tokens = 900_100;

    let text = render_token_count(
        &count,
        Some(("claude-3-sonnet-20240229", ModelPricing::new(3.0, 15.0))),
    );

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].ends_with("b.rs"));
    assert!(lines[1].ends_with("a.rs"));
    assert!(lines[2].contains("900100"));
    assert!(lines[2].contains("2 file(s)"));
    assert_eq!(
        lines[3],
        "estimated input cost with claude-3-sonnet-20240229: $2.7003"
    );
}
