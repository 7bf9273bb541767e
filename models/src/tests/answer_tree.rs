use crate::{AnswerNode, SourceLocation};

use std::path::PathBuf;

fn sample_tree() -> AnswerNode {
    let section = AnswerNode::leaf("Lines 1-2: entry").with_location(SourceLocation {
        path: PathBuf::from("/ws/src/main.rs"),
        start_line: 1,
        end_line: 2,
    });
    let file = AnswerNode::branch("src/main.rs", vec![AnswerNode::leaf("Why: entry point"), section]);
    AnswerNode::branch(
        "Answer",
        vec![
            AnswerNode::branch("Summary", vec![AnswerNode::leaf("It starts in main")]),
            AnswerNode::branch("Relevant Files", vec![file]),
        ],
    )
}

#[test]
fn given_tree_when_walked_then_yields_depth_first_order() {
    let tree = sample_tree();

    let labels: Vec<(usize, &str)> = tree
        .walk()
        .into_iter()
        .map(|(depth, node)| (depth, node.label.as_str()))
        .collect();

    assert_eq!(
        labels,
        vec![
            (0, "Answer"),
            (1, "Summary"),
            (2, "It starts in main"),
            (1, "Relevant Files"),
            (2, "src/main.rs"),
            (3, "Why: entry point"),
            (3, "Lines 1-2: entry"),
        ]
    );
}

#[test]
fn given_tree_when_child_looked_up_by_label_then_found() {
    let tree = sample_tree();

    let file = tree
        .child("Relevant Files")
        .and_then(|files| files.child("src/main.rs"))
        .unwrap();

    assert_eq!(file.children.len(), 2);
    assert!(file.children[1].location.is_some());
    assert!(tree.child("Missing").is_none());
}

#[test]
fn given_leaf_without_location_when_serialized_then_omits_empty_fields() {
    let json = serde_json::to_value(AnswerNode::leaf("plain")).unwrap();

    assert_eq!(json, serde_json::json!({ "label": "plain" }));
}
