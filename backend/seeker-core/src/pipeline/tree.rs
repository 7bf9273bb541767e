use super::AnalyzedFile;

use models::{Answer, AnswerNode, SourceLocation};

pub const ROOT_LABEL: &str = "Answer";
pub const SUMMARY_LABEL: &str = "Summary";
pub const DETAILS_LABEL: &str = "Details";
pub const REFERENCES_LABEL: &str = "References";
pub const FILES_LABEL: &str = "Relevant Files";

/// Display tree for one query.
///
/// The summary branch is present only when an answer was parsed. Section
/// leaves navigate to their line range clamped to the file's length.
pub fn build_answer_tree(answer: Option<&Answer>, files: &[AnalyzedFile]) -> AnswerNode {
    let mut root = AnswerNode::leaf(ROOT_LABEL);

    if let Some(answer) = answer {
        let mut summary = AnswerNode::branch(
            SUMMARY_LABEL,
            vec![
                AnswerNode::leaf(&answer.summary),
                AnswerNode::branch(DETAILS_LABEL, vec![AnswerNode::leaf(&answer.details)]),
            ],
        );
        if !answer.references.is_empty() {
            summary.push(AnswerNode::branch(
                REFERENCES_LABEL,
                answer.references.iter().map(AnswerNode::leaf).collect(),
            ));
        }
        root.push(summary);
    }

    let mut files_node = AnswerNode::leaf(FILES_LABEL);
    for file in files {
        files_node.push(file_node(file));
    }
    root.push(files_node);

    root
}

fn file_node(file: &AnalyzedFile) -> AnswerNode {
    let mut node = AnswerNode::branch(
        &file.relative_path,
        vec![AnswerNode::leaf(format!("Why: {}", file.reason))],
    );

    for section in &file.sections {
        let target = section.line_range.clamp_to(file.line_count);
        node.push(
            AnswerNode::leaf(format!(
                "Lines {}: {}",
                section.line_range, section.explanation
            ))
            .with_location(SourceLocation {
                path: file.path.clone(),
                start_line: target.start,
                end_line: target.end,
            }),
        );
    }

    node
}
