use std::path::PathBuf;

use serde::Serialize;

/// Where a tree leaf points in the workspace. Lines are 1-based inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub path: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
}

/// One node of the display tree built for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerNode {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AnswerNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl AnswerNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            location: None,
        }
    }

    pub fn branch(label: impl Into<String>, children: Vec<AnswerNode>) -> Self {
        Self {
            label: label.into(),
            children,
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn push(&mut self, child: AnswerNode) {
        self.children.push(child);
    }

    /// First direct child with exactly this label.
    pub fn child(&self, label: &str) -> Option<&AnswerNode> {
        self.children.iter().find(|c| c.label == label)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first walk yielding `(depth, node)`, root at depth 0.
    pub fn walk(&self) -> Vec<(usize, &AnswerNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}
