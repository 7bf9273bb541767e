//! Extracts structured records from free-form model output.
//!
//! Models are prompted to wrap each record in a delimited block:
//!
//! ```text
//! *FILE_SEARCH*
//! path: src/foo.rs
//! reason: handles parsing
//! *END_FILE_SEARCH*
//! ```
//!
//! Inside a block every field is a `key: value` line. Keys match
//! case-insensitively and may carry a leading list marker (`-`, `*`, `+`).
//! A field whose inline value is empty collects the following lines up to the
//! next recognized key at the start of a line. Indented lines always belong to
//! the value, so code bodies containing `code:` or `path:` survive.
//!
//! Parsing never fails. A truncated block, a block missing a required field
//! or a block with an unreadable line range is dropped and logged at debug
//! level; the remaining blocks are still returned.

use models::{Answer, CodeSection, FileSearchResult, LineRange};

use log::debug;

const FILE_SEARCH: &str = "FILE_SEARCH";
const CODE_SECTION: &str = "CODE_SECTION";
const ANSWER: &str = "ANSWER";

const FILE_SEARCH_FIELDS: &[&str] = &["path", "reason"];
const CODE_SECTION_FIELDS: &[&str] = &["lines", "code", "explanation"];
const ANSWER_FIELDS: &[&str] = &["summary", "details", "references"];

/// Every well-formed `FILE_SEARCH` block, in document order.
pub fn parse_file_search(text: &str) -> Vec<FileSearchResult> {
    blocks(text, FILE_SEARCH)
        .into_iter()
        .filter_map(|body| {
            let fields = Fields::parse(body, FILE_SEARCH_FIELDS);
            match (fields.get("path"), fields.get("reason")) {
                (Some(path), Some(reason)) => Some(FileSearchResult {
                    path: path.to_string(),
                    reason: reason.to_string(),
                }),
                _ => {
                    debug!("Dropping {FILE_SEARCH} block without path and reason");
                    None
                }
            }
        })
        .collect()
}

/// Every well-formed `CODE_SECTION` block, in document order.
pub fn parse_code_sections(text: &str) -> Vec<CodeSection> {
    blocks(text, CODE_SECTION)
        .into_iter()
        .filter_map(|body| {
            let fields = Fields::parse(body, CODE_SECTION_FIELDS);
            let (Some(lines), Some(code), Some(explanation)) = (
                fields.get("lines"),
                fields.get("code"),
                fields.get("explanation"),
            ) else {
                debug!("Dropping {CODE_SECTION} block with missing fields");
                return None;
            };

            match lines.parse::<LineRange>() {
                Ok(line_range) => Some(CodeSection {
                    line_range,
                    code: code.to_string(),
                    explanation: explanation.to_string(),
                }),
                Err(e) => {
                    debug!("Dropping {CODE_SECTION} block: {e}");
                    None
                }
            }
        })
        .collect()
}

/// The first `ANSWER` block, if it carries a summary and details.
///
/// Later `ANSWER` blocks are ignored even when the first one is incomplete.
pub fn parse_answer(text: &str) -> Option<Answer> {
    let body = blocks(text, ANSWER).into_iter().next()?;
    let fields = Fields::parse(body, ANSWER_FIELDS);

    let (Some(summary), Some(details)) = (fields.get("summary"), fields.get("details")) else {
        debug!("Dropping {ANSWER} block without summary and details");
        return None;
    };

    Some(Answer {
        summary: summary.to_string(),
        details: details.to_string(),
        references: fields.get("references").map(split_list).unwrap_or_default(),
    })
}

// ============================================================================
// Block scanning
// ============================================================================

/// Bodies of every complete `*NAME* ... *END_NAME*` block.
///
/// An opening tag followed by another opening tag before its close is treated
/// as truncated; scanning resumes at the later tag. An unterminated final
/// block is dropped.
fn blocks<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let open = format!("*{name}*");
    let close = format!("*END_{name}*");

    let mut found = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(&open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(&close) else {
            debug!("Dropping unterminated {name} block");
            break;
        };

        let body = &after_open[..end];
        match body.rfind(&open) {
            Some(reopen) => {
                debug!("Dropping truncated {name} block");
                found.push(&body[reopen + open.len()..]);
            }
            None => found.push(body),
        }
        rest = &after_open[end + close.len()..];
    }

    found
}

// ============================================================================
// Field extraction
// ============================================================================

struct Fields<'k> {
    values: Vec<(&'k str, String)>,
}

impl<'k> Fields<'k> {
    fn parse(body: &str, keys: &[&'k str]) -> Self {
        let mut values: Vec<(&'k str, String)> = Vec::new();
        let mut collecting: Option<usize> = None;

        for line in body.lines() {
            // Inside a multi-line value only an unindented key starts a new field.
            let continues_value = collecting.is_some() && line.starts_with([' ', '\t']);
            if let Some((key, value)) = field_line(line, keys).filter(|_| !continues_value) {
                if values.iter().any(|(k, _)| *k == key) {
                    // First occurrence wins.
                    collecting = None;
                    continue;
                }
                values.push((key, value.to_string()));
                collecting = value.is_empty().then_some(values.len() - 1);
                continue;
            }

            if let Some(index) = collecting {
                let entry = &mut values[index].1;
                if !entry.is_empty() || !line.trim().is_empty() {
                    if !entry.is_empty() {
                        entry.push('\n');
                    }
                    entry.push_str(line);
                }
            }
        }

        for (_, value) in values.iter_mut() {
            *value = value.trim().to_string();
        }

        Self { values }
    }

    /// A field counts as present only when its value is non-empty.
    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

fn field_line<'k, 'l>(line: &'l str, keys: &[&'k str]) -> Option<(&'k str, &'l str)> {
    let line = line.trim_start();
    let line = line
        .strip_prefix(['-', '*', '+'])
        .map(str::trim_start)
        .unwrap_or(line);

    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    keys.iter()
        .find(|k| k.eq_ignore_ascii_case(key))
        .map(|k| (*k, value.trim()))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

