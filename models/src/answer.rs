use crate::{ErrorLocation, ModelError};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A candidate file named by the discovery model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchResult {
    pub path: String,
    pub reason: String,
}

/// 1-based inclusive line span as stated by the analysis model.
///
/// Always normalized: `1 <= start <= end`. Not checked against the file
/// length here; see [`LineRange::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Zero is raised to 1 and an inverted pair is swapped.
    pub fn new(start: u32, end: u32) -> Self {
        let start = start.max(1);
        let end = end.max(1);
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn line_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Restrict the span to a file with `total_lines` lines.
    pub fn clamp_to(&self, total_lines: u32) -> Self {
        let last = total_lines.max(1);
        Self::new(self.start.min(last), self.end.min(last))
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn parse_line_number(text: &str) -> Option<u32> {
    let text = text.trim();
    let text = text
        .strip_prefix('L')
        .or_else(|| text.strip_prefix('l'))
        .unwrap_or(text);
    text.trim().parse().ok()
}

impl FromStr for LineRange {
    type Err = ModelError;

    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::LineRange {
            input: input.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let normalized = input.trim().replace(['\u{2013}', '\u{2014}'], "-");
        match normalized.split_once('-') {
            Some((start, end)) => {
                let start = parse_line_number(start).ok_or_else(invalid)?;
                let end = parse_line_number(end).ok_or_else(invalid)?;
                Ok(LineRange::new(start, end))
            }
            None => parse_line_number(&normalized)
                .map(LineRange::single)
                .ok_or_else(invalid),
        }
    }
}

impl Serialize for LineRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LineRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A relevant excerpt extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSection {
    #[serde(rename = "lines")]
    pub line_range: LineRange,
    pub code: String,
    pub explanation: String,
}

/// The synthesized answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub summary: String,
    pub details: String,
    #[serde(default)]
    pub references: Vec<String>,
}
