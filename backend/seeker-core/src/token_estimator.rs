//! Token counting over project sources and cost conversion.
//!
//! Files are counted only when their extension is recognized and the first
//! 1024 bytes contain no NUL byte. Unreadable files contribute zero tokens and
//! never abort a traversal.

use crate::error::TokenError;
use crate::workspace::is_skipped_directory;

use common::ErrorLocation;

use models::{ModelPricing, TokenDirection};

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tiktoken_rs::{CoreBPE, cl100k_base};
use walkdir::WalkDir;

/// Extensions counted by default.
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    ".ts", ".js", ".jsx", ".tsx", ".py", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb", ".go",
    ".rs", ".swift", ".kt", ".scala", ".m", ".html", ".css", ".scss", ".less", ".json", ".xml",
    ".yaml", ".yml", ".md",
];

const BINARY_SNIFF_BYTES: usize = 1024;

static TOKENIZER: OnceCell<CoreBPE> = OnceCell::new();

fn tokenizer() -> Result<&'static CoreBPE, TokenError> {
    TOKENIZER.get_or_try_init(|| cl100k_base().map_err(|e| TokenError::tokenizer(e.to_string())))
}

/// Token totals for one project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTokenCount {
    pub total_tokens: u64,
    /// Keyed by path relative to the root; only files with a positive count.
    pub per_file_token_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct TokenEstimator {
    extensions: BTreeSet<String>,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_CODE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize another extension. `"RS"`, `"rs"` and `".rs"` are the same.
    ///
    /// Returns `false` when the extension was already known.
    pub fn add_code_extension(&mut self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        if ext.len() < 2 {
            return false;
        }
        self.extensions.insert(ext)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn is_code_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&normalize_extension(ext)))
    }

    pub fn count_tokens(&self, text: &str) -> Result<u64, TokenError> {
        Ok(tokenizer()?.encode_with_special_tokens(text).len() as u64)
    }

    /// Walk `root` and count every qualifying file. Blocking; run it off the
    /// async runtime.
    #[track_caller]
    pub fn project_token_count(&self, root: &Path) -> Result<ProjectTokenCount, TokenError> {
        if !root.is_dir() {
            return Err(TokenError::RootNotFound {
                path: root.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let bpe = tokenizer()?;

        let started = Instant::now();
        let mut result = ProjectTokenCount::default();

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry.file_name().to_str().is_some_and(is_skipped_directory)
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_code_extension(entry.path()) {
                continue;
            }

            let tokens = match read_text_file(entry.path()) {
                Ok(Some(text)) => bpe.encode_with_special_tokens(&text).len() as u64,
                Ok(None) => {
                    debug!("Skipping binary file {}", entry.path().display());
                    0
                }
                Err(e) => {
                    warn!("Error processing file {}: {e}", entry.path().display());
                    0
                }
            };

            if tokens > 0 {
                let relative = relative_key(root, entry.path());
                result.total_tokens += tokens;
                result.per_file_token_counts.insert(relative, tokens);
            }
        }

        info!(
            "Counted {} tokens in {} files under {} ({})",
            result.total_tokens,
            result.per_file_token_counts.len(),
            root.display(),
            humantime::format_duration(started.elapsed())
        );
        Ok(result)
    }
}

/// `token_count * (price_per_million / 1_000_000)` for the chosen direction.
pub fn estimate_cost(pricing: &ModelPricing, token_count: u64, direction: TokenDirection) -> f64 {
    pricing.estimate_cost(token_count, direction)
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// `None` when the file looks binary.
fn read_text_file(path: &Path) -> std::io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_BYTES)];
    if sniff.contains(&0) {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
