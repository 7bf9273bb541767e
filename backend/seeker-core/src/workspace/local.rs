use super::{FileEnumerator, FileReader, is_skipped_directory};
use crate::error::WorkspaceError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use log::{debug, trace, warn};
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// A workspace rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    #[track_caller]
    pub fn new(root: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| WorkspaceError::RootNotFound {
                path: root.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model-supplied paths may be absolute, `./`-prefixed or use backslashes.
    fn normalize_pattern(&self, pattern: &str) -> String {
        let pattern = pattern.trim().trim_matches('`').replace('\\', "/");
        let path = Path::new(&pattern);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Unreadable entries are logged and skipped so one bad directory does not
    /// hide every other match.
    fn walk_matching(&self, matchers: &[GlobMatcher]) -> Vec<PathBuf> {
        let mut matches = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry.file_name().to_str().is_some_and(is_skipped_directory)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {e}", self.root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if matchers.iter().any(|m| m.is_match(relative)) {
                trace!("Pattern matched {}", relative.display());
                matches.push(entry.into_path());
            }
        }

        matches
    }
}

/// True when any literal component of a normalized pattern is a skipped directory.
fn is_in_skipped_directory(pattern: &str) -> bool {
    pattern.split('/').any(is_skipped_directory)
}

#[track_caller]
fn compile(pattern: &str) -> Result<GlobMatcher, WorkspaceError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| WorkspaceError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

#[async_trait]
impl FileEnumerator for LocalWorkspace {
    /// A literal path that exists is returned directly. Otherwise the pattern
    /// is matched as a glob against every file, and a bare path is also tried
    /// at any depth.
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>, WorkspaceError> {
        let pattern = self.normalize_pattern(pattern);
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        if is_in_skipped_directory(&pattern) {
            debug!("Pattern '{pattern}' points into a skipped directory");
            return Ok(Vec::new());
        }

        let is_glob = pattern.contains(GLOB_META);
        if !is_glob {
            let candidate = self.root.join(&pattern);
            if tokio::fs::metadata(&candidate)
                .await
                .is_ok_and(|m| m.is_file())
            {
                return Ok(vec![candidate]);
            }
        }

        let mut matchers = vec![compile(&pattern)?];
        if !is_glob {
            matchers.push(compile(&format!("**/{pattern}"))?);
        }

        let workspace = self.clone();
        let found = tokio::task::spawn_blocking(move || workspace.walk_matching(&matchers))
            .await
            .map_err(|e| WorkspaceError::Enumerate {
                path: self.root.clone(),
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!("Pattern '{pattern}' matched {} file(s)", found.len());
        Ok(found)
    }

    fn relative_path(&self, path: &Path) -> String {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return path.display().to_string();
        };
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl FileReader for LocalWorkspace {
    async fn read_to_string(&self, path: &Path) -> Result<String, WorkspaceError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| WorkspaceError::Read {
                path: path.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
