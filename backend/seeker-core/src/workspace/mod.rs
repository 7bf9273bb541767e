//! File collaborators used by the query pipeline.
//!
//! The pipeline never touches the filesystem directly. It resolves the paths a
//! model names through a [`FileEnumerator`] and reads them through a
//! [`FileReader`], so an editor integration can supply its own workspace view.
//! [`LocalWorkspace`] implements both over a directory on disk.

pub mod local;

pub use local::LocalWorkspace;

use crate::error::WorkspaceError;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Directory names never descended into.
pub const SKIPPED_DIRECTORIES: &[&str] = &[".git", "node_modules"];

#[async_trait]
pub trait FileEnumerator: Send + Sync {
    /// Absolute paths matching a workspace-relative path or glob.
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>, WorkspaceError>;

    /// Display form of `path` relative to the workspace root.
    fn relative_path(&self, path: &Path) -> String;
}

#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> Result<String, WorkspaceError>;
}

pub fn is_skipped_directory(name: &str) -> bool {
    SKIPPED_DIRECTORIES.contains(&name)
}
