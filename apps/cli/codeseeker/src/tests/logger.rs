// Unit tests for logger initialization
// The global logger can only be installed once per process, so these run serially

use crate::logger::{
    LOG_FILE_NAME, file_level, initialize, initialize_internal, terminal_level,
};

use std::path::PathBuf;

use log::LevelFilter;
use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: fern panics-by-error when a second global logger is
/// installed. Tests and embedding code may call initialize more than once.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed.
#[test]
#[serial]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable log directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let first = initialize(temp_dir.path(), false);
    let second = initialize(temp_dir.path(), true);

    // THEN: Both return Ok
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be a no-op");
}

/// **VALUE**: An unwritable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` were unwrapped.
#[test]
#[serial]
fn given_invalid_log_dir_when_initializing_then_returns_error() {
    // GIVEN: A path under a file, which can never be a directory
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    let invalid_dir = PathBuf::from(&blocker).join("logs");

    // WHEN: Building the dispatch for that directory
    let result = initialize_internal(&invalid_dir, false);

    // THEN: The log file error is reported
    let err = result.unwrap_err().to_string();
    assert!(err.contains("Failed to create log file"), "got: {err}");
    assert!(!invalid_dir.join(LOG_FILE_NAME).exists());
}

#[test]
fn given_verbose_flag_when_choosing_levels_then_terminal_shows_debug() {
    assert_eq!(terminal_level(true), LevelFilter::Debug);
    assert_eq!(file_level(true), LevelFilter::Debug);
}

#[test]
fn given_no_verbose_flag_when_choosing_levels_then_terminal_shows_warnings_only() {
    assert_eq!(terminal_level(false), LevelFilter::Warn);
    assert!(file_level(false) >= LevelFilter::Info);
}
