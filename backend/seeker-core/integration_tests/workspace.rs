use seeker_core::error::WorkspaceError;
use seeker_core::{FileEnumerator, FileReader, LocalWorkspace};

use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();
    for (relative, contents) in [
        ("src/foo.ts", "export const foo = 1;\n"),
        ("src/nested/bar.ts", "export const bar = 2;\n"),
        ("node_modules/lib/foo.ts", "vendored\n"),
        ("README.md", "# readme\n"),
    ] {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
        fs::write(path, contents).expect("write");
    }
    dir
}

fn names(workspace: &LocalWorkspace, paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| workspace.relative_path(p)).collect()
}

#[tokio::test]
async fn given_existing_relative_path_when_finding_files_then_returns_that_file() {
    // GIVEN
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    // WHEN
    let found = workspace.find_files("src/foo.ts").await.expect("found");

    // THEN
    assert_eq!(names(&workspace, &found), vec!["src/foo.ts"]);
    assert!(found[0].is_absolute());
}

#[tokio::test]
async fn given_dot_slash_and_backslash_paths_when_finding_files_then_both_resolve() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    let dotted = workspace.find_files("./src/foo.ts").await.expect("found");
    let windows = workspace.find_files("src\\nested\\bar.ts").await.expect("found");

    assert_eq!(names(&workspace, &dotted), vec!["src/foo.ts"]);
    assert_eq!(names(&workspace, &windows), vec!["src/nested/bar.ts"]);
}

/// **VALUE**: Glob patterns search the tree but never enter `node_modules`.
///
/// **BUG THIS CATCHES**: A walker that ignores the skip list would return the
/// vendored copy and the pipeline would analyze third-party code.
#[tokio::test]
async fn given_glob_pattern_when_finding_files_then_skipped_directories_are_excluded() {
    // GIVEN
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    // WHEN
    let found = workspace.find_files("**/*.ts").await.expect("found");

    // THEN
    assert_eq!(
        names(&workspace, &found),
        vec!["src/foo.ts", "src/nested/bar.ts"]
    );
}

/// **VALUE**: A literal path the model names inside a skipped directory is
/// treated like any other excluded file.
///
/// **BUG THIS CATCHES**: The literal fast path returning `.git/config` or a
/// vendored file because it exists on disk, bypassing the skip list the glob
/// walk honors.
#[tokio::test]
async fn given_literal_path_inside_skipped_directory_when_finding_files_then_returns_empty() {
    // GIVEN
    let dir = project();
    fs::create_dir_all(dir.path().join(".git")).expect("create .git");
    fs::write(dir.path().join(".git/config"), "[core]\n").expect("write config");
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    // WHEN
    let git_config = workspace.find_files(".git/config").await.expect("searched");
    let vendored = workspace
        .find_files("./node_modules/lib/foo.ts")
        .await
        .expect("searched");
    let vendored_glob = workspace
        .find_files("node_modules/**/*.ts")
        .await
        .expect("searched");

    // THEN
    assert!(git_config.is_empty());
    assert!(vendored.is_empty());
    assert!(vendored_glob.is_empty());
}

/// **VALUE**: An unreadable directory costs only its own files.
///
/// **BUG THIS CATCHES**: The first walk error aborting the whole search, so a
/// single permission-denied directory hides every other match.
#[cfg(unix)]
#[tokio::test]
async fn given_unreadable_directory_when_finding_files_then_other_matches_are_returned() {
    use std::os::unix::fs::PermissionsExt;

    // GIVEN
    let dir = project();
    let locked = dir.path().join("a_locked");
    fs::create_dir_all(&locked).expect("create locked dir");
    fs::write(locked.join("secret.ts"), "hidden\n").expect("write");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("lock");
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    // WHEN
    let result = workspace.find_files("**/*.ts").await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock");

    // THEN
    let found = names(&workspace, &result.expect("walk continues past unreadable entries"));
    assert!(found.contains(&String::from("src/foo.ts")));
    assert!(found.contains(&String::from("src/nested/bar.ts")));
}

#[tokio::test]
async fn given_bare_file_name_when_finding_files_then_matches_at_any_depth() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    let found = workspace.find_files("bar.ts").await.expect("found");

    assert_eq!(names(&workspace, &found), vec!["src/nested/bar.ts"]);
}

#[tokio::test]
async fn given_unknown_path_when_finding_files_then_returns_empty() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    assert!(workspace.find_files("src/missing.ts").await.expect("searched").is_empty());
    assert!(workspace.find_files("   ").await.expect("searched").is_empty());
}

#[tokio::test]
async fn given_malformed_glob_when_finding_files_then_pattern_error() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");

    let result = workspace.find_files("src/[foo.ts").await;

    assert!(matches!(result, Err(WorkspaceError::Pattern { .. })));
}

#[tokio::test]
async fn given_found_file_when_reading_then_returns_full_content() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");
    let found = workspace.find_files("src/foo.ts").await.expect("found");

    let content = workspace.read_to_string(&found[0]).await.expect("read");

    assert_eq!(content, "export const foo = 1;\n");
}

#[tokio::test]
async fn given_missing_file_when_reading_then_read_error_names_path() {
    let dir = project();
    let workspace = LocalWorkspace::new(dir.path()).expect("workspace");
    let missing = workspace.root().join("gone.rs");

    let err = workspace.read_to_string(&missing).await.expect_err("missing");

    match err {
        WorkspaceError::Read { path, .. } => assert_eq!(path, missing),
        other => panic!("expected Read, got {other:?}"),
    }
}

#[test]
fn given_missing_root_when_opening_workspace_then_root_not_found() {
    let result = LocalWorkspace::new(Path::new("/definitely/not/a/real/root"));

    assert!(matches!(result, Err(WorkspaceError::RootNotFound { .. })));
}
