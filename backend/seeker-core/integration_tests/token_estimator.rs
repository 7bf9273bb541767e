use seeker_core::TokenEstimator;
use seeker_core::error::TokenError;

use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

/// **VALUE**: Only recognized, text, non-vendored files are counted.
///
/// **WHY THIS MATTERS**: Counting `node_modules` or binaries would inflate
/// cost estimates by orders of magnitude.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - skipped directories were descended into
/// - the NUL-byte sniff stopped excluding binaries
/// - unknown extensions were counted
/// - zero-token files appeared in the per-file map
#[tokio::test]
async fn given_mixed_project_when_counting_tokens_then_only_qualifying_files_counted() {
    // GIVEN
    let project = TempDir::new().expect("temp dir");
    let root = project.path();
    write(root, "src/main.rs", b"fn main() {\n    println!(\"hello\");\n}\n");
    write(root, "src/lib.py", b"def add(a, b):\n    return a + b\n");
    write(root, "src/empty.ts", b"");
    write(root, "node_modules/pkg/index.js", b"module.exports = 1;");
    write(root, ".git/config.json", b"{\"core\": true}");
    write(root, "assets/data.json", b"{\"a\":\0\"b\"}");
    write(root, "notes.txt", b"plain text is not a code extension");

    let estimator = TokenEstimator::default();

    // WHEN
    let counted = tokio::task::spawn_blocking({
        let root = root.to_path_buf();
        move || estimator.project_token_count(&root)
    })
    .await
    .expect("task joined")
    .expect("counted");

    // THEN
    let files: Vec<&str> = counted.per_file_token_counts.keys().map(String::as_str).collect();
    assert_eq!(files, vec!["src/lib.py", "src/main.rs"]);
    assert_eq!(
        counted.total_tokens,
        counted.per_file_token_counts.values().sum::<u64>()
    );
    assert!(counted.total_tokens > 0);
}

#[test]
fn given_file_contents_when_counting_then_per_file_matches_text_count() {
    let project = TempDir::new().expect("temp dir");
    let source = "pub struct Point { x: i32, y: i32 }\n";
    write(project.path(), "point.rs", source.as_bytes());
    let estimator = TokenEstimator::default();

    let counted = estimator.project_token_count(project.path()).expect("counted");

    let expected = estimator.count_tokens(source).expect("tokenizer loads");
    assert_eq!(counted.per_file_token_counts.get("point.rs"), Some(&expected));
}

#[test]
fn given_invalid_utf8_source_when_counting_then_it_is_counted_lossily() {
    let project = TempDir::new().expect("temp dir");
    write(project.path(), "latin1.c", b"/* caf\xe9 */ int main() { return 0; }");

    let counted = TokenEstimator::default()
        .project_token_count(project.path())
        .expect("counted");

    assert!(counted.per_file_token_counts.contains_key("latin1.c"));
}

#[test]
fn given_missing_root_when_counting_then_root_not_found_error() {
    let project = TempDir::new().expect("temp dir");
    let missing = project.path().join("does-not-exist");

    let result = TokenEstimator::default().project_token_count(&missing);

    assert!(matches!(result, Err(TokenError::RootNotFound { .. })));
}
