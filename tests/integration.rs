use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn srcache_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_srcache"))
}

fn file_url(path: &Path) -> String {
    Url::from_file_path(path).unwrap().to_string()
}

/// Temp workspace with a single-file source, a directory source and a
/// source whose only candidate does not exist.
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let notes = root.join("notes.md");
    fs::write(&notes, "# Notes\n\nRemember the milk.\n").unwrap();

    let project = root.join("project");
    fs::create_dir_all(project.join("src")).unwrap();
    fs::write(project.join("README.md"), "# Project\n").unwrap();
    fs::write(project.join("src/main.rs"), "fn main() {}\n").unwrap();

    let config_content = format!(
        r#"[cache]
dir = "{cache}"
history_dir = "{history}"

[fetch]
timeout_secs = 5

[[sources]]
id = "urn:src:notes"
work_url = "{missing}"
urls = [{{ url = "{notes}", sync = "file" }}]

[[sources]]
id = "urn:src:project"
work_url = "{project}"

[[sources]]
id = "urn:src:dead"
work_url = "{dead}"
"#,
        cache = root.join("cache").display(),
        history = root.join("history").display(),
        missing = file_url(&root.join("missing.md")),
        notes = file_url(&notes),
        project = file_url(&project),
        dead = file_url(&root.join("nowhere")),
    );

    let config_path = config_dir.join("srcache.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_srcache(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = srcache_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run srcache binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_sources_lists_configured_sources() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_srcache(&config, &["sources"]);
    assert!(success, "sources failed: {}", stderr);
    assert!(stdout.contains("urn:src:notes"));
    assert!(stdout.contains("urn:src:project"));
    assert!(stdout.contains("local"));
}

#[test]
fn test_refresh_reports_unresolved_sources() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_srcache(&config, &["refresh"]);
    assert!(success, "refresh failed: {}", stderr);
    assert!(stdout.contains("refreshed 2 source(s), 1 unresolved"));
    assert!(stdout.contains("unresolved: urn:src:dead"));
    assert!(stderr.contains("candidate failed"));
}

#[test]
fn test_refresh_json_uses_fallback_candidate() {
    let (tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_srcache(&config, &["refresh", "urn:src:notes", "--json"]);
    assert!(success, "refresh failed: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let record = &parsed["urn:src:notes"];
    assert_eq!(
        record["source_url"],
        file_url(&tmp.path().join("notes.md")).as_str()
    );
    assert_eq!(record["contents"], "# Notes\n\nRemember the milk.\n");
    assert!(record["file_cache"].as_array().unwrap().is_empty());
}

#[test]
fn test_refresh_unknown_source_fails() {
    let (_tmp, config) = setup_test_env();
    let (_stdout, stderr, success) = run_srcache(&config, &["refresh", "urn:src:nope"]);
    assert!(!success);
    assert!(stderr.contains("Unknown source"));
}

#[test]
fn test_changes_then_review_all() {
    let (_tmp, config) = setup_test_env();

    let (stdout, stderr, success) = run_srcache(&config, &["changes", "urn:src:project", "--json"]);
    assert!(success, "changes failed: {}", stderr);
    let changes: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let files: Vec<&str> = changes
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["file"].as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["README.md", "src/main.rs"]);

    let (stdout, stderr, success) = run_srcache(&config, &["review-all", "urn:src:project"]);
    assert!(success, "review-all failed: {}", stderr);
    assert!(stdout.contains("reviewed 2 file(s)"));

    let (stdout, _stderr, success) = run_srcache(&config, &["changes", "urn:src:project"]);
    assert!(success);
    assert!(stdout.contains("0 changed file(s)"));
}

#[test]
fn test_review_single_file() {
    let (tmp, config) = setup_test_env();
    let readme = tmp.path().join("project/README.md");

    let (stdout, stderr, success) = run_srcache(&config, &["review", readme.to_str().unwrap()]);
    assert!(success, "review failed: {}", stderr);
    assert!(stdout.contains("history:"));

    let (stdout, _stderr, success) = run_srcache(&config, &["changes", "urn:src:project"]);
    assert!(success);
    assert!(!stdout.contains("README.md"));
    assert!(stdout.contains("src/main.rs"));
    assert!(stdout.contains("1 changed file(s)"));
}

#[test]
fn test_changes_rejects_file_source() {
    let (_tmp, config) = setup_test_env();
    let (_stdout, stderr, success) = run_srcache(&config, &["changes", "urn:src:notes"]);
    assert!(!success);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_srcache(&tmp.path().join("absent.toml"), &["sources"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
