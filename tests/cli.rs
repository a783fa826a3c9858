//! Integration tests for the seolens CLI
//!
//! These tests run the built binary as a subprocess against projects laid
//! out in temporary directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn seolens(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seolens"))
        .args(args)
        .env_remove("SEOLENS_ROOT")
        .output()
        .expect("Failed to run CLI")
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn next_project(home: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"dependencies": {"next": "14.2.0"}}"#,
    );
    write(dir.path(), "app/page.tsx", home);
    dir
}

fn good_page() -> String {
    format!("<main><h1>Home</h1><p>{}</p></main>", vec!["text"; 210].join(" "))
}

#[test]
fn test_cli_help() {
    let output = seolens(&["--help"]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("Developed by Pon Datalab"));
}

#[test]
fn test_cli_version() {
    let output = seolens(&["--version"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("seolens {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_clean_project_exits_zero_and_writes_report() {
    let dir = next_project(&good_page());
    let root = dir.path().to_str().unwrap();

    let output = seolens(&["analyze", "--root", root]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("# SEO Analysis Report"));
    assert!(stdout.contains("/ (Score: 100)"));

    let saved = fs::read_to_string(dir.path().join("seo-report.md")).unwrap();
    assert!(saved.contains("**Pages Analyzed**: 1"));
}

#[test]
fn test_missing_h1_fails_with_error_code() {
    let dir = next_project("<main><p>short page</p></main>");
    let root = dir.path().to_str().unwrap();

    let output = seolens(&["analyze", "--root", root, "--report-only"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("seo-report.md").exists());
}

#[test]
fn test_warnings_only_respect_fail_on() {
    let dir = next_project("<main><h1>Home</h1><p>short page</p></main>");
    let root = dir.path().to_str().unwrap();

    let lenient = seolens(&["analyze", "--root", root, "--report-only"]);
    assert_eq!(lenient.status.code(), Some(0));

    let strict = seolens(&[
        "analyze",
        "--root",
        root,
        "--report-only",
        "--fail-on",
        "warning",
    ]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_json_format() {
    let dir = next_project(&good_page());
    let root = dir.path().to_str().unwrap();
    let target = dir.path().join("out/report.json");

    let output = seolens(&[
        "analyze",
        "--root",
        root,
        "--format",
        "json",
        "--output",
        target.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let saved = fs::read_to_string(&target).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(parsed["results"][0]["route"], "/");
    assert_eq!(parsed["results"][0]["score"], 100);
}

#[test]
fn test_missing_package_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = seolens(&["analyze", "--root", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("package.json"));
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    assert!(seolens(&["init", "--root", root]).status.success());
    assert!(dir.path().join("seo.config.json").exists());

    let again = seolens(&["init", "--root", root]);
    assert!(!again.status.success());
}
