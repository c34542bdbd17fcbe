//! CLI contract tests
//!
//! Drives the built binary: output formats, --fail-under exit codes,
//! --skip, config defaults and init.

use sitehealth::{CompositeReport, Dimension, DimensionStatus};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn sitehealth_bin() -> &'static str {
    env!("CARGO_BIN_EXE_sitehealth")
}

fn demo_snapshot() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/example-site.json")
}

/// Snapshot with two scorable dimensions and one recorded failure
fn write_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("site.json");
    std::fs::write(
        &path,
        r#"{
  "url": "https://example.com/",
  "dimensions": {
    "content": {
      "title": "AAAAA",
      "description": "",
      "headings": {"h1": ["X"], "h2": [], "h3": []},
      "paragraphs": ["p1"]
    },
    "mobile": {
      "media_query_count": 6,
      "uses_flex_or_grid": true,
      "fixed_width_elements": 0,
      "non_responsive_images": 0,
      "clickable_elements": 30,
      "small_touch_targets": 0,
      "small_font_elements": 0,
      "overflow_elements": 0,
      "non_responsive_tables": 0
    },
    "performance": {"provider_error": "HTTP 503 from resource collector"}
  }
}"#,
    )
    .unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(sitehealth_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to run sitehealth");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn analyze_json(dir: &Path, extra: &[&str]) -> CompositeReport {
    let snapshot = write_snapshot(dir);
    let mut args = vec!["analyze", "--facts", snapshot.to_str().unwrap(), "--format", "json"];
    args.extend_from_slice(extra);
    let (code, stdout, stderr) = run(dir, &args);
    assert_eq!(code, 0, "stderr: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is a CompositeReport")
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let report = analyze_json(dir.path(), &[]);

    assert_eq!(report.subject_url, "https://example.com/");
    assert_eq!(report.subject_domain, "example.com");
    assert_eq!(report.overall_score, 59.5);
    assert_eq!(report.dimension_count_used, 2);
    // dimensions without recorded facts cannot be scored
    assert_eq!(report.dimension_results.len(), 9);
    assert_eq!(
        report.dimension_results[&Dimension::Performance].status,
        DimensionStatus::Error
    );
    assert_eq!(
        report.dimension_results[&Dimension::Analytics].status,
        DimensionStatus::Error
    );
}

#[test]
fn test_skip_removes_dimensions() {
    let dir = TempDir::new().unwrap();
    let report = analyze_json(
        dir.path(),
        &["--skip", "ads", "--skip", "search-console", "--skip", "analytics"],
    );
    assert_eq!(report.dimension_results.len(), 6);
    assert!(!report.dimension_results.contains_key(&Dimension::Ads));
}

#[test]
fn test_config_disables_dimension_and_caps() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("sitehealth.toml"),
        "[scoring]\nrecommendation_cap = 1\n\n[dimensions.keywords]\nenabled = false\n",
    )
    .unwrap();
    let report = analyze_json(dir.path(), &[]);
    assert!(!report.dimension_results.contains_key(&Dimension::Keywords));
    assert_eq!(report.recommendations.len(), 1);

    let report = analyze_json(dir.path(), &["--cap", "3"]);
    assert_eq!(report.recommendations.len(), 3);
}

#[test]
fn test_fail_under_exit_code() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let facts = snapshot.to_str().unwrap();

    let (code, _, stderr) = run(dir.path(), &["analyze", "--facts", facts, "--fail-under", "70"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("below --fail-under"));

    let (code, _, _) = run(dir.path(), &["analyze", "--facts", facts, "--fail-under", "50"]);
    assert_eq!(code, 0);

    // equal to the overall score passes
    let (code, _, _) = run(dir.path(), &["analyze", "--facts", facts, "--fail-under", "59.5"]);
    assert_eq!(code, 0);
}

#[test]
fn test_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let out = dir.path().join("report.md");
    let (code, stdout, _) = run(
        dir.path(),
        &[
            "analyze",
            "--facts",
            snapshot.to_str().unwrap(),
            "-f",
            "md",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let md = std::fs::read_to_string(&out).unwrap();
    assert!(md.contains("**Score: 59.5/100**"));
    assert!(md.contains("| Performance | n/a | not scored | error |"));
}

#[test]
fn test_text_with_explanation() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let (code, stdout, _) = run(
        dir.path(),
        &["analyze", "--facts", snapshot.to_str().unwrap(), "--explain-score"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("59.5/100"));
    assert!(stdout.contains("(39.0 + 80.0) / 2 = 59.5"));
}

#[test]
fn test_demo_snapshot_scores_every_dimension() {
    let dir = TempDir::new().unwrap();
    let demo = demo_snapshot();
    let (code, stdout, stderr) = run(
        dir.path(),
        &["analyze", "--facts", demo.to_str().unwrap(), "-f", "json", "--compact"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout.trim().lines().count(), 1);
    let report: CompositeReport = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report.subject_domain, "example-bakery.com");
    assert_eq!(report.dimension_count_used, 9);
    assert!(report.failed_dimensions().is_empty());
    assert!(report.recommendations.len() <= 10);
}

#[test]
fn test_seeded_runs_match() {
    let dir = TempDir::new().unwrap();
    let args = ["analyze", "--seed", "42", "--url", "https://a.test/", "-f", "json"];
    let (_, first, _) = run(dir.path(), &args);
    let (_, second, _) = run(dir.path(), &args);
    let first: CompositeReport = serde_json::from_str(&first).unwrap();
    let second: CompositeReport = serde_json::from_str(&second).unwrap();
    assert_eq!(first.dimension_results, second.dimension_results);
    assert_eq!(first.subject_domain, "a.test");
}

#[test]
fn test_bad_input_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run(dir.path(), &["analyze"]);
    assert_ne!(code, 0);

    let snapshot = write_snapshot(dir.path());
    let (code, _, stderr) = run(
        dir.path(),
        &["analyze", "--facts", snapshot.to_str().unwrap(), "--skip", "seo"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown dimension"));

    let (code, _, _) = run(dir.path(), &["analyze", "--facts", "missing.json"]);
    assert_ne!(code, 0);
}

#[test]
fn test_init_writes_config() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Created"));
    let written = std::fs::read_to_string(dir.path().join("sitehealth.toml")).unwrap();
    assert!(written.contains("recommendation_cap = 10"));

    let (code, stdout, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Already initialized"));
}
