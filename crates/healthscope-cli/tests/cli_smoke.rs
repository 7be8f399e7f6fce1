//! Smoke tests for the compiled `healthscope` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const HEART_MODEL: &str = r#"{
  "kind": "random_forest",
  "n_features": 2,
  "feature_importances": [0.25, 0.75],
  "trees": [
    {"nodes": [
      {"kind": "split", "feature": 1, "threshold": 240.0, "left": 1, "right": 2},
      {"kind": "leaf", "value": [9.0, 1.0]},
      {"kind": "leaf", "value": [1.0, 9.0]}
    ]}
  ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// A model directory with a heart model and a config pointing at it.
fn setup() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "heart_model.json", HEART_MODEL);
    write(dir.path(), "heart_features.json", r#"["age", "chol"]"#);
    let config = serde_json::json!({ "model_dir": dir.path(), "top_n": 1 });
    let config_path = write(dir.path(), "config.json", &config.to_string());
    (dir, config_path)
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn cmd() -> Command {
    Command::cargo_bin("healthscope").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("importance"))
        .stdout(predicate::str::contains("summary"));
}

// ---------------------------------------------------------------------------
// predict / importance
// ---------------------------------------------------------------------------

#[test]
fn predict_prints_assessment() {
    let (dir, config) = setup();
    let input = write(dir.path(), "patient.json", r#"{"age": 63, "chol": 286}"#);

    let output = cmd()
        .arg("predict")
        .arg("heart")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["prediction"], 1);
    assert_eq!(json["risk_level"], "High Risk");
    assert_eq!(json["color"], "#EF4444");
}

#[test]
fn predict_failure_still_exits_zero() {
    let (dir, config) = setup();
    let input = write(dir.path(), "patient.json", r#"{"age": 63}"#);

    cmd()
        .args(["predict", "heart"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("chol"));
}

#[test]
fn importance_uses_configured_top_n() {
    let (_dir, config) = setup();

    let output = cmd()
        .args(["importance", "heart", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["feature"], "chol");

    let output = cmd()
        .args(["importance", "heart", "--top-n", "5", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output).as_array().unwrap().len(), 2);
}

#[test]
fn importance_for_missing_model_is_empty() {
    let (_dir, config) = setup();
    cmd()
        .args(["importance", "diabetes", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[test]
fn summary_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "heart.csv", "age,sex,target\n63,M,1\n37,F,NA\n");

    let output = cmd()
        .arg("summary")
        .arg(&csv)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&output);
    let report = &json[csv.display().to_string()];
    assert_eq!(report["rows"], 2);
    assert_eq!(report["missing"], 1);
    assert_eq!(report["missing_pct"], 16.67);
    assert_eq!(report["column_means"]["age"], 50.0);
}

#[test]
fn summary_of_missing_file_fails() {
    cmd()
        .args(["summary", "/nonexistent/data.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/data.csv"));
}

#[test]
fn unknown_domain_is_rejected() {
    cmd()
        .args(["importance", "kidney"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kidney"));
}
