//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the territory-migrate-cli binary.
fn migrate_cli() -> Command {
    cargo_bin_cmd!("territory-migrate-cli")
}

/// Path to library test fixtures (relative to workspace).
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("territory-migrate")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_cli_help() {
    let mut cmd = migrate_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_cli_version() {
    let mut cmd = migrate_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_migrates_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("new_coordinates.json");

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("coordinates.json"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Territories: 3"))
        .stdout(predicate::str::contains("A: 2/2 assigned, 1 square(s) without marker"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["territories"]["terr1"]["color"], "#e6194b");
    assert!(written["territories"]["terr10"]["SquareA"]["squareMarker"].is_null());
}

#[test]
fn test_cli_default_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::copy(
        fixture("coordinates.json"),
        dir.path().join("src").join("coordinates.json"),
    )
    .unwrap();

    let mut cmd = migrate_cli();
    cmd.current_dir(dir.path());
    cmd.assert().success();

    assert!(dir.path().join("new_coordinates.json").exists());
}

#[test]
fn test_cli_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    let mut cmd = migrate_cli();
    cmd.arg("-i")
        .arg(fixture("coordinates.json"))
        .arg("-o")
        .arg(&output)
        .arg("--format")
        .arg("json");

    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["report"]["territories"], 3);
    assert_eq!(summary["summary"]["exhausted_letters"], serde_json::json!(["A"]));
    assert_eq!(summary["summary"]["warnings"], true);
}

#[test]
fn test_cli_dry_run_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("coordinates.json"))
        .arg("--output")
        .arg(&output)
        .arg("--dry-run");

    let assert = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(document["territories"]["terr2"]["SquareC"].is_object());
    assert!(!output.exists());
}

#[test]
fn test_cli_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("coordinates.json"))
        .arg("--output")
        .arg(&output)
        .arg("--strict");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("strict mode"));
    assert!(!output.exists());
}

#[test]
fn test_cli_nonexistent_input() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg("does_not_exist.json")
        .arg("--output")
        .arg(dir.path().join("out.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("does_not_exist.json"));
}

#[test]
fn test_cli_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("malformed.json"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("malformed JSON"))
        .stderr(predicate::str::contains("line"));
    assert!(!output.exists());
}

#[test]
fn test_cli_schema_error() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("bad_key.json"))
        .arg("--output")
        .arg(dir.path().join("out.json"));

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("corner"));
}

#[test]
fn test_cli_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = migrate_cli();
    cmd.arg("--input")
        .arg(fixture("coordinates.json"))
        .arg("--output")
        .arg(dir.path().join("no_such_dir").join("out.json"));

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("failed to write"));
}
