//! CLI integration tests for caching functionality
//!
//! Tests cache creation, reuse, invalidation, and --no-cache flag

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn export_assignment_fixture(value: &str) -> String {
    format!(
        r#"{{
  "file_name": "test.ts",
  "script_context": "None",
  "script_type": "Module",
  "statements": [
    {{"Export": {{"kind": {{"ExportAssignment": {{"NumericLiteral": {{"text": "{value}"}}}}}}}}}}
  ]
}}"#
    )
}

#[test]
fn test_cache_basic_reuse() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("42")).unwrap();

    let output1 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output2 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(output1, output2, "Cached output should match original");
}

#[test]
fn test_cache_invalidation_on_file_modification() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("1")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"));

    // Wait to ensure mtime changes (some filesystems have 1-second granularity)
    thread::sleep(Duration::from_secs(1));

    fs::write(&file_path, export_assignment_fixture("2")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 2;"))
        .stdout(predicate::str::contains("_exports = 1;").not());
}

#[test]
fn test_cache_invalidation_on_config_change() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("1")).unwrap();

    let default_output = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let overridden_output = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--runtime-module")
        .arg("custom/runtime")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_ne!(
        default_output, overridden_output,
        "A different runtime module should bypass the stale cache entry"
    );
}

#[test]
fn test_no_cache_flag() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("42")).unwrap();

    let output1 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--no-cache")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output2 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--no-cache")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(output1, output2);

    Command::cargo_bin("tslc").unwrap().arg(&file_path).assert().success();
}

#[test]
fn test_clear_cache_command() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("42")).unwrap();

    Command::cargo_bin("tslc").unwrap().arg(&file_path).assert().success();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("--clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared successfully"));

    Command::cargo_bin("tslc").unwrap().arg(&file_path).assert().success();
}

#[test]
fn test_cache_with_glob_patterns() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(
        temp_dir.path().join("file1.tsast.json"),
        export_assignment_fixture("1"),
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("file2.tsast.json"),
        export_assignment_fixture("2"),
    )
    .unwrap();

    let output1 = Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output2 = Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(output1, output2, "Cached glob output should match original");
}

#[test]
fn test_cache_respected_with_stats() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("42")).unwrap();

    let stderr1 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--stats")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&stderr1).contains("[tslc]"));

    let stderr2 = Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--stats")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();

    assert_eq!(stderr1, stderr2, "Cached stats should match original");
}

#[test]
fn test_no_cache_with_stats() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.tsast.json");
    fs::write(&file_path, export_assignment_fixture("42")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(&file_path)
        .arg("--no-cache")
        .arg("--stats")
        .assert()
        .success()
        .stderr(predicate::str::contains("[tslc]"));
}
