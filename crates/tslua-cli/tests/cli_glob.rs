//! CLI integration tests for glob pattern processing
//!
//! Tests multi-file processing with glob patterns

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
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
fn test_glob_single_pattern() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("file1.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("file2.tsast.json"), export_assignment_fixture("2")).unwrap();
    fs::write(temp_dir.path().join("file3.tsast.json"), export_assignment_fixture("3")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"))
        .stdout(predicate::str::contains("_exports = 2;"))
        .stdout(predicate::str::contains("_exports = 3;"));
}

#[test]
fn test_glob_with_headers() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-- === "))
        .stdout(predicate::str::contains("a.tsast.json"))
        .stdout(predicate::str::contains("b.tsast.json"));
}

#[test]
fn test_glob_no_header_flag() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .arg("--no-header")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-- === ").not());
}

#[test]
fn test_glob_recursive_pattern() {
    let temp_dir = TempDir::new().unwrap();

    fs::create_dir_all(temp_dir.path().join("src/utils")).unwrap();
    fs::write(
        temp_dir.path().join("src/main.tsast.json"),
        export_assignment_fixture("1"),
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("src/utils/helper.tsast.json"),
        export_assignment_fixture("2"),
    )
    .unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("src/*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"));
}

#[test]
fn test_glob_no_matches() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("file.json"), "{}").unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_glob_absolute_path_rejected() {
    Command::cargo_bin("tslc")
        .unwrap()
        .arg("/etc/*.tsast.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be relative"))
        .stderr(predicate::str::contains("cannot start with '/'"));
}

#[test]
fn test_glob_parent_traversal_rejected() {
    Command::cargo_bin("tslc")
        .unwrap()
        .arg("../*.tsast.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot contain '..'"))
        .stderr(predicate::str::contains("parent directory traversal"));
}

#[test]
fn test_glob_with_jobs_flag() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();
    fs::write(temp_dir.path().join("c.tsast.json"), export_assignment_fixture("3")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .arg("--jobs")
        .arg("2")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"))
        .stdout(predicate::str::contains("_exports = 2;"))
        .stdout(predicate::str::contains("_exports = 3;"));
}

#[test]
fn test_glob_jobs_too_high() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .arg("--jobs")
        .arg("200")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs value too high"))
        .stderr(predicate::str::contains("maximum: 128"));
}

#[test]
fn test_glob_ignores_non_matching_extension() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("file.json"), "{}").unwrap();
    fs::write(temp_dir.path().join("file.tsast.json"), export_assignment_fixture("9")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg("*.tsast.json")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 9;"));
}
