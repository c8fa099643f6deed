//! CLI integration tests for directory processing
//!
//! Tests recursive `*.tsast.json` directory processing.

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
fn test_directory_multiple_files() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("file1.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("file2.tsast.json"), export_assignment_fixture("2")).unwrap();
    fs::write(temp_dir.path().join("file3.tsast.json"), export_assignment_fixture("3")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"))
        .stdout(predicate::str::contains("_exports = 2;"))
        .stdout(predicate::str::contains("_exports = 3;"));
}

#[test]
fn test_directory_recursive() {
    let temp_dir = TempDir::new().unwrap();

    fs::create_dir_all(temp_dir.path().join("src/utils")).unwrap();
    fs::write(temp_dir.path().join("root.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(
        temp_dir.path().join("src/main.tsast.json"),
        export_assignment_fixture("2"),
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("src/utils/helper.tsast.json"),
        export_assignment_fixture("3"),
    )
    .unwrap();

    let output = Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("_exports = 1;"));
    assert!(stdout.contains("_exports = 2;"));
    assert!(stdout.contains("_exports = 3;"));
}

#[test]
fn test_directory_with_headers() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-- === "))
        .stdout(predicate::str::contains("a.tsast.json"))
        .stdout(predicate::str::contains("b.tsast.json"));
}

#[test]
fn test_directory_no_header_flag() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .arg("--no-header")
        .assert()
        .success()
        .stdout(predicate::str::contains("-- === ").not());
}

#[test]
fn test_directory_empty() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_directory_only_unsupported_files() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("file.txt"), "some text").unwrap();
    fs::write(temp_dir.path().join("file.json"), "{}").unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_directory_partial_failure_still_emits_successes() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("good.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("bad.tsast.json"), "not valid json").unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"))
        .stderr(predicate::str::contains("bad.tsast.json"));
}

#[test]
fn test_directory_with_jobs_flag() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();
    fs::write(temp_dir.path().join("b.tsast.json"), export_assignment_fixture("2")).unwrap();
    fs::write(temp_dir.path().join("c.tsast.json"), export_assignment_fixture("3")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .arg("--jobs")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 1;"))
        .stdout(predicate::str::contains("_exports = 2;"))
        .stdout(predicate::str::contains("_exports = 3;"));
}

#[test]
fn test_directory_invalid_jobs_value() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.tsast.json"), export_assignment_fixture("1")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path())
        .arg("--jobs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs must be at least 1"));
}

#[test]
fn test_directory_skips_symlinks() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("real.tsast.json"), export_assignment_fixture("1")).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        let _ = symlink(
            temp_dir.path().join("real.tsast.json"),
            temp_dir.path().join("link.tsast.json"),
        );

        Command::cargo_bin("tslc")
            .unwrap()
            .arg(temp_dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("skipping symlink"));
    }
}

#[test]
fn test_directory_with_subdirectory() {
    let temp_dir = TempDir::new().unwrap();

    fs::create_dir_all(temp_dir.path().join("subdir")).unwrap();
    fs::write(
        temp_dir.path().join("subdir/file.tsast.json"),
        export_assignment_fixture("9"),
    )
    .unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(temp_dir.path().join("subdir"))
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 9;"));
}

#[test]
fn test_directory_current_directory() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("test.tsast.json"), export_assignment_fixture("5")).unwrap();

    Command::cargo_bin("tslc")
        .unwrap()
        .arg(".")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("_exports = 5;"));
}
