use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn csvcols() -> Command {
    Command::cargo_bin("csvcols").unwrap()
}

#[test]
fn test_terminal_dump() {
    let file = csv_file("id,name\n1,alpha\n2,beta\n");
    csvcols()
        .arg(file.path())
        .args(["--format", "Ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id (i32)"))
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains("2 rows × 2 columns"));
}

#[test]
fn test_json_output() {
    let file = csv_file("a,b\n1,2\n3,4\n");
    let output = csvcols()
        .arg(file.path())
        .args(["--format", "LL", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["row_count"], 2);
    assert_eq!(value["columns"][1]["values"], serde_json::json!([2, 4]));
}

#[test]
fn test_max_rows_limits_terminal_dump() {
    let file = csv_file("n\n1\n2\n3\n4\n");
    csvcols()
        .arg(file.path())
        .args(["--format", "L", "--max-rows", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("… 2 more rows"))
        .stdout(predicate::str::contains("4 rows × 1 columns"));
}

#[test]
fn test_compact_json_is_one_line() {
    let file = csv_file("a,b\n1,2\n");
    let output = csvcols()
        .arg(file.path())
        .args(["--format", "LL", "--output", "json", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end().lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["columns"][0]["values"], serde_json::json!([1]));
}

#[test]
fn test_summary_from_stdin() {
    csvcols()
        .args(["-", "--format", "s-", "--output", "summary"])
        .write_stdin("name,skip\nx,y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("name (text)"))
        .stdout(predicate::str::contains("rows number = 1"));
}

#[test]
fn test_no_header_and_delimiter() {
    let file = csv_file("5;6\n7;8\n");
    csvcols()
        .arg(file.path())
        .args(["--format", "dd", "--no-header", "--delimiter", ";", "--output", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rows number = 2"));
}

#[test]
fn test_invalid_format_exits_with_error() {
    let file = csv_file("a\n1\n");
    csvcols()
        .arg(file.path())
        .args(["--format", "Q"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid format specifier 'Q'"));
}

#[test]
fn test_strict_mode_reports_bad_value() {
    let file = csv_file("n\nnope\n");
    csvcols()
        .arg(file.path())
        .args(["--format", "L", "--strict"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot parse \"nope\" as i32"));
}

#[test]
fn test_missing_file() {
    csvcols()
        .args(["/nonexistent/input.csv", "--format", "L"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read file"));
}
