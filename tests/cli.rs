mod common;

use std::fs;

use common::{STAFF_CSV, TestWorkspace, column_typer};
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn classify_prints_type_and_length_per_value() {
    column_typer()
        .args(["classify", "42", "3.14", "hello", "2024-01-02", "13:45:00"])
        .assert()
        .success()
        .stdout(contains("value"))
        .stdout(contains("TINYINT"))
        .stdout(contains("1, 2"))
        .stdout(contains("VARCHAR"))
        .stdout(contains("DATE"))
        .stdout(contains("TIME"));
}

#[test]
fn classify_respects_exclusive_integer_bounds() {
    let assert = column_typer()
        .args(["classify", "-128", "2000"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[2].starts_with("-128"), "unexpected row: {}", lines[2]);
    assert!(lines[2].contains("MEDIUMINT"));
    assert!(lines[3].contains("YEAR"));
}

#[test]
fn classify_with_text_kind_keeps_digits_as_text() {
    column_typer()
        .args(["classify", "--kind", "text", "00042"])
        .assert()
        .success()
        .stdout(contains("VARCHAR"))
        .stdout(contains("text"));
}

#[test]
fn classify_marks_undetermined_values() {
    let assert = column_typer()
        .args(["classify", "00:00:00"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let row = stdout.lines().nth(2).expect("value row");
    assert!(row.contains("time"));
    assert!(row.trim_end().ends_with('-'));
    assert!(!row.contains("TIME"));
}

#[test]
fn classify_rejects_values_that_do_not_parse_as_requested_kind() {
    column_typer()
        .args(["classify", "--kind", "integer", "abc"])
        .assert()
        .failure()
        .stderr(contains("error:"))
        .stderr(contains("integer"));
}

#[test]
fn infer_prints_one_row_per_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("staff.csv", STAFF_CSV);
    column_typer()
        .args(["infer", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("column"))
        .stdout(contains("undetermined"))
        .stdout(contains("VARCHAR (6)"))
        .stdout(contains("DECIMAL (3, 3)"))
        .stdout(contains("MEDIUMINT"));
}

#[test]
fn infer_writes_json_report_with_preferences() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("staff.csv", STAFF_CSV);
    let report = workspace.path().join("report.json");
    column_typer()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "--prefer-int",
            "-o",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("read report")).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["options"]["prefer_int"], true);
    assert_eq!(json["columns"][0]["name"], "id");
    assert_eq!(json["columns"][0]["descriptor"], "INT");
    assert_eq!(json["columns"][4]["descriptor"], "INT");
    assert_eq!(json["columns"][2]["descriptor"], "DECIMAL (3, 3)");
}

#[test]
fn infer_writes_yaml_report_by_default() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("staff.csv", STAFF_CSV);
    let report = workspace.path().join("report.yml");
    column_typer()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "-o",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();
    let contents = fs::read_to_string(&report).expect("read report");
    assert!(contents.contains("descriptor: TINYINT"));
    assert!(contents.contains("storage_type: DATE"));
}

#[test]
fn infer_emits_create_table_statement() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("staff.csv", STAFF_CSV);
    column_typer()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "--ddl",
            "staff",
            "--primary-key",
            "id",
        ])
        .assert()
        .success()
        .stdout(contains("CREATE TABLE `staff` ("))
        .stdout(contains("`hired` DATE,"))
        .stdout(contains("PRIMARY KEY (`id`)\n);"));
}

#[test]
fn ddl_fails_when_a_column_is_unresolved() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("gaps.csv", "id,notes\n1,\n2,NULL\n");
    column_typer()
        .args(["infer", "-i", input.to_str().unwrap(), "--ddl", "gaps"])
        .assert()
        .failure()
        .stderr(contains("notes"))
        .stderr(contains("indeterminate"));
}

#[test]
fn config_file_and_text_column_flag_combine() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("staff.csv", STAFF_CSV);
    let config = workspace.write("infer.yml", "text_columns: [zip]\nnull_tokens: [\"\", \"n/a\"]\n");
    let report = workspace.path().join("report.json");
    column_typer()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "-T",
            "id",
            "-o",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["columns"][0]["descriptor"], "VARCHAR (1)");
    assert_eq!(json["columns"][4]["descriptor"], "VARCHAR (5)");
}

#[test]
fn infer_reads_tsv_and_stdin() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("pairs.tsv", "code\tlabel\n7\tseven\n8\teight\n");
    column_typer()
        .args(["infer", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("VARCHAR (5)"));

    column_typer()
        .args(["infer", "-i", "-", "--delimiter", "|"])
        .write_stdin("code|label\n7|seven\n")
        .assert()
        .success()
        .stdout(contains("TINYINT"));
}

#[test]
fn infer_decodes_requested_encoding() {
    let workspace = TestWorkspace::new();
    let input = workspace.write_bytes("cafes.csv", b"name\nCaf\xe9\n");
    column_typer()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "windows-1252",
        ])
        .assert()
        .success()
        .stdout(contains("VARCHAR (4)"));

    column_typer()
        .args(["infer", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("decode"));
}

#[test]
fn infer_reports_missing_input() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("absent.csv");
    column_typer()
        .args(["infer", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("absent.csv")));
}

#[test]
fn catalog_lists_every_storage_type() {
    column_typer()
        .arg("catalog")
        .assert()
        .success()
        .stdout(contains("TINYTEXT"))
        .stdout(contains("LONGTEXT"))
        .stdout(contains("[-128, 127]"))
        .stdout(contains("[1901, 2155]"))
        .stdout(contains("max length 65535"));
}
