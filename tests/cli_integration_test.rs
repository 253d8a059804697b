//! Integration tests for the noise-survey binary.

#![allow(clippy::unwrap_used)]

mod common;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use common::{daily_pattern, log_csv};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A command isolated from the user's configuration file.
fn noise_survey(home: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("noise-survey"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NOISE_SURVEY_DAY")
        .env_remove("NOISE_SURVEY_EVENING")
        .env_remove("NOISE_SURVEY_NIGHT")
        .env_remove("NOISE_SURVEY_FORMAT")
        .arg("--no-progress");
    cmd
}

fn write_log(dir: &Path, name: &str, start: &str, rows: usize) -> PathBuf {
    let path = dir.join(format!("{name}.csv"));
    std::fs::write(&path, log_csv(start, rows, 1, daily_pattern)).unwrap();
    path
}

#[test]
fn test_summary_as_csv() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "site", "2025-08-14 07:00", 1440);

    noise_survey(dir.path())
        .args(["summary", "--format", "csv", "--no-csv-bom", "--evening", "19:00"])
        .arg(format!("north={}", log.display()))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Log,Date,Period,Duration | min,Leq | A,Lmax | A,L90 | A\n",
        ))
        .stdout(predicate::str::contains("north,2025-08-14,Daytime,720,"))
        .stdout(predicate::str::contains("north,2025-08-14,Evening,240,"));
}

#[test]
fn test_directory_input_names_logs_by_file_stem() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    write_log(&logs, "east", "2025-08-14 07:00", 120);
    write_log(&logs, "west", "2025-08-14 07:00", 120);

    noise_survey(dir.path())
        .args(["summary", "--format", "json"])
        .arg(&logs)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"east\""))
        .stdout(predicate::str::contains("\"west\""));
}

#[test]
fn test_lmax_for_disabled_evenings_is_empty() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "site", "2025-08-14 07:00", 1440);

    noise_survey(dir.path())
        .args(["lmax", "--period", "evenings"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("(no rows)"));
}

#[test]
fn test_invalid_periods_are_rejected() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "site", "2025-08-14 07:00", 60);

    noise_survey(dir.path())
        .args(["summary", "--day", "07:00", "--night", "07:00"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid survey periods"));
}

#[test]
fn test_unreadable_log_is_skipped_unless_fail_fast() {
    let dir = TempDir::new().unwrap();
    let good = write_log(dir.path(), "good", "2025-08-14 07:00", 60);
    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, "Time,Leq A\n2025-08-14 07:00,50\n").unwrap();

    noise_survey(dir.path())
        .args(["leq"])
        .arg(&good)
        .arg(&bad)
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping"));

    noise_survey(dir.path())
        .args(["leq", "--fail-fast"])
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns"));
}

#[test]
fn test_no_logs_found() {
    let dir = TempDir::new().unwrap();

    noise_survey(dir.path())
        .args(["summary"])
        .arg(dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid log files"));
}

#[test]
fn test_export_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "site", "2025-08-14 07:00", 1440);
    let out = dir.path().join("report.xlsx");

    noise_survey(dir.path())
        .args(["export", "-n", "2", "--output"])
        .arg(&out)
        .arg(&log)
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_export_to_csv_writes_sections() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "site", "2025-08-14 07:00", 1440);
    let out = dir.path().join("report.csv");

    noise_survey(dir.path())
        .args(["export", "--no-csv-bom", "--output"])
        .arg(&out)
        .arg(&log)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Broadband Summary\nLog,Date,Period,Duration | min"));
    assert!(text.contains("\nTimestamp,Log,"));
}

#[test]
fn test_template_to_stdout() {
    let dir = TempDir::new().unwrap();

    noise_survey(dir.path())
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("Time,Leq A,Lmax A,L90 A,"));
}

#[test]
fn test_config_path_and_show() {
    let dir = TempDir::new().unwrap();

    noise_survey(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    noise_survey(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[periods]"))
        .stdout(predicate::str::contains("lmax_n = 10"));
}
