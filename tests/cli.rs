use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn cli_version() {
    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_synchronized_run_matches() {
    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["--workers", "4", "--increments", "1000", "--synchronized"])
        .assert()
        .success()
        .stdout(contains("final: 4000, expected: 4000, match"));
}

#[test]
fn cli_repeated_runs() {
    let output = Command::cargo_bin("racepool")
        .unwrap()
        .args(&["-w", "2", "-i", "50", "-s", "-r", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|line| line.ends_with("match")));
}

#[test]
fn cli_zero_workers_fails() {
    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["--workers", "0", "--increments", "10"])
        .assert()
        .failure()
        .stderr(contains("worker count must be positive"));
}

#[test]
fn cli_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("race.json");
    fs::write(
        &path,
        r#"{"worker_count": 3, "increments_per_worker": 200, "synchronized": true}"#,
    )
    .unwrap();

    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["--config", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("final: 600, expected: 600, match"));
}

#[test]
fn cli_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("race.json");
    fs::write(&path, r#"{"worker_count": 3, "increments_per_worker": 200}"#).unwrap();

    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["-c", path.to_str().unwrap(), "-w", "5", "-s"])
        .assert()
        .success()
        .stdout(contains("final: 1000, expected: 1000, match"));
}

#[test]
fn cli_bad_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("race.json");
    fs::write(&path, "not json").unwrap();

    Command::cargo_bin("racepool")
        .unwrap()
        .args(&["--config", path.to_str().unwrap()])
        .assert()
        .failure();
}
