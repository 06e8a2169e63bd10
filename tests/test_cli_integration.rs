//! CLI integration tests
//!
//! Smoke tests for the cyclops binary: reference-data audit, an end-to-end
//! ingest-then-chart run in a scratch directory, and error surfacing for
//! unknown constellations.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let fixtures = std::env::current_dir().unwrap().join("tests/fixtures");
    let config_path = dir.path().join("cyclops.json");
    let config = serde_json::json!({
        "database_path": dir.path().join("stars.db"),
        "definition_path": fixtures.join("constellations.json"),
        "catalog_path": fixtures.join("catalog.json"),
        "max_attempts": 3,
    });
    fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    config_path
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("cyclops")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("chart"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_check_reports_counts() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("cyclops")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aquarius: 4 stars, 3 edges"))
        .stdout(predicate::str::contains("Triangulum: 3 stars, 3 edges"));
}

#[test]
fn test_ingest_then_chart() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("cyclops")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "ingest", "Aquarius"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stored 4 stars"));

    let chart = dir.path().join("aquarius.svg");
    Command::cargo_bin("cyclops")
        .unwrap()
        .args([
            "--config",
            config.to_str().unwrap(),
            "chart",
            "Aquarius",
            "--millennia",
            "-8",
            "--view",
            "real",
            "-o",
            chart.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("aquarius.svg"));

    let svg = fs::read_to_string(&chart).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), 4);
}

#[test]
fn test_chart_before_ingest_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("cyclops")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "chart", "Aquarius"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stored records"));
}

#[test]
fn test_unknown_constellation_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("cyclops")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "ingest", "Orion"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown constellation"));
}
