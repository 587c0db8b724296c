//! Corruption recovery tests for the hydrate binary.
//!
//! These tests verify the system can handle:
//! - Corrupted or partial settings files
//! - Missing data directories
//! - Broken config files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

fn cli(dir: &Path, data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hydrate"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_corrupted_settings_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("settings.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted settings");

    cli(temp_dir.path(), data_dir)
        .arg("start")
        .args(["--duration", "15", "--tick-ms", "0", "--no-input"])
        .assert()
        .success();

    // The run rewrote the settings with valid JSON
    let contents = fs::read_to_string(data_dir.join("settings.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["duration_minutes"], 15);
}

#[test]
fn test_partial_settings_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("settings.json"), r#"{"duration_minutes": 30}"#).unwrap();

    cli(temp_dir.path(), data_dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout: 30 min"))
        .stdout(predicate::str::contains("of 500ml"));
}

#[test]
fn test_out_of_range_settings_are_clamped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("settings.json"),
        r#"{"duration_minutes": 900, "water_ml": 10}"#,
    )
    .unwrap();

    cli(temp_dir.path(), data_dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout: 180 min"))
        .stdout(predicate::str::contains("of 250ml"));
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("does/not/exist");

    cli(temp_dir.path(), &data_dir)
        .arg("start")
        .args(["--duration", "15", "--tick-ms", "0", "--no-input", "--json"])
        .assert()
        .success();

    assert!(data_dir.join("settings.json").exists());
}

#[test]
fn test_broken_config_file_fails() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[defaults\nwater_ml = ").unwrap();

    cli(temp_dir.path(), temp_dir.path())
        .arg("settings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}
