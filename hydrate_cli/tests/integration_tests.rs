//! Integration tests for the hydrate binary.
//!
//! These tests verify end-to-end behavior including:
//! - Running a full workout with accelerated ticks
//! - Interactive actions read from stdin
//! - Settings persistence across runs
//! - Schedule preview

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with a quiet config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("config.toml"),
        "[reminders]\nsound = false\n",
    )
    .expect("Failed to write config");
    dir
}

/// Helper to get the CLI pointed at an isolated data dir and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hydrate"));
    cmd.arg("--data-dir")
        .arg(dir)
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn run_json(dir: &Path, extra: &[&str]) -> Value {
    let output = cli(dir)
        .arg("start")
        .args(["--tick-ms", "0", "--no-input", "--json"])
        .args(extra)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("summary should be JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("hydrate"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout hydration reminder"));
}

#[test]
fn test_full_workout_with_auto_drink() {
    let temp_dir = setup_test_dir();

    let summary = run_json(
        temp_dir.path(),
        &["--duration", "15", "--water", "500", "--creatine", "5", "--auto-drink"],
    );

    // Opening reminder plus reminders at 10 and 13 minutes, 166ml each
    assert_eq!(summary["planned_minutes"], 15);
    assert_eq!(summary["elapsed_seconds"], 900);
    assert_eq!(summary["reminders_fired"], 2);
    assert_eq!(summary["drinks_recorded"], 3);
    assert_eq!(summary["water_consumed_ml"], 498);

    let creatine = summary["final_creatine_grams"].as_f64().unwrap();
    assert!((creatine - 4.98).abs() < 1e-9);
}

#[test]
fn test_full_workout_prints_reminders_and_summary() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .args(["--duration", "20", "--tick-ms", "0", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKOUT STARTED"))
        .stdout(predicate::str::contains("Reminders every 10 min at: 10, 18 min"))
        .stdout(predicate::str::contains(
            "Stay hydrated! You should have 166ml now.",
        ))
        .stdout(predicate::str::contains("Workout Complete!"))
        .stdout(predicate::str::contains("0ml of 500ml"));
}

#[test]
fn test_interactive_drink_pause_and_end() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .args(["--duration", "20", "--tick-ms", "60000"])
        .write_stdin("d\np\np\ne\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("+166ml (166ml so far)"))
        .stdout(predicate::str::contains("Paused"))
        .stdout(predicate::str::contains("Resumed"))
        .stdout(predicate::str::contains("WORKOUT COMPLETE"))
        .stdout(predicate::str::contains("166ml of 500ml"));
}

#[test]
fn test_drink_while_paused_is_not_counted() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .args(["--duration", "20", "--tick-ms", "60000"])
        .write_stdin("p\nd\ne\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resume the workout to record a drink"))
        .stdout(predicate::str::contains("0ml of 500ml"));
}

#[test]
fn test_unknown_action_reported() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("start")
        .args(["--duration", "20", "--tick-ms", "60000"])
        .write_stdin("x\ne\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown action: x"));
}

#[test]
fn test_settings_saved_and_reused() {
    let temp_dir = setup_test_dir();

    run_json(
        temp_dir.path(),
        &["--duration", "20", "--water", "800", "--creatine", "3.5"],
    );
    assert!(temp_dir.path().join("settings.json").exists());

    // Second run takes everything from the saved settings
    let summary = run_json(temp_dir.path(), &[]);
    assert_eq!(summary["planned_minutes"], 20);
    assert_eq!(summary["water_target_ml"], 800);

    cli(temp_dir.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("20 min"))
        .stdout(predicate::str::contains("800ml"))
        .stdout(predicate::str::contains("3.5g"));
}

#[test]
fn test_no_save_leaves_settings_untouched() {
    let temp_dir = setup_test_dir();

    run_json(temp_dir.path(), &["--duration", "15", "--no-save"]);

    assert!(!temp_dir.path().join("settings.json").exists());
    cli(temp_dir.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved settings yet."));
}

#[test]
fn test_inputs_clamped_at_boundary() {
    let temp_dir = setup_test_dir();

    let summary = run_json(temp_dir.path(), &["--duration", "5", "--water", "5000"]);

    assert_eq!(summary["planned_minutes"], 15);
    assert_eq!(summary["water_target_ml"], 1000);
}

#[test]
fn test_schedule_preview() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("schedule")
        .args(["--duration", "45", "--water", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interval: every 12 min"))
        .stdout(predicate::str::contains("Reminders at: 12, 24, 36, 43 min"))
        .stdout(predicate::str::contains("Dose per drink: 100ml of 500ml"));
}

#[test]
fn test_schedule_preview_clamps_duration() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("schedule")
        .args(["--duration", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout: 15 min"))
        .stdout(predicate::str::contains("Reminders at: 10, 13 min"));
}
