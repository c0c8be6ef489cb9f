//! Integration tests for the lifto binary.
//!
//! These tests verify end-to-end behavior including:
//! - Generating the upcoming queue from scripts and presets
//! - Full-replace semantics on regeneration
//! - Failure reporting with line numbers and no store mutation
//! - Queue inspection, session removal and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WEEK_ONE: &str = "\
# Week 1
## Squat Day
Barbell Squat / 1x5 65%, 1x5 75%, 1x5+ 85%
";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary, isolated from user config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lifto"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn write_script(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("plan.lifto");
    fs::write(&path, contents).expect("Failed to write script");
    path
}

fn read_store(dir: &Path) -> Vec<serde_json::Value> {
    let contents =
        fs::read_to_string(dir.join("data/upcoming.json")).expect("Failed to read store");
    serde_json::from_str(&contents).expect("Store is not valid JSON")
}

fn generate_json(dir: &Path, script: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cli(dir)
        .arg("generate")
        .arg("--script")
        .arg(script)
        .arg("--json")
        .args(extra)
        .output()
        .expect("Failed to run lifto");
    serde_json::from_slice(&output.stdout).expect("Output is not JSON")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Liftoscript training plan generator"));
}

#[test]
fn test_generate_week_one() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);

    let result = generate_json(temp_dir.path(), &script, &["--squat", "300"]);
    assert_eq!(result["success"], true);
    assert_eq!(result["count"], 3);
    assert_eq!(result["sessions"], 1);
    assert_eq!(result["deleted_count"], 0);

    let rows = read_store(temp_dir.path());
    let weights: Vec<f64> = rows.iter().map(|r| r["weight"].as_f64().unwrap()).collect();
    assert_eq!(weights, vec![195.0, 225.0, 255.0]);
    assert_eq!(rows[0]["reps"], 5);
    assert_eq!(rows[2]["reps"], "5+");
    assert!(rows.iter().all(|r| r["session"] == 1));
    assert!(rows.iter().all(|r| r["weight_unit"] == "lbs"));
}

#[test]
fn test_regenerate_replaces_queue() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);

    generate_json(temp_dir.path(), &script, &["--squat", "300", "--cycles", "2"]);
    let second = generate_json(temp_dir.path(), &script, &["--squat", "300", "--cycles", "2"]);

    assert_eq!(second["deleted_count"], 6);
    assert_eq!(second["count"], 6);
    assert_eq!(read_store(temp_dir.path()).len(), 6);
}

#[test]
fn test_cycles_number_sessions_across_repeats() {
    let temp_dir = setup_test_dir();
    let script = write_script(
        temp_dir.path(),
        "## Squat Day\nSquat / 1x5 135\n## Bench Day\nBench / 1x5 95\n",
    );

    let result = generate_json(temp_dir.path(), &script, &["--cycles", "3"]);
    assert_eq!(result["sessions"], 6);

    let sessions: Vec<u64> = read_store(temp_dir.path())
        .iter()
        .map(|r| r["session"].as_u64().unwrap())
        .collect();
    assert_eq!(sessions, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_missing_max_fails_without_touching_store() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);

    // Seed the store with a good run
    generate_json(temp_dir.path(), &script, &["--squat", "300"]);

    cli(temp_dir.path())
        .arg("generate")
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"))
        .stderr(predicate::str::contains("Squat max"));

    assert_eq!(read_store(temp_dir.path()).len(), 3);
}

#[test]
fn test_orphan_exercise_reports_line() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), "# Week 1\nSquat / 3x5 135\n");

    let result = generate_json(temp_dir.path(), &script, &[]);
    assert_eq!(result["success"], false);
    assert!(result["message"].as_str().unwrap().contains("line 2"));
    assert!(!temp_dir.path().join("data/upcoming.json").exists());
}

#[test]
fn test_zero_cycles_is_rejected() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);

    let result = generate_json(temp_dir.path(), &script, &["--squat", "300", "--cycles", "0"]);
    assert_eq!(result["success"], false);
    assert!(result["message"].as_str().unwrap().contains("num_cycles"));
}

#[test]
fn test_dry_run_does_not_write() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);

    cli(temp_dir.path())
        .arg("generate")
        .arg("--script")
        .arg(&script)
        .arg("--squat")
        .arg("300")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("255 lbs"));

    assert!(!temp_dir.path().join("data/upcoming.json").exists());
}

#[test]
fn test_generate_from_preset() {
    let temp_dir = setup_test_dir();

    let output = cli(temp_dir.path())
        .arg("generate")
        .arg("--preset")
        .arg("wendler_531")
        .arg("--squat")
        .arg("300")
        .arg("--bench")
        .arg("200")
        .arg("--deadlift")
        .arg("400")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["sessions"], 12);
}

#[test]
fn test_history_supplies_missing_maxes() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);
    let history = temp_dir.path().join("history.csv");
    fs::write(
        &history,
        "date,exercise,category,weight,weight_unit,reps,comment\n\
         2024-01-01,Barbell Squat,Legs,300,lbs,5,\n",
    )
    .unwrap();

    // 300x5 estimates a 350 max; 65% of 350 = 227.5 → 230
    let result = generate_json(
        temp_dir.path(),
        &script,
        &["--history", history.to_str().unwrap()],
    );
    assert_eq!(result["success"], true);
    assert_eq!(read_store(temp_dir.path())[0]["weight"], 230.0);
}

#[test]
fn test_presets_listing() {
    let temp_dir = setup_test_dir();

    let output = cli(temp_dir.path())
        .arg("presets")
        .arg("--json")
        .output()
        .unwrap();
    let presets: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let wendler = presets.iter().find(|p| p["name"] == "wendler_531").unwrap();
    assert_eq!(wendler["requires_maxes"], true);

    cli(temp_dir.path())
        .arg("preset")
        .arg("linear_strength")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Day A"));

    cli(temp_dir.path())
        .arg("preset")
        .arg("no_such_preset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown preset"));
}

#[test]
fn test_upcoming_drop_session_and_export() {
    let temp_dir = setup_test_dir();
    let script = write_script(
        temp_dir.path(),
        "## Squat Day\nSquat / 2x5 135 // paused\n## Bench Day\nBench / 1x5 95\n",
    );
    generate_json(temp_dir.path(), &script, &[]);

    cli(temp_dir.path())
        .arg("upcoming")
        .arg("--session")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session 1"))
        .stdout(predicate::str::contains("paused"));

    cli(temp_dir.path())
        .arg("drop-session")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 workouts"));

    cli(temp_dir.path())
        .arg("drop-session")
        .arg("1")
        .assert()
        .failure();

    let csv_path = temp_dir.path().join("upcoming.csv");
    cli(temp_dir.path())
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 workouts"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("Bench"));
    assert!(!csv.contains("paused"));
}

#[test]
fn test_estimate() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("estimate")
        .arg("--weight")
        .arg("225")
        .arg("--reps")
        .arg("10")
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated 1RM: 300"));

    cli(temp_dir.path())
        .arg("estimate")
        .arg("--weight")
        .arg("225")
        .arg("--reps")
        .arg("zero")
        .assert()
        .failure();
}

#[test]
fn test_config_init_and_kg_unit() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("config")
        .arg("init")
        .assert()
        .success();
    assert!(temp_dir.path().join("config.toml").exists());

    cli(temp_dir.path())
        .arg("config")
        .arg("init")
        .assert()
        .failure();

    fs::write(
        temp_dir.path().join("config.toml"),
        "[plan]\nweight_unit = \"kg\"\n",
    )
    .unwrap();
    let script = write_script(temp_dir.path(), "## Squat\nSquat / 1x5 77%\n");
    generate_json(temp_dir.path(), &script, &["--squat", "140"]);

    let rows = read_store(temp_dir.path());
    assert_eq!(rows[0]["weight"], 107.5);
    assert_eq!(rows[0]["weight_unit"], "kg");
}

#[test]
fn test_oversized_set_count_is_rejected() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), "## Squat Day\nSquat / 2000000x5 135\n");

    cli(temp_dir.path())
        .arg("generate")
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("at most 100"));

    assert!(!temp_dir.path().join("data/upcoming.json").exists());
}

#[test]
fn test_history_in_other_unit_is_ignored() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);
    let history = temp_dir.path().join("history.csv");
    fs::write(
        &history,
        "date,exercise,category,weight,weight_unit,reps,comment\n\
         2024-01-01,Barbell Squat,Legs,300,lbs,5,\n\
         2024-01-02,Barbell Squat,Legs,400,kg,5,\n",
    )
    .unwrap();

    // Read as lbs, the kg set would estimate 466.7 and win
    let result = generate_json(
        temp_dir.path(),
        &script,
        &["--history", history.to_str().unwrap()],
    );
    assert_eq!(result["success"], true);
    assert_eq!(read_store(temp_dir.path())[0]["weight"], 230.0);
}

#[test]
fn test_complete_session_moves_rows_to_history() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);
    generate_json(temp_dir.path(), &script, &["--squat", "300", "--cycles", "2"]);

    cli(temp_dir.path())
        .arg("complete")
        .arg("1")
        .arg("--date")
        .arg("2024-06-03")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferred 3 workouts to 2024-06-03"));

    let history = fs::read_to_string(temp_dir.path().join("data/history.csv")).unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines[0], "date,exercise,category,weight,weight_unit,reps,comment");
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("2024-06-03,Barbell Squat,Squat,255.0,lbs,5+"));

    let rows = read_store(temp_dir.path());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["session"] == 2));

    cli(temp_dir.path())
        .arg("complete")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session 1 not found"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("data/history.csv")).unwrap(), history);
}

#[test]
fn test_progression_json() {
    let temp_dir = setup_test_dir();
    let script = write_script(temp_dir.path(), WEEK_ONE);
    generate_json(temp_dir.path(), &script, &["--squat", "300", "--cycles", "2"]);

    cli(temp_dir.path())
        .arg("complete")
        .arg("1")
        .arg("--date")
        .arg("2024-06-03")
        .assert()
        .success();

    let output = cli(temp_dir.path())
        .arg("progression")
        .arg("barbell squat")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let historical = report["historical"].as_array().unwrap();
    assert_eq!(historical.len(), 1);
    assert_eq!(historical[0]["date"], "2024-06-03");
    assert_eq!(historical[0]["weight"], 255.0);
    assert_eq!(historical[0]["estimated_1rm"], 297.5);

    let upcoming = report["upcoming"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["session"], 2);
    assert_eq!(upcoming[0]["projected_date"], "2024-06-05");
    assert_eq!(upcoming[0]["reps"], "5+");
}
