//! End-to-end runs of the binary.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_backup-estimator"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("backup-estimator process should run")
}

fn stdout_of(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

#[test]
fn status_at_night_with_default_preset() {
    let stdout = stdout_of(&["status", "--at", "21:00"]);
    assert!(stdout.contains("Battery:"), "stdout: {stdout}");
    assert!(stdout.contains("Bulk Charging"));
    assert!(stdout.contains("NEPA Only Mode"));
    assert!(stdout.contains("4.3%"));
}

#[test]
fn status_at_noon_is_hybrid() {
    let stdout = stdout_of(&["--preset", "default", "status", "--at", "12:00"]);
    assert!(stdout.contains("Hybrid Mode - Solar & NEPA"));
    assert!(stdout.contains("Solar:     967W"));
}

#[test]
fn reference_table_for_each_preset() {
    let stdout = stdout_of(&["--preset", "compact_12v", "reference"]);
    assert!(stdout.starts_with("12V reference curve"));
    assert_eq!(stdout.lines().count(), 9);

    let stdout = stdout_of(&["--preset", "lithium_48v", "reference"]);
    assert!(stdout.starts_with("48V reference curve"));
    assert_eq!(stdout.lines().count(), 8);
}

#[test]
fn session_from_scenario_file_exports_csv() {
    let csv_path = std::env::temp_dir().join(format!(
        "backup-estimator-cli-{}.csv",
        std::process::id()
    ));
    let csv_arg = csv_path.to_string_lossy().into_owned();
    let stdout = stdout_of(&[
        "--scenario",
        "scenarios/lagos_evening_outage.toml",
        "session",
        "--csv-out",
        &csv_arg,
    ]);
    assert_eq!(stdout.lines().count(), 24);
    assert!(stdout.contains("Battery Only - No Input!"));

    let csv = std::fs::read_to_string(&csv_path).unwrap_or_default();
    std::fs::remove_file(&csv_path).ok();
    assert_eq!(csv.lines().count(), 25);
    assert!(csv.starts_with("step,time,timestamp_ms"));
}

#[test]
fn seed_override_is_deterministic() {
    let a = stdout_of(&["session", "--seed", "99"]);
    let b = stdout_of(&["session", "--seed", "99"]);
    let c = stdout_of(&["session", "--seed", "100"]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn unknown_preset_fails() {
    let output = run(&["--preset", "mansion", "status"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

#[test]
fn invalid_scenario_is_rejected() {
    let path = std::env::temp_dir().join(format!(
        "backup-estimator-invalid-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[system]\nnum_batteries = 0\n").ok();
    let output = run(&["--scenario", &path.to_string_lossy(), "status"]);
    std::fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("system.num_batteries"), "stderr: {stderr}");
}

#[test]
fn validation_errors_are_reported_once() {
    let path = std::env::temp_dir().join(format!(
        "backup-estimator-reported-once-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[system]\nnum_batteries = 0\n").ok();
    let output = run(&["--scenario", &path.to_string_lossy(), "reference"]);
    std::fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("system.num_batteries").count(), 1, "stderr: {stderr}");
    assert!(stderr.contains("invalid configuration"), "stderr: {stderr}");
}
