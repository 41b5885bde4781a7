//! Integration tests for the lazymemo CLI.

use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;

fn lazymemo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lazymemo"))
}

fn lazymemo() -> AssertCommand {
    AssertCommand::new(env!("CARGO_BIN_EXE_lazymemo"))
}

#[test]
fn test_version_command() {
    let output = lazymemo_bin()
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lazymemo"));
}

#[test]
fn test_help_command() {
    let output = lazymemo_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["init", "fib", "range", "pipeline", "lines", "pages", "memo", "menu"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_fib_command() {
    lazymemo()
        .args(["fib", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("F(10) = 55"));
}

#[test]
fn test_fib_largest_input() {
    lazymemo()
        .args(["fib", "186"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "332825110087067562321196029789634457848",
        ));
}

#[test]
fn test_fib_sequence_json() {
    lazymemo()
        .args(["--json", "fib", "5", "--sequence"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"values\":[0,1,1,2,3,5]"));
}

#[test]
fn test_fib_rejects_negative_input() {
    lazymemo()
        .args(["fib", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_fib_rejects_input_past_limit() {
    lazymemo().args(["fib", "187"]).assert().failure();
}

#[test]
fn test_range_counts_down() {
    lazymemo()
        .args(["range", "10", "0", "--step", "-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 8 6 4 2 0"));
}

#[test]
fn test_range_rejects_zero_step() {
    lazymemo()
        .args(["range", "0", "10", "--step", "0"])
        .assert()
        .failure();
}

#[test]
fn test_pipeline_command() {
    lazymemo()
        .args(["--json", "pipeline", "--take", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[4,16,36]"));
}

#[test]
fn test_pages_command() {
    lazymemo()
        .args(["pages", "25", "--page-size", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1/3: 10 records"))
        .stdout(predicate::str::contains("Page 3/3: 5 records (IDs: 21, 22, 23, 24, 25)"));
}

#[test]
fn test_lines_command_filters() {
    use std::fs;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log = temp_dir.path().join("app.log");
    fs::write(&log, "INFO start\nERROR disk full\nINFO done\nERROR timeout\n")
        .expect("Failed to write file");

    lazymemo()
        .arg("lines")
        .arg(&log)
        .args(["--contains", "ERROR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Line 2: ERROR disk full"))
        .stdout(predicate::str::contains("Line 4: ERROR timeout"))
        .stdout(predicate::str::contains("Total lines: 2"));
}

#[test]
fn test_lines_missing_file_fails() {
    lazymemo()
        .args(["lines", "/no/such/file.log"])
        .assert()
        .failure();
}

#[test]
fn test_ids_command() {
    let output = lazymemo_bin()
        .args(["--json", "ids", "--prefix", "ORD", "-n", "4"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let ids: Vec<String> = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| id.len() == 9 && id.starts_with("ORD")));
}

#[test]
fn test_sum_command() {
    lazymemo()
        .args(["sum", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5050"));
}

#[test]
fn test_memo_command_reports_hits() {
    lazymemo()
        .args(["memo", "5", "10", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[MISS] 5 -> 25"))
        .stdout(predicate::str::contains("[HIT] 5 -> 25"));
}

#[test]
fn test_init_creates_config() {
    use std::fs;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("lazymemo.toml");

    let output = lazymemo_bin()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "init command failed");
    assert!(config_path.exists(), "Config file was not created");

    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[general]"));
    assert!(content.contains("[sequence]"));
    assert!(content.contains("[evaluator]"));
}

#[test]
fn test_config_file_sets_defaults() {
    use std::fs;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[sequence]\ndefault_take = 2\n").expect("Failed to write config");

    lazymemo()
        .arg("--config")
        .arg(&config_path)
        .args(["--json", "pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[4,16]"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    use std::fs;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[sequence]\npage_size = 0\n").expect("Failed to write config");

    lazymemo()
        .arg("--config")
        .arg(&config_path)
        .arg("version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    lazymemo()
        .arg("--config")
        .arg(temp_dir.path().join("absent.toml"))
        .args(["--json", "pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[4,16,36,64,100,144,196,256,324,400]"));
}

#[test]
fn test_memo_command_rejects_overflow() {
    lazymemo()
        .args(["memo", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Overflow"));
}

#[test]
fn test_users_command_filters_by_status() {
    use std::fs;
    use tempfile::TempDir;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let csv = temp_dir.path().join("users.csv");
    fs::write(
        &csv,
        "name,email,age,status\n\
         alice,alice@example.com,30,active\n\
         bob,bob@example.com,25,inactive\n",
    )
    .expect("Failed to write file");

    lazymemo()
        .arg("users")
        .arg(&csv)
        .args(["--status", "inactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. BOB (bob@example.com) - Age: 25"))
        .stdout(predicate::str::contains("ALICE").not())
        .stdout(predicate::str::contains("Total users: 1"));

    lazymemo()
        .arg("users")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. ALICE (alice@example.com) - Age: 30"));
}

#[test]
fn test_users_missing_file_fails() {
    lazymemo()
        .args(["users", "/no/such/users.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Csv"));
}

#[test]
fn test_invalid_command() {
    let output = lazymemo_bin()
        .arg("invalid-command-that-does-not-exist")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_verbose_flag() {
    let output = lazymemo_bin()
        .arg("-v")
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}

#[test]
fn test_quiet_flag() {
    let output = lazymemo_bin()
        .arg("-q")
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}
