// crates/corpus-gate-cli/tests/run_command.rs
// ============================================================================
// Module: CLI Run Command Tests
// Description: End-to-end runs of the CLI binary against stub validators.
// Purpose: Ensure verdict comparison, reporting, and exit codes hold end to end.
// Dependencies: corpus-gate-cli binary
// ============================================================================

//! ## Overview
//! Builds a throwaway corpus and a shell-script validator per test, runs the
//! `corpus-gate` binary, and checks its report and exit status.

#![cfg(unix)]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::Duration;
use std::time::Instant;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validator that accepts everything.
const ACCEPT_ALL: &str = "exit 0";
/// Validator that rejects everything with a short diagnostic.
const REJECT_ALL: &str = "echo \"bad xref in $2\"\nexit 1";

fn corpus_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_corpus-gate"))
}

/// Throwaway corpus with a validator script and a working directory.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("corpus")).expect("corpus dir");
        Self {
            dir,
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn corpus(&self) -> PathBuf {
        self.root().join("corpus")
    }

    fn sample(&self, relative: &str) -> PathBuf {
        let path = self.corpus().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("sample dir");
        fs::write(&path, b"%PDF-1.7\n%%EOF\n").expect("write sample");
        path
    }

    fn validator(&self, body: &str) -> PathBuf {
        let path = self.root().join("validator.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write validator");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path
    }

    fn config(&self, body: &str) -> PathBuf {
        let path = self.root().join("gate.toml");
        fs::write(&path, body).expect("write config");
        path
    }

    fn run(&self, validator: &Path, suite: &str, extra: &[&str]) -> Output {
        Command::new(corpus_gate_bin())
            .current_dir(self.root())
            .env_remove("CORPUS_GATE_CONFIG")
            .arg(validator)
            .arg(self.corpus())
            .arg(suite)
            .args(extra)
            .output()
            .expect("run corpus-gate")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

#[test]
fn passing_sample_exits_zero() {
    let fixture = Fixture::new();
    fixture.sample("Demo/demo-pass-a.pdf");
    let validator = fixture.validator(ACCEPT_ALL);

    let output = fixture.run(&validator, "Demo", &[]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1/1 (100.00% of 1 test files, 0 ignored explicitly)\n");
}

#[test]
fn rejected_valid_sample_exits_non_zero_with_diagnostic() {
    let fixture = Fixture::new();
    let sample = fixture.sample("Demo/demo-pass-a.pdf");
    let validator = fixture.validator(REJECT_ALL);

    let output = fixture.run(&validator, "Demo", &[]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains(&format!("\u{2613} {}", sample.display())));
    assert!(text.contains(&format!("    bad xref in {}", sample.display())));
    assert!(text.ends_with("0/1 (0.00% of 1 test files, 0 ignored explicitly)\n"));
}

#[test]
fn ignored_sample_is_counted_but_not_tested() {
    let fixture = Fixture::new();
    fixture.sample("Demo/demo-pass-a.pdf");
    let validator = fixture.validator(REJECT_ALL);
    let config = fixture.config("[[suites]]\nname = \"Demo\"\nignore = [\"demo-pass-a\"]\n");

    let output =
        fixture.run(&validator, "Demo", &["--config", config.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "0/0 (0.00% of 1 test files, 1 ignored explicitly)\n");
}

#[test]
fn hanging_validator_times_out_without_blocking_siblings() {
    let fixture = Fixture::new();
    let hang = fixture.sample("Demo/hang.pdf");
    fixture.sample("Demo/ok.pdf");
    let validator = fixture.validator("case \"$2\" in\n  *hang*) sleep 30; exit 0 ;;\nesac\nexit 0");

    let started = Instant::now();
    let output = fixture.run(&validator, "Demo", &["--timeout-ms", "300"]);
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains(&format!("\u{2613} {}", hang.display())));
    assert!(text.contains("    execution failed: timed out after 300 ms"));
    assert!(text.ends_with("1/2 (50.00% of 2 test files, 0 ignored explicitly)\n"));
}

// ============================================================================
// SECTION: Selection and Policy
// ============================================================================

#[test]
fn fail_samples_are_skipped_by_default() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a-pass.pdf");
    fixture.sample("Demo/b-fail.pdf");
    let validator = fixture.validator(ACCEPT_ALL);

    let output = fixture.run(&validator, "Demo", &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "1/1 (100.00% of 1 test files, 0 ignored explicitly)\n");
}

#[test]
fn all_samples_flag_tests_fail_samples() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a-pass.pdf");
    fixture.sample("Demo/b-fail.pdf");
    let validator = fixture.validator("case \"$2\" in\n  *fail*) exit 1 ;;\nesac\nexit 0");

    let output = fixture.run(&validator, "Demo", &["--all-samples"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output), "2/2 (100.00% of 2 test files, 0 ignored explicitly)\n");
}

#[test]
fn activation_list_limits_tested_samples() {
    let fixture = Fixture::new();
    fixture.sample("Demo/6.1/a.pdf");
    fixture.sample("Demo/6.2/b.pdf");
    let validator = fixture.validator(ACCEPT_ALL);
    let config = fixture.config("[[suites]]\nname = \"Demo\"\nactivate = [\"/6.1/\"]\n");

    let output =
        fixture.run(&validator, "Demo", &["--config", config.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "1/1 (50.00% of 2 test files, 0 ignored explicitly)\n");
}

#[test]
fn repeated_runs_report_identical_counts() {
    let fixture = Fixture::new();
    for name in ["a.pdf", "b.pdf", "nested/c.pdf", "nested/d-fail.pdf"] {
        fixture.sample(&format!("Demo/{name}"));
    }
    let validator = fixture.validator("case \"$2\" in\n  *b.pdf) exit 1 ;;\nesac\nexit 0");

    let first = fixture.run(&validator, "Demo", &["--workers", "2"]);
    let second = fixture.run(&validator, "Demo", &["--workers", "2"]);
    assert_eq!(first.status.code(), second.status.code());
    assert_eq!(stdout(&first), stdout(&second));
}

// ============================================================================
// SECTION: Output Modes
// ============================================================================

#[test]
fn verbose_prints_passing_samples() {
    let fixture = Fixture::new();
    let sample = fixture.sample("Demo/a.pdf");
    let validator = fixture.validator(ACCEPT_ALL);

    let output = fixture.run(&validator, "Demo", &["--verbose"]);
    assert!(stdout(&output).starts_with(&format!("\u{2713} {}\n", sample.display())));
}

#[test]
fn json_format_prints_summary_object() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a.pdf");
    fixture.sample("Demo/b.pdf");
    let validator = fixture.validator("case \"$2\" in\n  *b.pdf) exit 1 ;;\nesac\nexit 0");

    let output = fixture.run(&validator, "Demo", &["--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    assert_eq!(value["summary"]["passed"], 1);
    assert_eq!(value["summary"]["total"], 2);
    assert_eq!(value["percentage"], "50.00");
    assert_eq!(value["passed"], false);
}

#[test]
fn dry_run_lists_plan_without_invoking() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a.pdf");
    fixture.sample("Demo/b-fail.pdf");
    let marker = fixture.root().join("invoked");
    let validator = fixture.validator(&format!("touch {}\nexit 1", marker.display()));

    let output = fixture.run(&validator, "Demo", &["--dry-run"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!marker.exists());
    let text = stdout(&output);
    assert!(text.contains("run  Demo/a.pdf"));
    assert!(text.contains("skip Demo/b-fail.pdf (expected_invalid)"));
    assert!(text.contains("1 selected of 1 test files (2 discovered"));
}

#[test]
fn event_log_records_run_lifecycle() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a.pdf");
    let validator = fixture.validator(ACCEPT_ALL);
    let log = fixture.root().join("events.jsonl");

    let output =
        fixture.run(&validator, "Demo", &["--event-log", log.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0));
    let contents = fs::read_to_string(&log).expect("event log");
    let events: Vec<String> = contents
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            value["event"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(events, vec!["run_started", "sample_completed", "run_finished"]);
}

#[test]
fn version_flag_prints_version() {
    let output = Command::new(corpus_gate_bin()).arg("--version").output().expect("run");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("corpus-gate "));
}

// ============================================================================
// SECTION: Usage Errors
// ============================================================================

#[test]
fn missing_arguments_print_usage() {
    let output = Command::new(corpus_gate_bin()).arg("./reader").output().expect("run");
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn missing_corpus_directory_prints_usage() {
    let fixture = Fixture::new();
    let validator = fixture.validator(ACCEPT_ALL);
    let output = Command::new(corpus_gate_bin())
        .current_dir(fixture.root())
        .env_remove("CORPUS_GATE_CONFIG")
        .arg(&validator)
        .arg(fixture.root().join("absent"))
        .arg("Demo")
        .output()
        .expect("run");
    assert_ne!(output.status.code(), Some(0));
    let text = stderr(&output);
    assert!(text.contains("does not exist"));
    assert!(text.contains("Usage:"));
}

#[test]
fn corpus_root_that_is_a_file_prints_usage() {
    let fixture = Fixture::new();
    let validator = fixture.validator(ACCEPT_ALL);
    let not_a_dir = fixture.root().join("corpus.pdf");
    fs::write(&not_a_dir, b"%PDF-1.7\n").expect("write file");
    let output = Command::new(corpus_gate_bin())
        .current_dir(fixture.root())
        .env_remove("CORPUS_GATE_CONFIG")
        .arg(&validator)
        .arg(&not_a_dir)
        .arg("Demo")
        .output()
        .expect("run");
    assert_ne!(output.status.code(), Some(0));
    let text = stderr(&output);
    assert!(text.contains("is not a directory"));
    assert!(!text.contains("does not exist"));
    assert!(text.contains("Usage:"));
}

#[test]
fn missing_suite_directory_fails_before_invocation() {
    let fixture = Fixture::new();
    let validator = fixture.validator(ACCEPT_ALL);
    let output = fixture.run(&validator, "Absent", &[]);
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("suite directory"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn invalid_config_fails_closed() {
    let fixture = Fixture::new();
    fixture.sample("Demo/a.pdf");
    let validator = fixture.validator(ACCEPT_ALL);
    let config = fixture.config("[run]\nworkers = 0\n");
    let output =
        fixture.run(&validator, "Demo", &["--config", config.to_string_lossy().as_ref()]);
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Failed to load config"));
}
