//! Subprocess invoker tests for Corpus Gate core.
// crates/corpus-gate-core/tests/invoker.rs
// ============================================================================
// Module: Invoker Tests
// Description: Real process execution against shell-script validators.
// Purpose: Verify exit mapping, output capture, timeouts, and process cleanup.
// ============================================================================

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use corpus_gate_core::InvocationError;
use corpus_gate_core::InvokerConfig;
use corpus_gate_core::MemcheckWrapper;
use corpus_gate_core::ProcessValidator;
use corpus_gate_core::Sample;
use corpus_gate_core::Validator;
use corpus_gate_core::Verdict;
use corpus_gate_core::WrapperOptions;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn validator(executable: PathBuf, timeout: Duration) -> ProcessValidator {
    let mut config = InvokerConfig::new(executable);
    config.timeout = timeout;
    ProcessValidator::new(config)
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_zero_is_valid_and_output_is_captured() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "ok.sh", "echo \"$1 $2\"\necho warn >&2\nexit 0");
    let result = validator(script, Duration::from_secs(5))
        .validate(&Sample::from_path("/tmp/doc.pdf"))
        .await;
    assert_eq!(result.actual_verdict(), Verdict::Valid);
    assert_eq!(result.exit_code(), Some(0));
    assert_eq!(result.output, "info /tmp/doc.pdf\nwarn\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_zero_exit_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "bad.sh", "exit 3");
    let result =
        validator(script, Duration::from_secs(5)).validate(&Sample::from_path("x.pdf")).await;
    assert_eq!(result.actual_verdict(), Verdict::Invalid);
    assert_eq!(result.exit_code(), Some(3));
    assert!(result.failure().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn hanging_validator_is_killed_at_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "hang.sh", "exec sleep 30");
    let started = Instant::now();
    let result =
        validator(script, Duration::from_millis(200)).validate(&Sample::from_path("x.pdf")).await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(result.actual_verdict(), Verdict::Invalid);
    assert_eq!(
        result.failure(),
        Some(&InvocationError::TimedOut {
            timeout_ms: 200
        })
    );
}

/// Returns true while any process runs `sleep` with `marker` as its argument.
#[cfg(target_os = "linux")]
fn sleeper_alive(marker: &str) -> bool {
    let needle = format!("sleep\0{marker}");
    std::fs::read_dir("/proc").unwrap().filter_map(Result::ok).any(|entry| {
        std::fs::read(entry.path().join("cmdline"))
            .map(|cmdline| String::from_utf8_lossy(&cmdline).contains(&needle))
            .unwrap_or(false)
    })
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn timeout_kills_validator_descendants() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "hang.sh", "sleep 47.321\nexit 0");
    let result =
        validator(script, Duration::from_millis(300)).validate(&Sample::from_path("x.pdf")).await;
    assert_eq!(
        result.failure(),
        Some(&InvocationError::TimedOut {
            timeout_ms: 300
        })
    );
    let deadline = Instant::now() + Duration::from_secs(2);
    while sleeper_alive("47.321") && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!sleeper_alive("47.321"), "sleep outlived the timed-out validator");
}

#[tokio::test(flavor = "multi_thread")]
async fn background_child_does_not_hide_output() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "bg.sh", "echo diag\nsleep 5 &\nexit 1");
    let started = Instant::now();
    let result =
        validator(script, Duration::from_secs(5)).validate(&Sample::from_path("x.pdf")).await;
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(result.exit_code(), Some(1));
    assert!(result.output.contains("diag"), "output was {:?}", result.output);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_executable_is_spawn_failure() {
    let dir = tempfile::tempdir().unwrap();
    let result = validator(dir.path().join("absent"), Duration::from_secs(1))
        .validate(&Sample::from_path("x.pdf"))
        .await;
    assert_eq!(result.actual_verdict(), Verdict::Invalid);
    assert!(matches!(result.failure(), Some(InvocationError::Spawn { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn signal_termination_is_crash() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "crash.sh", "kill -9 $$");
    let result =
        validator(script, Duration::from_secs(5)).validate(&Sample::from_path("x.pdf")).await;
    assert!(matches!(result.failure(), Some(InvocationError::Crashed { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn memcheck_wrapper_prefixes_validator() {
    let dir = tempfile::tempdir().unwrap();
    let wrapper = write_script(dir.path(), "wrap.sh", "echo \"$@\"\nexit 0");
    let mut config = InvokerConfig::new("reader");
    config.wrapper = WrapperOptions {
        memcheck: Some(MemcheckWrapper {
            program: wrapper,
            extra_args: Vec::new(),
        }),
    };
    let result = ProcessValidator::new(config).validate(&Sample::from_path("x.pdf")).await;
    assert_eq!(
        result.output.trim_end(),
        "--leak-check=full --leak-resolution=med --track-origins=yes --error-exitcode=0 \
         reader info x.pdf"
    );
}
