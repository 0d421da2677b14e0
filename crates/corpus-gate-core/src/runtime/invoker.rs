// crates/corpus-gate-core/src/runtime/invoker.rs
// ============================================================================
// Module: Validator Invoker
// Description: Bounded-time subprocess execution of the external validator.
// Purpose: Turn one validator run into an invocation result without leaks.
// Dependencies: async-trait, nix, tokio, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`run_with_timeout`] spawns one process, drains its pipes concurrently,
//! and waits under a wall-clock limit. [`ProcessValidator`] binds that
//! primitive to a validator executable and the command builder.
//!
//! ## Invariants
//! - Every spawned child is either reaped or killed and reaped before the
//!   call returns; `kill_on_drop` covers cancellation of the future itself.
//! - On Unix the child leads its own process group, and the whole group is
//!   killed once the child exits or times out, so no descendant outlives the
//!   invocation.
//! - Pipe draining is bounded by a short grace period after exit. Bytes read
//!   before the grace period ends are kept even when the reader is aborted.
//! - Captured output is capped at [`MAX_CAPTURE_BYTES`] per stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
#[cfg(unix)]
use nix::sys::signal::Signal;
#[cfg(unix)]
use nix::sys::signal::killpg;
#[cfg(unix)]
use nix::unistd::Pid;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::core::InvocationError;
use crate::core::InvocationResult;
use crate::core::Sample;
use crate::interfaces::Validator;
use crate::runtime::command::CommandSpec;
use crate::runtime::command::DEFAULT_SUBCOMMAND;
use crate::runtime::command::WrapperOptions;
use crate::runtime::command::validator_command;
use crate::runtime::command::wrap_command;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-invocation wall-clock limit.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Maximum bytes retained from each of stdout and stderr.
pub const MAX_CAPTURE_BYTES: usize = 1024 * 1024;
/// How long pipe readers may run after the child has exited or been killed.
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(250);
/// Read buffer size for pipe draining.
const READ_CHUNK_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Process Execution
// ============================================================================

/// Runs `spec` to completion or until `limit` elapses.
pub async fn run_with_timeout(spec: &CommandSpec, limit: Duration) -> InvocationResult {
    let started = Instant::now();
    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    command.kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            let error = InvocationError::Spawn {
                program: spec.program.display().to_string(),
                message: err.to_string(),
            };
            return InvocationResult::failed(error, String::new(), started.elapsed());
        }
    };
    let group = child.id();

    let stdout = child.stdout.take().map(PipeReader::spawn);
    let stderr = child.stderr.take().map(PipeReader::spawn);

    let outcome = match timeout(limit, child.wait()).await {
        Ok(Ok(status)) => {
            // Background descendants of an exited validator.
            kill_group(group);
            status.code().ok_or_else(|| InvocationError::Crashed {
                detail: status.to_string(),
            })
        }
        Ok(Err(err)) => {
            kill_group(group);
            let _ = child.kill().await;
            Err(InvocationError::Wait {
                message: err.to_string(),
            })
        }
        Err(_) => {
            kill_group(group);
            let _ = child.kill().await;
            Err(InvocationError::TimedOut {
                timeout_ms: limit.as_millis(),
            })
        }
    };

    let mut output = PipeReader::collect(stdout).await;
    output.push_str(&PipeReader::collect(stderr).await);
    let elapsed = started.elapsed();
    match outcome {
        Ok(code) => InvocationResult::exited(code, output, elapsed),
        Err(error) => InvocationResult::failed(error, output, elapsed),
    }
}

/// Sends `SIGKILL` to the process group led by the spawned child.
#[cfg(unix)]
fn kill_group(group: Option<u32>) {
    let Some(raw) = group.and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    // ESRCH only means every member is already gone.
    let _ = killpg(Pid::from_raw(raw), Signal::SIGKILL);
}

/// Process groups are unavailable; the direct child is killed by the caller.
#[cfg(not(unix))]
const fn kill_group(_group: Option<u32>) {}

// ============================================================================
// SECTION: Pipe Capture
// ============================================================================

/// Background reader that appends one pipe into a shared buffer.
struct PipeReader {
    /// Bytes captured so far; readable even after the task is aborted.
    buffer: Arc<Mutex<Vec<u8>>>,
    /// Task draining the pipe.
    task: JoinHandle<()>,
}

impl PipeReader {
    /// Starts draining `pipe` on the runtime.
    fn spawn<R>(pipe: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(drain(pipe, Arc::clone(&buffer)));
        Self {
            buffer,
            task,
        }
    }

    /// Waits out the drain grace period and returns what was captured.
    async fn collect(reader: Option<Self>) -> String {
        let Some(reader) = reader else {
            return String::new();
        };
        let abort = reader.task.abort_handle();
        if timeout(PIPE_DRAIN_GRACE, reader.task).await.is_err() {
            abort.abort();
        }
        let bytes = reader.buffer.lock().await;
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Reads a pipe to EOF, keeping at most [`MAX_CAPTURE_BYTES`].
async fn drain<R>(mut pipe: R, buffer: Arc<Mutex<Vec<u8>>>)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0_u8; READ_CHUNK_BYTES];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => {
                let mut captured = buffer.lock().await;
                let room = MAX_CAPTURE_BYTES.saturating_sub(captured.len());
                captured.extend_from_slice(&chunk[.. read.min(room)]);
            }
        }
    }
}

// ============================================================================
// SECTION: Process Validator
// ============================================================================

/// Settings for a subprocess-backed validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Validator executable.
    pub executable: PathBuf,
    /// Subcommand placed before the sample path.
    pub subcommand: String,
    /// Wall-clock limit per invocation.
    pub timeout: Duration,
    /// Optional command wrappers.
    pub wrapper: WrapperOptions,
}

impl InvokerConfig {
    /// Creates a config with default subcommand, timeout, and no wrapper.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            subcommand: DEFAULT_SUBCOMMAND.to_string(),
            timeout: DEFAULT_TIMEOUT,
            wrapper: WrapperOptions::default(),
        }
    }
}

/// Validator that runs an external executable once per sample.
#[derive(Debug, Clone)]
pub struct ProcessValidator {
    /// Invocation settings.
    config: InvokerConfig,
}

impl ProcessValidator {
    /// Creates a validator from `config`.
    #[must_use]
    pub const fn new(config: InvokerConfig) -> Self {
        Self {
            config,
        }
    }

    /// Builds the full command line for `sample`.
    #[must_use]
    pub fn command_for(&self, sample: &Sample) -> CommandSpec {
        let base =
            validator_command(&self.config.executable, &self.config.subcommand, sample.path());
        wrap_command(base, &self.config.wrapper)
    }
}

#[async_trait]
impl Validator for ProcessValidator {
    async fn validate(&self, sample: &Sample) -> InvocationResult {
        run_with_timeout(&self.command_for(sample), self.config.timeout).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
