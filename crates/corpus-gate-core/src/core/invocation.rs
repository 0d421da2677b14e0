// crates/corpus-gate-core/src/core/invocation.rs
// ============================================================================
// Module: Invocation Results
// Description: Outcome of a single validator run.
// Purpose: Map exit statuses and execution failures to actual verdicts.
// Dependencies: thiserror, crate::core::sample
// ============================================================================

//! ## Overview
//! An [`InvocationResult`] is produced once per validator run and consumed
//! immediately by the comparator. Failures to start, crashes, and timeouts
//! are data here, never errors that escape a worker task.
//!
//! ## Invariants
//! - Exit code `0` maps to [`Verdict::Valid`]; any other exit code maps to
//!   [`Verdict::Invalid`].
//! - Every execution failure maps to [`Verdict::Invalid`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::core::sample::Verdict;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a validator run produced no usable exit status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The process could not be started.
    #[error("failed to start {program}: {message}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// OS error text.
        message: String,
    },
    /// The process exceeded its wall-clock budget and was killed.
    #[error("timed out after {timeout_ms} ms")]
    TimedOut {
        /// Configured timeout in milliseconds.
        timeout_ms: u128,
    },
    /// The process terminated without an exit code.
    #[error("crashed ({detail})")]
    Crashed {
        /// Platform description of the termination.
        detail: String,
    },
    /// Waiting on the process failed.
    #[error("failed to wait for process: {message}")]
    Wait {
        /// OS error text.
        message: String,
    },
    /// The worker task running the invocation panicked or was cancelled.
    #[error("task panicked")]
    TaskAborted,
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Exit status of a validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStatus {
    /// The process exited normally with a code.
    Exited(i32),
    /// The run failed; see the error for details.
    Failed(InvocationError),
}

/// Captured outcome of one validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit status or failure sentinel.
    pub status: InvocationStatus,
    /// Captured standard output followed by standard error (lossy UTF-8).
    pub output: String,
    /// Wall time spent on the run.
    pub elapsed: Duration,
}

impl InvocationResult {
    /// Builds a result for a process that exited with `code`.
    #[must_use]
    pub const fn exited(code: i32, output: String, elapsed: Duration) -> Self {
        Self {
            status: InvocationStatus::Exited(code),
            output,
            elapsed,
        }
    }

    /// Builds a result for a run that failed with `error`.
    #[must_use]
    pub const fn failed(error: InvocationError, output: String, elapsed: Duration) -> Self {
        Self {
            status: InvocationStatus::Failed(error),
            output,
            elapsed,
        }
    }

    /// Returns the verdict observed from the run.
    #[must_use]
    pub fn actual_verdict(&self) -> Verdict {
        match self.status {
            InvocationStatus::Exited(code) => Verdict::from_exit_code(code),
            InvocationStatus::Failed(_) => Verdict::Invalid,
        }
    }

    /// Returns the exit code when the process exited normally.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            InvocationStatus::Exited(code) => Some(code),
            InvocationStatus::Failed(_) => None,
        }
    }

    /// Returns the execution failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&InvocationError> {
        match &self.status {
            InvocationStatus::Exited(_) => None,
            InvocationStatus::Failed(error) => Some(error),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
