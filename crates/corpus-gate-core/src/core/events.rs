// crates/corpus-gate-core/src/core/events.rs
// ============================================================================
// Module: Harness Events
// Description: Structured event payloads for run logging.
// Purpose: Describe run progress as JSON-line records without hard deps.
// Dependencies: serde, crate::core::{rules, sample, summary}
// ============================================================================

//! ## Overview
//! Every event serializes to one flat JSON object with an `event` tag and a
//! millisecond timestamp. Sinks decide where the line goes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::rules::SkipReason;
use crate::core::rules::SkippedSample;
use crate::core::rules::VerdictPolicy;
use crate::core::sample::Verdict;
use crate::core::summary::RunSummary;
use crate::core::summary::SampleOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event payload with a consistent timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event body, tagged by `event`.
    #[serde(flatten)]
    pub kind: HarnessEventKind,
}

/// Event bodies emitted during a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HarnessEventKind {
    /// Discovery finished and dispatch is about to begin.
    RunStarted {
        /// Suite name.
        suite: String,
        /// Corpus root path.
        corpus_root: String,
        /// Expected-verdict policy in force.
        policy: VerdictPolicy,
        /// Worker pool size.
        workers: usize,
        /// Number of samples about to be executed.
        selected: usize,
    },
    /// A discovered sample was not executed.
    SampleSkipped {
        /// Corpus-relative sample path.
        path: String,
        /// Why the sample was skipped.
        reason: SkipReason,
    },
    /// A sample was executed and compared.
    SampleCompleted {
        /// Corpus-relative sample path.
        path: String,
        /// Expected verdict.
        expected: Verdict,
        /// Actual verdict.
        actual: Verdict,
        /// Whether the verdicts disagree.
        mismatch: bool,
        /// Exit code, when the validator exited normally.
        exit_code: Option<i32>,
        /// Failure description, when execution failed.
        failure: Option<String>,
        /// Invocation wall time in milliseconds.
        elapsed_ms: u128,
    },
    /// All samples completed.
    RunFinished {
        /// Final counters.
        summary: RunSummary,
    },
}

impl HarnessEvent {
    /// Wraps `kind` with the current timestamp.
    #[must_use]
    pub fn new(kind: HarnessEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            kind,
        }
    }

    /// Builds a `sample_skipped` event.
    #[must_use]
    pub fn sample_skipped(skipped: &SkippedSample) -> Self {
        Self::new(HarnessEventKind::SampleSkipped {
            path: skipped.sample.relative().to_string(),
            reason: skipped.reason,
        })
    }

    /// Builds a `sample_completed` event.
    #[must_use]
    pub fn sample_completed(outcome: &SampleOutcome) -> Self {
        Self::new(HarnessEventKind::SampleCompleted {
            path: outcome.sample.relative().to_string(),
            expected: outcome.expected,
            actual: outcome.actual,
            mismatch: outcome.mismatch,
            exit_code: outcome.exit_code,
            failure: outcome.failure.as_ref().map(ToString::to_string),
            elapsed_ms: outcome.elapsed.as_millis(),
        })
    }

    /// Builds a `run_finished` event.
    #[must_use]
    pub fn run_finished(summary: RunSummary) -> Self {
        Self::new(HarnessEventKind::RunFinished {
            summary,
        })
    }

    /// Returns the event tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.kind {
            HarnessEventKind::RunStarted {
                ..
            } => "run_started",
            HarnessEventKind::SampleSkipped {
                ..
            } => "sample_skipped",
            HarnessEventKind::SampleCompleted {
                ..
            } => "sample_completed",
            HarnessEventKind::RunFinished {
                ..
            } => "run_finished",
        }
    }
}
