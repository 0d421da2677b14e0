// crates/corpus-gate-core/src/core/summary.rs
// ============================================================================
// Module: Run Summary
// Description: Per-sample outcomes and aggregate run counters.
// Purpose: Fold comparator outcomes into the pass rate and exit policy.
// Dependencies: serde, crate::core::{invocation, rules, sample}
// ============================================================================

//! ## Overview
//! [`RunSummary`] starts from the selection plan counters and is updated once
//! per [`SampleOutcome`] after the dispatcher's fan-in barrier.
//!
//! ## Invariants
//! - `passed + mismatches == total`.
//! - `total + explicitly_ignored <= possible_tests`.
//! - The run passes iff `passed == total` (an empty run passes vacuously).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

use crate::core::invocation::InvocationError;
use crate::core::rules::SelectionPlan;
use crate::core::sample::Sample;
use crate::core::sample::Verdict;

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Diagnostic block emitted for one mismatched sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Sample path as handed to the validator.
    pub path: String,
    /// Captured output split into lines.
    pub lines: Vec<String>,
}

impl Diagnostic {
    /// Builds a diagnostic from raw output, prefixed by an optional failure line.
    #[must_use]
    pub fn new(path: String, failure: Option<&InvocationError>, output: &str) -> Self {
        let mut lines = Vec::new();
        if let Some(failure) = failure {
            lines.push(format!("execution failed: {failure}"));
        }
        lines.extend(output.lines().map(str::to_string));
        Self {
            path,
            lines,
        }
    }
}

// ============================================================================
// SECTION: Sample Outcome
// ============================================================================

/// Comparator result for one executed sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome {
    /// The sample under test.
    pub sample: Sample,
    /// Verdict derived from the naming convention.
    pub expected: Verdict,
    /// Verdict observed from the validator.
    pub actual: Verdict,
    /// Exit code when the validator exited normally.
    pub exit_code: Option<i32>,
    /// Execution failure, when the run produced no exit code.
    pub failure: Option<InvocationError>,
    /// True when expected and actual verdicts disagree.
    pub mismatch: bool,
    /// Diagnostic block, present only on mismatch.
    pub diagnostic: Option<Diagnostic>,
    /// Wall time spent on the invocation.
    pub elapsed: Duration,
}

// ============================================================================
// SECTION: Run Summary
// ============================================================================

/// Aggregate counters for one harness run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Samples discovered under the suite directory.
    pub discovered: usize,
    /// Samples admitted by the expected-verdict policy.
    pub possible_tests: usize,
    /// Samples executed and compared.
    pub total: usize,
    /// Executed samples whose verdicts matched.
    pub passed: usize,
    /// Samples excluded by a suite ignore entry.
    pub explicitly_ignored: usize,
    /// Samples excluded by a suite activation list.
    pub not_activated: usize,
    /// Executed samples whose invocation failed to produce an exit code.
    pub execution_failures: usize,
}

impl RunSummary {
    /// Starts a summary from the selection plan counters.
    #[must_use]
    pub fn from_plan(plan: &SelectionPlan) -> Self {
        Self {
            discovered: plan.discovered(),
            possible_tests: plan.possible_tests(),
            total: 0,
            passed: 0,
            explicitly_ignored: plan.explicitly_ignored(),
            not_activated: plan.not_activated(),
            execution_failures: 0,
        }
    }

    /// Folds one outcome into the counters.
    pub fn record(&mut self, outcome: &SampleOutcome) {
        self.total += 1;
        if !outcome.mismatch {
            self.passed += 1;
        }
        if outcome.failure.is_some() {
            self.execution_failures += 1;
        }
    }

    /// Number of executed samples that mismatched.
    #[must_use]
    pub const fn mismatches(&self) -> usize {
        self.total - self.passed
    }

    /// Returns true when every executed sample passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.passed == self.total
    }

    /// Pass rate against the possible test count, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Sample counts stay far below 2^52.")]
    pub fn percentage(&self) -> f64 {
        if self.possible_tests == 0 {
            return 0.0;
        }
        (self.passed as f64) * 100.0 / (self.possible_tests as f64)
    }

    /// Renders the canonical one-line summary.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} ({:.2}% of {} test files, {} ignored explicitly)",
            self.passed,
            self.total,
            self.percentage(),
            self.possible_tests,
            self.explicitly_ignored
        )
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
