// crates/corpus-gate-core/src/runtime/comparator.rs
// ============================================================================
// Module: Comparator
// Description: Expected-versus-actual verdict comparison.
// Purpose: Turn an invocation result into a sample outcome and diagnostic.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A mismatch is any disagreement between the expected and actual verdicts.
//! The one exception: an execution failure on a sample that matches the
//! suite's ignore list is never a mismatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::core::Diagnostic;
use crate::core::InvocationError;
use crate::core::InvocationResult;
use crate::core::RuleSet;
use crate::core::SampleOutcome;
use crate::core::SelectedSample;
use crate::core::Verdict;

// ============================================================================
// SECTION: Comparator
// ============================================================================

/// Compares verdicts under one suite's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparator {
    /// Suite rules consulted for the ignored-failure exception.
    rules: RuleSet,
}

impl Comparator {
    /// Creates a comparator for `rules`.
    #[must_use]
    pub const fn new(rules: RuleSet) -> Self {
        Self {
            rules,
        }
    }

    /// Compares one invocation result against the sample's expected verdict.
    #[must_use]
    pub fn compare(&self, selected: SelectedSample, result: InvocationResult) -> SampleOutcome {
        let actual = result.actual_verdict();
        let failure = result.failure().cloned();
        let ignored_failure =
            failure.is_some() && self.rules.is_ignored(selected.sample.relative());
        let mismatch = !ignored_failure && is_mismatch(selected.expected, actual);
        let diagnostic = mismatch.then(|| {
            Diagnostic::new(selected.sample.display_path(), failure.as_ref(), &result.output)
        });
        SampleOutcome {
            sample: selected.sample,
            expected: selected.expected,
            actual,
            exit_code: result.exit_code(),
            failure,
            mismatch,
            diagnostic,
            elapsed: result.elapsed,
        }
    }

    /// Builds the outcome for a sample whose worker task never completed.
    #[must_use]
    pub fn task_failed(&self, selected: SelectedSample) -> SampleOutcome {
        let result =
            InvocationResult::failed(InvocationError::TaskAborted, String::new(), Duration::ZERO);
        self.compare(selected, result)
    }
}

/// Returns true when the verdicts disagree.
fn is_mismatch(expected: Verdict, actual: Verdict) -> bool {
    expected != actual
}

// ============================================================================
// SECTION: Tests
// ============================================================================
