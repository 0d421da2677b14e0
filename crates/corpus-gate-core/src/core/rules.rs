// crates/corpus-gate-core/src/core/rules.rs
// ============================================================================
// Module: Suite Rule Sets
// Description: Ignore/activate substring rules and sample selection planning.
// Purpose: Narrow a discovered corpus to the samples that will be executed.
// Dependencies: serde, crate::core::sample
// ============================================================================

//! ## Overview
//! Each suite owns one [`RuleSet`]. Selection runs in two passes: the
//! expected-verdict policy decides which samples are candidates at all, and
//! the rule set then excludes ignored samples and samples missing from a
//! non-empty activation list.
//!
//! ## Invariants
//! - Ignore is evaluated before activate and always wins.
//! - An empty activation list includes every non-ignored sample.
//! - `selected + ignored + not_activated == possible_tests`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::sample::Sample;
use crate::core::sample::Verdict;
use crate::core::sample::VerdictClassifier;

// ============================================================================
// SECTION: Rule Set
// ============================================================================

/// Per-suite ignore and activation substring lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Path substrings that unconditionally exclude a sample.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Path substrings of which at least one must match (empty means all).
    #[serde(default)]
    pub activate: Vec<String>,
}

/// Outcome of evaluating a rule set against one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// The sample is executed.
    Included,
    /// The sample matched an ignore entry.
    Ignored,
    /// The sample matched no entry of a non-empty activation list.
    NotActivated,
}

impl RuleSet {
    /// Creates a rule set from ignore and activation lists.
    #[must_use]
    pub const fn new(ignore: Vec<String>, activate: Vec<String>) -> Self {
        Self {
            ignore,
            activate,
        }
    }

    /// Returns true when `path` matches any ignore entry.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore.iter().any(|needle| path.contains(needle.as_str()))
    }

    /// Evaluates the rule set against `path`.
    #[must_use]
    pub fn evaluate(&self, path: &str) -> Inclusion {
        if self.is_ignored(path) {
            return Inclusion::Ignored;
        }
        if self.activate.is_empty() {
            return Inclusion::Included;
        }
        if self.activate.iter().any(|needle| path.contains(needle.as_str())) {
            Inclusion::Included
        } else {
            Inclusion::NotActivated
        }
    }

    /// Returns true when `path` is selected for execution.
    #[must_use]
    pub fn include(&self, path: &str) -> bool {
        self.evaluate(path) == Inclusion::Included
    }
}

// ============================================================================
// SECTION: Verdict Policy
// ============================================================================

/// Which expected verdicts are eligible for automated execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictPolicy {
    /// Only expected-valid samples are executed; fail-marked samples are out of scope.
    #[default]
    ValidOnly,
    /// Every discovered sample is executed regardless of its expected verdict.
    AllSamples,
}

impl VerdictPolicy {
    /// Returns a stable label for the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidOnly => "valid_only",
            Self::AllSamples => "all_samples",
        }
    }

    /// Returns true when samples with `expected` verdict are candidates.
    #[must_use]
    pub const fn admits(self, expected: Verdict) -> bool {
        match self {
            Self::ValidOnly => matches!(expected, Verdict::Valid),
            Self::AllSamples => true,
        }
    }
}

// ============================================================================
// SECTION: Selection Plan
// ============================================================================

/// Reason a discovered sample was not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Excluded by the expected-verdict policy.
    ExpectedInvalid,
    /// Matched a suite ignore entry.
    Ignored,
    /// Missed a non-empty suite activation list.
    NotActivated,
}

impl SkipReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExpectedInvalid => "expected_invalid",
            Self::Ignored => "ignored",
            Self::NotActivated => "not_activated",
        }
    }
}

/// Sample chosen for execution together with its expected verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSample {
    /// The sample under test.
    pub sample: Sample,
    /// Verdict derived from the naming convention.
    pub expected: Verdict,
}

/// Sample left out of execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSample {
    /// The skipped sample.
    pub sample: Sample,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Partition of a discovered corpus into executed and skipped samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPlan {
    /// Samples to execute, in discovery order.
    pub selected: Vec<SelectedSample>,
    /// Samples not executed, in discovery order.
    pub skipped: Vec<SkippedSample>,
}

impl SelectionPlan {
    /// Builds a plan from discovered samples.
    #[must_use]
    pub fn build(
        samples: impl IntoIterator<Item = Sample>,
        classifier: &VerdictClassifier,
        policy: VerdictPolicy,
        rules: &RuleSet,
    ) -> Self {
        let mut plan = Self::default();
        for sample in samples {
            let expected = classifier.classify(&sample);
            if !policy.admits(expected) {
                plan.skip(sample, SkipReason::ExpectedInvalid);
                continue;
            }
            match rules.evaluate(sample.relative()) {
                Inclusion::Included => plan.selected.push(SelectedSample {
                    sample,
                    expected,
                }),
                Inclusion::Ignored => plan.skip(sample, SkipReason::Ignored),
                Inclusion::NotActivated => plan.skip(sample, SkipReason::NotActivated),
            }
        }
        plan
    }

    /// Records a skipped sample.
    fn skip(&mut self, sample: Sample, reason: SkipReason) {
        self.skipped.push(SkippedSample {
            sample,
            reason,
        });
    }

    /// Counts skipped samples with `reason`.
    fn count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|skipped| skipped.reason == reason).count()
    }

    /// Total number of discovered samples.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.selected.len() + self.skipped.len()
    }

    /// Samples admitted by the expected-verdict policy.
    #[must_use]
    pub fn possible_tests(&self) -> usize {
        self.discovered() - self.count(SkipReason::ExpectedInvalid)
    }

    /// Samples excluded by a suite ignore entry.
    #[must_use]
    pub fn explicitly_ignored(&self) -> usize {
        self.count(SkipReason::Ignored)
    }

    /// Samples excluded by a suite activation list.
    #[must_use]
    pub fn not_activated(&self) -> usize {
        self.count(SkipReason::NotActivated)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
