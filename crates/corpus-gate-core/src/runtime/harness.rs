// crates/corpus-gate-core/src/runtime/harness.rs
// ============================================================================
// Module: Harness
// Description: End-to-end orchestration of one suite run.
// Purpose: Scan, classify, filter, dispatch, and summarize.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`Harness::plan`] performs discovery and rule filtering without invoking
//! anything. [`Harness::run`] executes the plan on the worker pool and folds
//! the outcomes into a [`RunReport`].
//!
//! ## Invariants
//! - Discovery errors abort the run before any invocation.
//! - Two runs over unchanged inputs produce identical counters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::DEFAULT_FAIL_MARKER;
use crate::core::HarnessEvent;
use crate::core::HarnessEventKind;
use crate::core::RuleSet;
use crate::core::RunSummary;
use crate::core::SelectionPlan;
use crate::core::VerdictClassifier;
use crate::core::VerdictPolicy;
use crate::interfaces::EventSink;
use crate::interfaces::Validator;
use crate::runtime::comparator::Comparator;
use crate::runtime::dispatcher::WorkDispatcher;
use crate::runtime::pool::DEFAULT_WORKERS;
use crate::runtime::pool::WorkerPool;
use crate::runtime::report::RunReport;
use crate::runtime::scanner::CorpusScanner;
use crate::runtime::scanner::DEFAULT_EXTENSION;
use crate::runtime::scanner::DiscoveryError;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Inputs that define one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Corpus root directory.
    pub corpus_root: PathBuf,
    /// Suite directory name under the corpus root.
    pub suite: String,
    /// Sample file extension.
    pub extension: String,
    /// Path substring marking expected-invalid samples.
    pub fail_marker: String,
    /// Expected-verdict policy.
    pub policy: VerdictPolicy,
    /// Worker pool size.
    pub workers: usize,
    /// Suite rule set.
    pub rules: RuleSet,
}

impl HarnessSettings {
    /// Creates settings with default extension, marker, policy, and pool size.
    #[must_use]
    pub fn new(corpus_root: impl Into<PathBuf>, suite: impl Into<String>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
            suite: suite.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            fail_marker: DEFAULT_FAIL_MARKER.to_string(),
            policy: VerdictPolicy::default(),
            workers: DEFAULT_WORKERS,
            rules: RuleSet::default(),
        }
    }

    /// Returns a scanner for these settings.
    #[must_use]
    pub fn scanner(&self) -> CorpusScanner {
        CorpusScanner::new(&self.corpus_root, &self.suite, &self.extension)
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Orchestrates one suite run.
#[derive(Clone)]
pub struct Harness {
    /// Run settings.
    settings: HarnessSettings,
    /// Validator backend.
    validator: Arc<dyn Validator>,
    /// Structured event sink.
    sink: Arc<dyn EventSink>,
}

impl Harness {
    /// Creates a harness.
    #[must_use]
    pub fn new(
        settings: HarnessSettings,
        validator: Arc<dyn Validator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            settings,
            validator,
            sink,
        }
    }

    /// Discovers samples and partitions them into selected and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the suite cannot be walked.
    pub fn plan(&self) -> Result<SelectionPlan, DiscoveryError> {
        let samples = self.settings.scanner().collect()?;
        let classifier = VerdictClassifier::new(self.settings.fail_marker.clone());
        Ok(SelectionPlan::build(samples, &classifier, self.settings.policy, &self.settings.rules))
    }

    /// Runs the suite to completion.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the suite cannot be walked. Nothing
    /// is invoked in that case.
    pub async fn run(&self) -> Result<RunReport, DiscoveryError> {
        let plan = self.plan()?;
        let mut summary = RunSummary::from_plan(&plan);
        let pool = WorkerPool::new(self.settings.workers);
        self.sink.record(&HarnessEvent::new(HarnessEventKind::RunStarted {
            suite: self.settings.suite.clone(),
            corpus_root: self.settings.corpus_root.display().to_string(),
            policy: self.settings.policy,
            workers: pool.workers(),
            selected: plan.selected.len(),
        }));
        for skipped in &plan.skipped {
            self.sink.record(&HarnessEvent::sample_skipped(skipped));
        }

        let dispatcher = WorkDispatcher::new(
            pool,
            Arc::clone(&self.validator),
            Comparator::new(self.settings.rules.clone()),
            Arc::clone(&self.sink),
        );
        let outcomes = dispatcher.dispatch(plan.selected).await;
        for outcome in &outcomes {
            summary.record(outcome);
        }
        self.sink.record(&HarnessEvent::run_finished(summary));
        Ok(RunReport {
            summary,
            outcomes,
        })
    }
}
