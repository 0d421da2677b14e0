// crates/corpus-gate-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Work Dispatcher
// Description: Parallel invoke-and-compare over the selected samples.
// Purpose: Bind the validator and comparator to the worker pool.
// Dependencies: crate::{core, interfaces, runtime::{comparator, pool}}
// ============================================================================

//! ## Overview
//! Each selected sample becomes one pool task that invokes the validator,
//! compares the verdicts, and records a `sample_completed` event. The
//! dispatcher returns after the pool's fan-in barrier.
//!
//! ## Invariants
//! - Exactly one outcome per selected sample, in selection order.
//! - A task that never completes becomes a mismatch for its own sample only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::HarnessEvent;
use crate::core::SampleOutcome;
use crate::core::SelectedSample;
use crate::interfaces::EventSink;
use crate::interfaces::Validator;
use crate::runtime::comparator::Comparator;
use crate::runtime::pool::WorkerPool;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Runs the validator over many samples on a bounded pool.
#[derive(Clone)]
pub struct WorkDispatcher {
    /// Worker pool bounding in-flight invocations.
    pool: WorkerPool,
    /// Validator backend.
    validator: Arc<dyn Validator>,
    /// Verdict comparator for the suite.
    comparator: Arc<Comparator>,
    /// Event sink for per-sample events.
    sink: Arc<dyn EventSink>,
}

impl WorkDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        pool: WorkerPool,
        validator: Arc<dyn Validator>,
        comparator: Comparator,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            pool,
            validator,
            comparator: Arc::new(comparator),
            sink,
        }
    }

    /// Invokes and compares every sample, waiting for all of them.
    pub async fn dispatch(&self, samples: Vec<SelectedSample>) -> Vec<SampleOutcome> {
        let validator = Arc::clone(&self.validator);
        let comparator = Arc::clone(&self.comparator);
        let sink = Arc::clone(&self.sink);
        let results = self
            .pool
            .run(samples.clone(), move |selected: SelectedSample| {
                let validator = Arc::clone(&validator);
                let comparator = Arc::clone(&comparator);
                let sink = Arc::clone(&sink);
                async move {
                    let result = validator.validate(&selected.sample).await;
                    let outcome = comparator.compare(selected, result);
                    sink.record(&HarnessEvent::sample_completed(&outcome));
                    outcome
                }
            })
            .await;

        samples
            .into_iter()
            .zip(results)
            .map(|(selected, result)| {
                result.unwrap_or_else(|_| {
                    let outcome = self.comparator.task_failed(selected);
                    self.sink.record(&HarnessEvent::sample_completed(&outcome));
                    outcome
                })
            })
            .collect()
    }
}
