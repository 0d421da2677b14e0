// crates/corpus-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Corpus Gate Interfaces
// Description: Backend-agnostic seams for validation and event logging.
// Purpose: Let the dispatcher run against subprocesses or in-process fakes.
// Dependencies: async-trait, crate::core
// ============================================================================

//! ## Overview
//! The dispatcher only sees these traits. [`Validator`] hides how a verdict
//! is obtained; [`EventSink`] hides where structured events are written.
//!
//! ## Invariants
//! - A validator never returns an error: every failure is folded into the
//!   returned [`InvocationResult`].
//! - Sinks never fail the run; write errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;

use crate::core::HarnessEvent;
use crate::core::InvocationResult;
use crate::core::Sample;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Produces an invocation result for one sample.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Runs the validator against `sample`.
    async fn validate(&self, sample: &Sample) -> InvocationResult;
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Receives structured harness events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &HarnessEvent);
}
