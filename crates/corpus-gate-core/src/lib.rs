// crates/corpus-gate-core/src/lib.rs
// ============================================================================
// Module: Corpus Gate Core Library
// Description: Public API surface for the Corpus Gate orchestration engine.
// Purpose: Expose the sample model, rule evaluation, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Corpus Gate core discovers sample documents under a corpus root, derives
//! each sample's expected verdict from its path, narrows the sample set with
//! per-suite rules, runs an external validator against every selected sample
//! on a bounded worker pool, and folds the results into a deterministic run
//! summary whose pass/fail state drives the process exit code.
//!
//! The validator is an opaque executable. Everything it does is observed
//! through its exit status and captured output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::EventSink;
pub use interfaces::Validator;
pub use runtime::CommandSpec;
pub use runtime::Comparator;
pub use runtime::CorpusScanner;
pub use runtime::DiscoveryError;
pub use runtime::FileEventSink;
pub use runtime::Harness;
pub use runtime::HarnessSettings;
pub use runtime::InvokerConfig;
pub use runtime::MemcheckWrapper;
pub use runtime::NoopEventSink;
pub use runtime::PoolError;
pub use runtime::ProcessValidator;
pub use runtime::ReportFormat;
pub use runtime::Reporter;
pub use runtime::RunReport;
pub use runtime::StderrEventSink;
pub use runtime::WorkDispatcher;
pub use runtime::WorkerPool;
pub use runtime::WrapperOptions;
