// crates/corpus-gate-core/src/core/mod.rs
// ============================================================================
// Module: Corpus Gate Core Types
// Description: Data model shared by the scanner, dispatcher, and reporter.
// Purpose: Group samples, verdicts, rules, invocation results, and summaries.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data. They carry no I/O and are safe to share across
//! worker tasks by value.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod events;
pub mod invocation;
pub mod rules;
pub mod sample;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use events::HarnessEvent;
pub use events::HarnessEventKind;
pub use invocation::InvocationError;
pub use invocation::InvocationResult;
pub use invocation::InvocationStatus;
pub use rules::Inclusion;
pub use rules::RuleSet;
pub use rules::SelectedSample;
pub use rules::SelectionPlan;
pub use rules::SkipReason;
pub use rules::SkippedSample;
pub use rules::VerdictPolicy;
pub use sample::DEFAULT_FAIL_MARKER;
pub use sample::Sample;
pub use sample::Verdict;
pub use sample::VerdictClassifier;
pub use sample::expected_verdict;
pub use summary::Diagnostic;
pub use summary::RunSummary;
pub use summary::SampleOutcome;
