// crates/corpus-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Corpus Gate Runtime
// Description: Discovery, process execution, dispatch, and reporting.
// Purpose: Implement the side-effecting half of a harness run.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components touch the filesystem, spawn processes, or write
//! output. The pure data model they operate on lives in [`crate::core`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod command;
pub mod comparator;
pub mod dispatcher;
pub mod events;
pub mod harness;
pub mod invoker;
pub mod pool;
pub mod report;
pub mod scanner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::CommandSpec;
pub use command::DEFAULT_MEMCHECK_PROGRAM;
pub use command::DEFAULT_SUBCOMMAND;
pub use command::MEMCHECK_FLAGS;
pub use command::MemcheckWrapper;
pub use command::WrapperOptions;
pub use command::validator_command;
pub use command::wrap_command;
pub use comparator::Comparator;
pub use dispatcher::WorkDispatcher;
pub use events::FileEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use harness::Harness;
pub use harness::HarnessSettings;
pub use invoker::DEFAULT_TIMEOUT;
pub use invoker::InvokerConfig;
pub use invoker::ProcessValidator;
pub use invoker::run_with_timeout;
pub use pool::DEFAULT_WORKERS;
pub use pool::PoolError;
pub use pool::WorkerPool;
pub use report::ReportFormat;
pub use report::Reporter;
pub use report::RunReport;
pub use scanner::CorpusScanner;
pub use scanner::DEFAULT_EXTENSION;
pub use scanner::DiscoveryError;
