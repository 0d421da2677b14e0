// crates/corpus-gate-config/src/lib.rs
// ============================================================================
// Module: Corpus Gate Config Library
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for corpus-gate.toml semantics.
// Dependencies: corpus-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `corpus-gate-config` defines the configuration model for Corpus Gate:
//! run defaults, the memory checker wrapper, event logging, and the per-suite
//! rule tables. Loading is strict: oversized files, malformed TOML, and
//! out-of-range values are rejected before a run starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod suites;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use suites::SuiteConfig;
pub use suites::builtin_suites;
