// crates/corpus-gate-config/src/suites.rs
// ============================================================================
// Module: Suite Table
// Description: Named corpus subtrees and their rule sets.
// Purpose: Provide the built-in suite table and keyed rule lookup.
// Dependencies: corpus-gate-core, serde
// ============================================================================

//! ## Overview
//! A suite is a directory under the corpus root. Each suite entry carries the
//! ignore and activation substring lists used to narrow its samples. The
//! built-in table lists the corpora the acquisition tooling fetches; all of
//! them start with empty rule lists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use corpus_gate_core::RuleSet;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suites known out of the box.
const BUILTIN_SUITE_NAMES: &[&str] = &["BFOSupport", "VeraPDF", "Isartor"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// One suite entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite directory name under the corpus root.
    pub name: String,
    /// Path substrings that exclude a sample.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Path substrings of which one must match (empty means all).
    #[serde(default)]
    pub activate: Vec<String>,
}

impl SuiteConfig {
    /// Creates a suite with empty rule lists.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ignore: Vec::new(),
            activate: Vec::new(),
        }
    }

    /// Returns the suite's rule set.
    #[must_use]
    pub fn rules(&self) -> RuleSet {
        RuleSet::new(self.ignore.clone(), self.activate.clone())
    }
}

/// Returns the built-in suite table.
#[must_use]
pub fn builtin_suites() -> Vec<SuiteConfig> {
    BUILTIN_SUITE_NAMES.iter().map(|name| SuiteConfig::new(*name)).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
