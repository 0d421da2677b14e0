// crates/corpus-gate-core/src/core/sample.rs
// ============================================================================
// Module: Samples and Verdicts
// Description: Sample identity and the naming-convention verdict classifier.
// Purpose: Derive the expected verdict of a sample purely from its path.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Sample`] is one candidate document on disk. Its corpus-relative path
//! is the single source of truth for both its expected verdict and for suite
//! rule matching.
//!
//! ## Invariants
//! - A path containing the fail marker (case-sensitive) is expected
//!   [`Verdict::Invalid`]; every other path is expected [`Verdict::Valid`].
//! - Classification is a substring test, not parsed metadata. A marker that
//!   appears inside an unrelated word still classifies the sample as invalid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path token marking a sample that the validator must reject.
pub const DEFAULT_FAIL_MARKER: &str = "fail";

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Binary validator verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The document is accepted.
    Valid,
    /// The document is rejected.
    Invalid,
}

impl Verdict {
    /// Returns a stable label for the verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }

    /// Maps a process exit code to a verdict (`0` is valid).
    #[must_use]
    pub const fn from_exit_code(code: i32) -> Self {
        if code == 0 { Self::Valid } else { Self::Invalid }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Sample
// ============================================================================

/// One candidate document discovered under a corpus root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sample {
    /// Path handed to the validator.
    path: PathBuf,
    /// Corpus-relative path used for classification and rule matching.
    relative: String,
}

impl Sample {
    /// Creates a sample from its on-disk path and corpus-relative path string.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
        }
    }

    /// Creates a sample whose match string is the lossy rendering of `path`.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relative = path.to_string_lossy().into_owned();
        Self {
            path,
            relative,
        }
    }

    /// Returns the on-disk path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the corpus-relative path string.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Returns the on-disk path rendered for diagnostics.
    #[must_use]
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Returns the expected verdict for `path` using the default fail marker.
#[must_use]
pub fn expected_verdict(path: &str) -> Verdict {
    classify(path, DEFAULT_FAIL_MARKER)
}

/// Classifies `path` against an arbitrary marker token.
fn classify(path: &str, marker: &str) -> Verdict {
    if path.contains(marker) { Verdict::Invalid } else { Verdict::Valid }
}

/// Naming-convention classifier with a configurable marker token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictClassifier {
    /// Substring that marks an expected-invalid sample.
    marker: String,
}

impl VerdictClassifier {
    /// Creates a classifier for `marker`.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Returns the expected verdict for `sample`.
    #[must_use]
    pub fn classify(&self, sample: &Sample) -> Verdict {
        classify(sample.relative(), &self.marker)
    }
}

impl Default for VerdictClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FAIL_MARKER)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_token_marks_sample_invalid() {
        let failing = "VeraPDF/6.1/veraPDF test suite 6-1-2-t01-fail-a.pdf";
        let passing = "VeraPDF/6.1/veraPDF test suite 6-1-2-t01-pass-a.pdf";
        assert_eq!(expected_verdict(failing), Verdict::Invalid);
        assert_eq!(expected_verdict(passing), Verdict::Valid);
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert_eq!(expected_verdict("Demo/FAIL.pdf"), Verdict::Valid);
        assert_eq!(expected_verdict("Demo/Fail.pdf"), Verdict::Valid);
    }

    #[test]
    fn marker_inside_unrelated_word_still_classifies_invalid() {
        assert_eq!(expected_verdict("Demo/failover-notes.pdf"), Verdict::Invalid);
    }

    #[test]
    fn classifier_uses_relative_path() {
        let sample = Sample::new("/tmp/failures/Demo/a.pdf", "Demo/a.pdf");
        assert_eq!(VerdictClassifier::default().classify(&sample), Verdict::Valid);
    }

    #[test]
    fn exit_code_zero_is_valid() {
        assert_eq!(Verdict::from_exit_code(0), Verdict::Valid);
        assert_eq!(Verdict::from_exit_code(1), Verdict::Invalid);
        assert_eq!(Verdict::from_exit_code(-1), Verdict::Invalid);
    }
}
