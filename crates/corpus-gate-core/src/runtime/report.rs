// crates/corpus-gate-core/src/runtime/report.rs
// ============================================================================
// Module: Reporter
// Description: Human and JSON rendering of a finished run.
// Purpose: Print mismatch diagnostics and the summary, and pick the exit code.
// Dependencies: serde, serde_json, crate::core
// ============================================================================

//! ## Overview
//! The reporter runs once, single-threaded, after the fan-in barrier. Text
//! output is one block per mismatch (`☓ <path>` then the output indented four
//! spaces) followed by the summary line. JSON output is one object holding
//! the counters, the percentage, and the diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Diagnostic;
use crate::core::RunSummary;
use crate::core::SampleOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker printed before a mismatched sample path.
pub const MISMATCH_MARKER: &str = "\u{2613}";
/// Marker printed before a passing sample path in verbose mode.
pub const PASS_MARKER: &str = "\u{2713}";
/// Indentation applied to diagnostic output lines.
const DIAGNOSTIC_INDENT: &str = "    ";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output format for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Diagnostics and the summary line as plain text.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// Results of one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Final counters.
    pub summary: RunSummary,
    /// Per-sample outcomes in selection order.
    pub outcomes: Vec<SampleOutcome>,
}

impl RunReport {
    /// Returns the diagnostics of mismatched samples in selection order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.outcomes.iter().filter_map(|outcome| outcome.diagnostic.as_ref())
    }

    /// Returns true when every executed sample passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.summary.is_pass()
    }

    /// Process exit code for the run: `0` on full pass, `1` otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_pass() { 0 } else { 1 }
    }
}

/// JSON report body.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// Final counters.
    summary: &'a RunSummary,
    /// Pass rate rounded to two decimals.
    percentage: String,
    /// Whether the run passed.
    passed: bool,
    /// Mismatch diagnostics.
    mismatches: Vec<&'a Diagnostic>,
}

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Renders a [`RunReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reporter {
    /// Print a line for every passing sample as well.
    verbose: bool,
    /// Output format.
    format: ReportFormat,
}

impl Reporter {
    /// Creates a reporter.
    #[must_use]
    pub const fn new(format: ReportFormat, verbose: bool) -> Self {
        Self {
            verbose,
            format,
        }
    }

    /// Renders the report as output lines.
    #[must_use]
    pub fn render(&self, report: &RunReport) -> Vec<String> {
        match self.format {
            ReportFormat::Text => self.render_text(report),
            ReportFormat::Json => vec![render_json(report)],
        }
    }

    /// Text rendering: diagnostics, optional pass lines, then the summary.
    fn render_text(&self, report: &RunReport) -> Vec<String> {
        let mut lines = Vec::new();
        for outcome in &report.outcomes {
            if let Some(diagnostic) = &outcome.diagnostic {
                lines.push(format!("{MISMATCH_MARKER} {}", diagnostic.path));
                lines.extend(
                    diagnostic.lines.iter().map(|line| format!("{DIAGNOSTIC_INDENT}{line}")),
                );
            } else if self.verbose {
                lines.push(format!("{PASS_MARKER} {}", outcome.sample.display_path()));
            }
        }
        lines.push(report.summary.summary_line());
        lines
    }
}

/// JSON rendering of the summary and diagnostics.
fn render_json(report: &RunReport) -> String {
    let body = JsonReport {
        summary: &report.summary,
        percentage: format!("{:.2}", report.summary.percentage()),
        passed: report.is_pass(),
        mismatches: report.diagnostics().collect(),
    };
    serde_json::to_string(&body).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
