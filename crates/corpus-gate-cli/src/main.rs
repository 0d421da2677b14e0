// crates/corpus-gate-cli/src/main.rs
// ============================================================================
// Module: Corpus Gate CLI Entry Point
// Description: Command-line front end for corpus conformance runs.
// Purpose: Wire configuration, the validator, and the harness to an exit code.
// Dependencies: clap, corpus-gate-config, corpus-gate-core, thiserror, tokio.
// ============================================================================

//! ## Overview
//! `corpus-gate <VALIDATOR> <CORPUS_ROOT> <SUITE>` runs the validator against
//! every selected sample of one suite and exits `0` only when every executed
//! sample matched its expected verdict. Argument and corpus errors print the
//! usage line to stderr and exit non-zero.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use corpus_gate_cli::t;
use corpus_gate_config::ConfigError;
use corpus_gate_config::EventSinkKind;
use corpus_gate_config::HarnessConfig;
use corpus_gate_config::LoggingConfig;
use corpus_gate_core::EventSink;
use corpus_gate_core::FileEventSink;
use corpus_gate_core::Harness;
use corpus_gate_core::NoopEventSink;
use corpus_gate_core::ProcessValidator;
use corpus_gate_core::ReportFormat;
use corpus_gate_core::Reporter;
use corpus_gate_core::StderrEventSink;
use corpus_gate_core::VerdictPolicy;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "corpus-gate",
    about = "Run a document validator against a sample corpus and check its verdicts.",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Validator executable, invoked as `<VALIDATOR> info <sample>`.
    #[arg(value_name = "VALIDATOR", required_unless_present = "show_version")]
    validator: Option<PathBuf>,
    /// Directory holding one subdirectory per suite.
    #[arg(value_name = "CORPUS_ROOT", required_unless_present = "show_version")]
    corpus_root: Option<PathBuf>,
    /// Suite directory name under the corpus root.
    #[arg(value_name = "SUITE", required_unless_present = "show_version")]
    suite: Option<String>,
    /// Run options.
    #[command(flatten)]
    options: RunOptions,
}

/// Options that override configuration for one run.
#[derive(Args, Debug, Default)]
struct RunOptions {
    /// Config file path (defaults to `CORPUS_GATE_CONFIG` or `corpus-gate.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Per-invocation timeout in milliseconds.
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Number of validator processes run in parallel.
    #[arg(long, value_name = "N")]
    workers: Option<usize>,
    /// Run every validator invocation under the memory checker.
    #[arg(long, action = ArgAction::SetTrue)]
    memcheck: bool,
    /// Execute expected-invalid samples as well.
    #[arg(long = "all-samples", action = ArgAction::SetTrue)]
    all_samples: bool,
    /// Print a line for every passing sample.
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,
    /// Report format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Append structured events to this file as JSON lines.
    #[arg(long = "event-log", value_name = "PATH")]
    event_log: Option<PathBuf>,
    /// Print the selection plan without invoking the validator.
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,
}

/// Report format selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum FormatArg {
    /// Diagnostics and the summary line.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }

    /// Constructs a [`CliError`] followed by the usage line.
    fn with_usage(message: String) -> Self {
        let usage = Cli::command().render_usage();
        Self::new(format!("{message}\n\n{usage}"))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and executes one run.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(validator), Some(corpus_root), Some(suite)) =
        (cli.validator, cli.corpus_root, cli.suite)
    else {
        return Err(CliError::with_usage(t!("run.args_missing")));
    };
    if !corpus_root.exists() {
        return Err(CliError::with_usage(t!(
            "run.corpus_missing",
            path = corpus_root.display()
        )));
    }
    if !corpus_root.is_dir() {
        return Err(CliError::with_usage(t!(
            "run.corpus_not_dir",
            path = corpus_root.display()
        )));
    }

    let mut config = HarnessConfig::load(cli.options.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    apply_overrides(&mut config, &cli.options)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;

    let sink = build_sink(&config.logging, cli.options.event_log.as_deref())?;
    let validator = Arc::new(ProcessValidator::new(config.invoker_config(&validator)));
    let harness = Harness::new(config.harness_settings(&corpus_root, &suite), validator, sink);

    if cli.options.dry_run {
        return command_plan(&harness);
    }
    command_run(&harness, &cli.options).await
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the run and prints the report.
async fn command_run(harness: &Harness, options: &RunOptions) -> CliResult<ExitCode> {
    let report = harness
        .run()
        .await
        .map_err(|err| CliError::with_usage(t!("run.discovery_failed", error = err)))?;
    let reporter = Reporter::new(options.format.into(), options.verbose);
    for line in reporter.render(&report) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::from(report.exit_code()))
}

/// Prints the selection plan without invoking the validator.
fn command_plan(harness: &Harness) -> CliResult<ExitCode> {
    let plan = harness
        .plan()
        .map_err(|err| CliError::with_usage(t!("run.discovery_failed", error = err)))?;
    let mut lines = Vec::with_capacity(plan.discovered() + 1);
    for selected in &plan.selected {
        lines.push(t!("plan.selected", path = selected.sample.relative()));
    }
    for skipped in &plan.skipped {
        lines.push(t!(
            "plan.skipped",
            path = skipped.sample.relative(),
            reason = skipped.reason.as_str()
        ));
    }
    lines.push(t!(
        "plan.summary",
        selected = plan.selected.len(),
        possible = plan.possible_tests(),
        discovered = plan.discovered(),
        ignored = plan.explicitly_ignored(),
        not_activated = plan.not_activated()
    ));
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Configuration Helpers
// ============================================================================

/// Applies command-line overrides and revalidates the configuration.
fn apply_overrides(config: &mut HarnessConfig, options: &RunOptions) -> Result<(), ConfigError> {
    if let Some(timeout_ms) = options.timeout_ms {
        config.run.timeout_ms = timeout_ms;
    }
    if let Some(workers) = options.workers {
        config.run.workers = workers;
    }
    if options.memcheck {
        config.memcheck.enabled = true;
    }
    if options.all_samples {
        config.run.verdict_policy = VerdictPolicy::AllSamples;
    }
    config.validate()
}

/// Selects the event sink, preferring `--event-log` over configuration.
fn build_sink(
    logging: &LoggingConfig,
    event_log: Option<&Path>,
) -> CliResult<Arc<dyn EventSink>> {
    if let Some(path) = event_log {
        return open_file_sink(path);
    }
    match logging.sink {
        EventSinkKind::None => Ok(Arc::new(NoopEventSink)),
        EventSinkKind::Stderr => Ok(Arc::new(StderrEventSink)),
        EventSinkKind::File => open_file_sink(Path::new(&logging.path)),
    }
}

/// Opens an append-only event log.
fn open_file_sink(path: &Path) -> CliResult<Arc<dyn EventSink>> {
    let sink = FileEventSink::new(path).map_err(|err| {
        CliError::new(t!("run.event_log_failed", path = path.display(), error = err))
    })?;
    Ok(Arc::new(sink))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
