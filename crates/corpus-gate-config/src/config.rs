// crates/corpus-gate-config/src/config.rs
// ============================================================================
// Module: Corpus Gate Configuration
// Description: Configuration loading and validation for Corpus Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: corpus-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an absent file yields the built-in defaults.
//! An explicitly requested file that cannot be read or validated fails the
//! run before any sample is touched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use corpus_gate_core::DEFAULT_FAIL_MARKER;
use corpus_gate_core::HarnessSettings;
use corpus_gate_core::InvokerConfig;
use corpus_gate_core::MemcheckWrapper;
use corpus_gate_core::RuleSet;
use corpus_gate_core::VerdictPolicy;
use corpus_gate_core::WrapperOptions;
use corpus_gate_core::runtime::DEFAULT_EXTENSION;
use corpus_gate_core::runtime::DEFAULT_MEMCHECK_PROGRAM;
use corpus_gate_core::runtime::DEFAULT_SUBCOMMAND;
use corpus_gate_core::runtime::DEFAULT_WORKERS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::suites::SuiteConfig;
use crate::suites::builtin_suites;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "corpus-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CORPUS_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default per-invocation timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Minimum per-invocation timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 1;
/// Maximum per-invocation timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;
/// Maximum worker pool size.
pub(crate) const MAX_WORKERS: usize = 256;
/// Maximum number of suite entries.
pub(crate) const MAX_SUITES: usize = 256;
/// Maximum entries in one ignore or activation list.
pub(crate) const MAX_RULES_PER_LIST: usize = 4096;
/// Maximum length of one rule substring.
pub(crate) const MAX_RULE_LENGTH: usize = 1024;
/// Maximum number of extra memory checker arguments.
pub(crate) const MAX_MEMCHECK_ARGS: usize = 64;
/// Default event log path for the file sink.
pub(crate) const DEFAULT_EVENT_LOG: &str = "corpus-gate-events.jsonl";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Corpus Gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Run defaults.
    #[serde(default)]
    pub run: RunConfig,
    /// Memory checker wrapper.
    #[serde(default)]
    pub memcheck: MemcheckConfig,
    /// Structured event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Suite rule tables.
    #[serde(default = "builtin_suites")]
    pub suites: Vec<SuiteConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            memcheck: MemcheckConfig::default(),
            logging: LoggingConfig::default(),
            suites: builtin_suites(),
        }
    }
}

/// Run defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Sample file extension.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Path substring marking expected-invalid samples.
    #[serde(default = "default_fail_marker")]
    pub fail_marker: String,
    /// Per-invocation timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Worker pool size.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Expected-verdict policy.
    #[serde(default)]
    pub verdict_policy: VerdictPolicy,
    /// Validator subcommand placed before the sample path.
    #[serde(default = "default_subcommand")]
    pub subcommand: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            fail_marker: default_fail_marker(),
            timeout_ms: default_timeout_ms(),
            workers: default_workers(),
            verdict_policy: VerdictPolicy::default(),
            subcommand: default_subcommand(),
        }
    }
}

impl RunConfig {
    /// Validates run settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_token("run.extension", self.extension.trim_start_matches('.'))?;
        validate_token("run.fail_marker", &self.fail_marker)?;
        validate_token("run.subcommand", &self.subcommand)?;
        if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "run.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(1 ..= MAX_WORKERS).contains(&self.workers) {
            return Err(ConfigError::Invalid(format!(
                "run.workers must be between 1 and {MAX_WORKERS}"
            )));
        }
        Ok(())
    }
}

/// Memory checker wrapper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemcheckConfig {
    /// Whether validator runs are wrapped.
    #[serde(default)]
    pub enabled: bool,
    /// Memory checker executable.
    #[serde(default = "default_memcheck_program")]
    pub program: String,
    /// Extra flags appended after the fixed checker flags.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for MemcheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: default_memcheck_program(),
            extra_args: Vec::new(),
        }
    }
}

impl MemcheckConfig {
    /// Validates memory checker settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("memcheck.program", &self.program)?;
        if self.extra_args.len() > MAX_MEMCHECK_ARGS {
            return Err(ConfigError::Invalid(format!(
                "memcheck.extra_args exceeds {MAX_MEMCHECK_ARGS} entries"
            )));
        }
        Ok(())
    }

    /// Returns wrapper options for the command builder.
    #[must_use]
    pub fn wrapper_options(&self) -> WrapperOptions {
        WrapperOptions {
            memcheck: self.enabled.then(|| MemcheckWrapper {
                program: PathBuf::from(&self.program),
                extra_args: self.extra_args.clone(),
            }),
        }
    }
}

/// Event sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// Events are dropped.
    #[default]
    None,
    /// Events are written to stderr as JSON lines.
    Stderr,
    /// Events are appended to `logging.path` as JSON lines.
    File,
}

/// Structured event logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Event log path for the file sink.
    #[serde(default = "default_event_log")]
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            sink: EventSinkKind::None,
            path: default_event_log(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sink == EventSinkKind::File {
            validate_path_string("logging.path", &self.path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration using the default resolution rules: `path`, then
    /// [`CONFIG_ENV_VAR`], then [`DEFAULT_CONFIG_NAME`] when present, else
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_present = Path::new(DEFAULT_CONFIG_NAME).is_file();
        match resolve_path(path, env::var_os(CONFIG_ENV_VAR), default_present)? {
            Some(resolved) => Self::load_file(&resolved),
            None => Ok(Self::default()),
        }
    }

    /// Loads and validates one configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        self.memcheck.validate()?;
        self.logging.validate()?;
        if self.suites.len() > MAX_SUITES {
            return Err(ConfigError::Invalid(format!("suites exceeds {MAX_SUITES} entries")));
        }
        let mut names = BTreeSet::new();
        for suite in &self.suites {
            validate_suite(suite)?;
            if !names.insert(suite.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate suite name: {}", suite.name)));
            }
        }
        Ok(())
    }

    /// Returns the rule set for `suite`, empty when the suite is not listed.
    #[must_use]
    pub fn rules_for(&self, suite: &str) -> RuleSet {
        self.suites
            .iter()
            .find(|entry| entry.name == suite)
            .map(SuiteConfig::rules)
            .unwrap_or_default()
    }

    /// Returns the per-invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.run.timeout_ms)
    }

    /// Builds harness settings for one suite under `corpus_root`.
    #[must_use]
    pub fn harness_settings(&self, corpus_root: &Path, suite: &str) -> HarnessSettings {
        HarnessSettings {
            corpus_root: corpus_root.to_path_buf(),
            suite: suite.to_string(),
            extension: self.run.extension.clone(),
            fail_marker: self.run.fail_marker.clone(),
            policy: self.run.verdict_policy,
            workers: self.run.workers,
            rules: self.rules_for(suite),
        }
    }

    /// Builds invoker settings for `executable`.
    #[must_use]
    pub fn invoker_config(&self, executable: &Path) -> InvokerConfig {
        InvokerConfig {
            executable: executable.to_path_buf(),
            subcommand: self.run.subcommand.clone(),
            timeout: self.timeout(),
            wrapper: self.memcheck.wrapper_options(),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default sample extension.
fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Default fail marker.
fn default_fail_marker() -> String {
    DEFAULT_FAIL_MARKER.to_string()
}

/// Default per-invocation timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default worker count.
const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Default validator subcommand.
fn default_subcommand() -> String {
    DEFAULT_SUBCOMMAND.to_string()
}

/// Default memory checker executable.
fn default_memcheck_program() -> String {
    DEFAULT_MEMCHECK_PROGRAM.to_string()
}

/// Default event log path.
fn default_event_log() -> String {
    DEFAULT_EVENT_LOG.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the CLI, the environment, or the default name.
fn resolve_path(
    path: Option<&Path>,
    env_path: Option<OsString>,
    default_present: bool,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    Ok(default_present.then(|| PathBuf::from(DEFAULT_CONFIG_NAME)))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a short non-empty token such as an extension or marker.
fn validate_token(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_RULE_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates one suite entry.
fn validate_suite(suite: &SuiteConfig) -> Result<(), ConfigError> {
    if suite.name.trim().is_empty() {
        return Err(ConfigError::Invalid("suites.name must be non-empty".to_string()));
    }
    if suite.name.len() > MAX_PATH_COMPONENT_LENGTH {
        return Err(ConfigError::Invalid(format!("suite {} name too long", suite.name)));
    }
    for (list, entries) in [("ignore", &suite.ignore), ("activate", &suite.activate)] {
        if entries.len() > MAX_RULES_PER_LIST {
            return Err(ConfigError::Invalid(format!(
                "suite {} {list} exceeds {MAX_RULES_PER_LIST} entries",
                suite.name
            )));
        }
        for entry in entries {
            if entry.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "suite {} {list} entries must be non-empty",
                    suite.name
                )));
            }
            if entry.len() > MAX_RULE_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "suite {} {list} entry exceeds max length",
                    suite.name
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
