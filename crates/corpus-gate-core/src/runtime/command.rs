// crates/corpus-gate-core/src/runtime/command.rs
// ============================================================================
// Module: Command Builder
// Description: Pure construction of validator command lines.
// Purpose: Keep wrapper logic independent of how the command is executed.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A validator run is `<executable> <subcommand> <sample>`. When the memory
//! checker is enabled the same command is prefixed by the checker and its
//! flags. Building the command never touches the filesystem or spawns
//! anything.
//!
//! ## Invariants
//! - The memory checker always runs with `--error-exitcode=0` so its own
//!   findings never replace the validator's exit status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Validator subcommand that prints document info and sets the verdict.
pub const DEFAULT_SUBCOMMAND: &str = "info";
/// Default memory checker executable.
pub const DEFAULT_MEMCHECK_PROGRAM: &str = "valgrind";
/// Memory checker flags: full leak checking, medium leak resolution, origin
/// tracking, and a zero exit code regardless of findings.
pub const MEMCHECK_FLAGS: &[&str] =
    &["--leak-check=full", "--leak-resolution=med", "--track-origins=yes", "--error-exitcode=0"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Program plus arguments, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Creates a command with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Memory checker prefix configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcheckWrapper {
    /// Checker executable.
    pub program: PathBuf,
    /// Extra flags appended after [`MEMCHECK_FLAGS`].
    pub extra_args: Vec<String>,
}

impl Default for MemcheckWrapper {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_MEMCHECK_PROGRAM),
            extra_args: Vec::new(),
        }
    }
}

/// Options applied on top of the base validator command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperOptions {
    /// Memory checker prefix, when enabled.
    pub memcheck: Option<MemcheckWrapper>,
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds `<executable> <subcommand> <sample>`.
#[must_use]
pub fn validator_command(executable: &Path, subcommand: &str, sample: &Path) -> CommandSpec {
    CommandSpec::new(executable).arg(subcommand).arg(sample.as_os_str())
}

/// Applies wrapper options to a base command.
#[must_use]
pub fn wrap_command(base: CommandSpec, options: &WrapperOptions) -> CommandSpec {
    let Some(memcheck) = &options.memcheck else {
        return base;
    };
    let mut args: Vec<OsString> = MEMCHECK_FLAGS.iter().map(OsString::from).collect();
    args.extend(memcheck.extra_args.iter().map(OsString::from));
    args.push(base.program.into_os_string());
    args.extend(base.args);
    CommandSpec {
        program: memcheck.program.clone(),
        args,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_command_is_info_invocation() {
        let command = validator_command(Path::new("/bin/reader"), "info", Path::new("a b.pdf"));
        assert_eq!(command.program, PathBuf::from("/bin/reader"));
        assert_eq!(command.args, vec![OsString::from("info"), OsString::from("a b.pdf")]);
    }

    #[test]
    fn no_wrapper_leaves_command_unchanged() {
        let base = validator_command(Path::new("reader"), "info", Path::new("x.pdf"));
        assert_eq!(wrap_command(base.clone(), &WrapperOptions::default()), base);
    }

    #[test]
    fn memcheck_prefixes_flags_then_base_command() {
        let base = validator_command(Path::new("reader"), "info", Path::new("x.pdf"));
        let options = WrapperOptions {
            memcheck: Some(MemcheckWrapper {
                program: PathBuf::from("valgrind"),
                extra_args: vec!["--quiet".to_string()],
            }),
        };
        let wrapped = wrap_command(base, &options);
        assert_eq!(
            wrapped.to_string(),
            "valgrind --leak-check=full --leak-resolution=med --track-origins=yes \
             --error-exitcode=0 --quiet reader info x.pdf"
        );
    }
}
