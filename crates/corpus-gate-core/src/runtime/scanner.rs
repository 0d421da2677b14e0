// crates/corpus-gate-core/src/runtime/scanner.rs
// ============================================================================
// Module: Corpus Scanner
// Description: Recursive discovery of sample documents under a suite root.
// Purpose: Yield candidate samples lazily, filtered by file extension.
// Dependencies: thiserror, crate::core::sample
// ============================================================================

//! ## Overview
//! [`CorpusScanner`] walks `<corpus_root>/<suite>` depth-first and yields
//! every regular file whose name ends in the configured extension. Each call
//! to [`CorpusScanner::scan`] starts a fresh walk.
//!
//! ## Invariants
//! - A missing suite directory fails before any sample is yielded.
//! - Entries are sorted per directory so one machine always walks in the
//!   same order. Callers must not rely on order for correctness.
//! - Symlinked directories are not followed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::Sample;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default sample document extension.
pub const DEFAULT_EXTENSION: &str = "pdf";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Corpus discovery failures. All are fatal to the run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The suite directory does not exist.
    #[error("suite directory {} does not exist", path.display())]
    MissingSuite {
        /// Expected suite directory.
        path: PathBuf,
    },
    /// The suite path exists but is not a directory.
    #[error("suite path {} is not a directory", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// A directory could not be listed.
    #[error("failed to read directory {}: {message}", path.display())]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// OS error text.
        message: String,
    },
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Discovers samples for one suite under a corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusScanner {
    /// Corpus root directory.
    corpus_root: PathBuf,
    /// Suite directory name under the corpus root.
    suite: String,
    /// File name suffix including the leading dot.
    suffix: String,
}

impl CorpusScanner {
    /// Creates a scanner. `extension` may be given with or without a leading dot.
    #[must_use]
    pub fn new(corpus_root: impl Into<PathBuf>, suite: impl Into<String>, extension: &str) -> Self {
        let trimmed = extension.trim_start_matches('.');
        Self {
            corpus_root: corpus_root.into(),
            suite: suite.into(),
            suffix: format!(".{trimmed}"),
        }
    }

    /// Returns the suite directory.
    #[must_use]
    pub fn suite_root(&self) -> PathBuf {
        self.corpus_root.join(&self.suite)
    }

    /// Starts a new walk over the suite directory.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the suite directory is missing or is
    /// not a directory.
    pub fn scan(&self) -> Result<SampleIter, DiscoveryError> {
        let root = self.suite_root();
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(DiscoveryError::NotADirectory {
                    path: root,
                });
            }
            Err(_) => {
                return Err(DiscoveryError::MissingSuite {
                    path: root,
                });
            }
        }
        Ok(SampleIter {
            corpus_root: self.corpus_root.clone(),
            suffix: self.suffix.clone(),
            directories: vec![root],
            files: VecDeque::new(),
        })
    }

    /// Walks the suite directory to completion.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiscoveryError`] met during the walk.
    pub fn collect(&self) -> Result<Vec<Sample>, DiscoveryError> {
        self.scan()?.collect()
    }
}

// ============================================================================
// SECTION: Iterator
// ============================================================================

/// Lazy depth-first walk yielding matching samples.
#[derive(Debug)]
pub struct SampleIter {
    /// Corpus root used to compute relative paths.
    corpus_root: PathBuf,
    /// File name suffix including the leading dot.
    suffix: String,
    /// Directories still to list, last entry first.
    directories: Vec<PathBuf>,
    /// Matching files from the most recently listed directory.
    files: VecDeque<PathBuf>,
}

impl SampleIter {
    /// Lists `dir`, queueing matching files and pushing subdirectories.
    fn expand(&mut self, dir: &Path) -> Result<(), DiscoveryError> {
        let read_error = |err: std::io::Error| DiscoveryError::ReadDir {
            path: dir.to_path_buf(),
            message: err.to_string(),
        };
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_error)? {
            entries.push(entry.map_err(read_error)?);
        }
        entries.sort_by_key(std::fs::DirEntry::file_name);

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                subdirs.push(path);
            } else if self.is_sample_file(&path, file_type.is_file()) {
                self.files.push_back(path);
            }
        }
        self.directories.extend(subdirs.into_iter().rev());
        Ok(())
    }

    /// Returns true when `path` is a regular file (or a link to one) with the suffix.
    fn is_sample_file(&self, path: &Path, is_file: bool) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !name.to_string_lossy().ends_with(&self.suffix) {
            return false;
        }
        is_file || fs::metadata(path).is_ok_and(|meta| meta.is_file())
    }

    /// Builds a sample with its corpus-relative path.
    fn sample(&self, path: PathBuf) -> Sample {
        let relative = path
            .strip_prefix(&self.corpus_root)
            .map_or_else(|_| path.to_string_lossy(), Path::to_string_lossy)
            .into_owned();
        Sample::new(path, relative)
    }
}

impl Iterator for SampleIter {
    type Item = Result<Sample, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.files.pop_front() {
                return Some(Ok(self.sample(path)));
            }
            let dir = self.directories.pop()?;
            if let Err(err) = self.expand(&dir) {
                self.directories.clear();
                return Some(Err(err));
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
