//! # Design
//!
//! - Structured, constant-message errors for the terminal failures of a run.
//! - Capture operation context (paths, fields, inputs) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for resolver operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Terminal errors that abort a whole run.
///
/// Per-input problems (malformed identifiers, missing files, failed copies) are
/// not errors at this level; they are recorded as outcome records instead.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// CSV parsing or serialization failures.
    #[error("fsops csv failure")]
    Csv {
        /// Operation that triggered the CSV failure.
        operation: &'static str,
        /// Path involved in the CSV failure.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// Input validation failures.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: csv::Error,
    ) -> Self {
        Self::Csv {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Render the error with its captured context for operators.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Io {
                operation,
                path,
                source,
            } => format!("{operation} failed for {}: {source}", path.display()),
            Self::Csv {
                operation,
                path,
                source,
            } => format!("{operation} failed for {}: {source}", path.display()),
            Self::InvalidInput {
                field,
                reason,
                value: Some(value),
            } => format!("{field} {reason}: {value}"),
            Self::InvalidInput { field, reason, .. } => format!("{field} {reason}"),
        }
    }
}
