//! # Design
//!
//! - Constant messages; the failing operation and path travel as fields.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for abandonment checks.
pub type AbandonResult<T> = Result<T, AbandonError>;

/// Errors raised while reading status reports or writing findings.
#[derive(Debug, Error)]
pub enum AbandonError {
    /// IO failures while reading or writing files.
    #[error("abandonment io failure")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// CSV parsing or serialization failures.
    #[error("abandonment csv failure")]
    Csv {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// The status report lacks a required column.
    #[error("status report column missing")]
    MissingColumn {
        /// Canonical column name.
        column: &'static str,
        /// Report path.
        path: PathBuf,
    },
}

impl AbandonError {
    pub(crate) fn csv(operation: &'static str, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            operation,
            path: path.into(),
            source,
        }
    }
}
