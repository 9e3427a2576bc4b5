//! Domain models for resolver runs.
//!
//! # Design
//! - Tasks and candidates are transient scan state; outcome records are the only
//!   values that leave a run.
//! - Status is an explicit enum; labels are derived from it, never the reverse.

pub mod identifier;
pub mod task;

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub use identifier::{Identifier, MatchMode, TaskKey};
pub use task::{Candidate, Task};

/// Final classification of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeStatus {
    /// The chosen candidate was copied to the destination.
    Copied,
    /// No candidate exists in any source root.
    NotFound,
    /// The input line was malformed and never scanned.
    InvalidInput,
    /// Copying the chosen candidate raised an I/O error.
    CopyError,
}

impl OutcomeStatus {
    /// Label written to run logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copied => "Copied",
            Self::NotFound => "NotFound",
            Self::InvalidInput => "InvalidInput",
            Self::CopyError => "CopyError",
        }
    }
}

/// Per-input result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    /// 1-based input line of the first occurrence.
    pub line: usize,
    /// Trimmed input text.
    pub identifier: String,
    /// API component for well inputs.
    pub api: Option<String>,
    /// Bore component for well inputs.
    pub bore: Option<String>,
    /// Final classification.
    pub status: OutcomeStatus,
    /// File that was (or failed to be) copied.
    pub source_path: Option<PathBuf>,
    /// Location in the destination directory.
    pub destination_path: Option<PathBuf>,
    /// Modification time of the chosen file.
    pub modified: Option<DateTime<Utc>>,
    /// Every matching path discovered during the scan.
    pub found_paths: Vec<PathBuf>,
    /// Rejection reason or copy error message.
    pub message: Option<String>,
}

impl OutcomeRecord {
    pub(crate) fn rejected(line: usize, raw: &str, mode: MatchMode) -> Self {
        Self {
            line,
            identifier: raw.to_string(),
            api: None,
            bore: None,
            status: OutcomeStatus::InvalidInput,
            source_path: None,
            destination_path: None,
            modified: None,
            found_paths: Vec::new(),
            message: Some(mode.rejection_reason().to_string()),
        }
    }

    pub(crate) fn for_task(task: &Task, status: OutcomeStatus) -> Self {
        Self {
            line: task.line,
            identifier: task.key.label().to_string(),
            api: task.key.api().map(str::to_string),
            bore: task.key.bore().map(str::to_string),
            status,
            source_path: None,
            destination_path: None,
            modified: None,
            found_paths: task
                .candidates()
                .iter()
                .map(|candidate| candidate.path.clone())
                .collect(),
            message: None,
        }
    }

    /// Modification time rendered in local wall-clock time, as written to run logs.
    #[must_use]
    pub fn modified_local(&self) -> Option<NaiveDateTime> {
        self.modified
            .map(|modified| modified.with_timezone(&Local).naive_local())
    }
}

/// Outcome counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Files copied.
    pub copied: usize,
    /// Inputs with no candidate.
    pub not_found: usize,
    /// Malformed inputs.
    pub invalid_input: usize,
    /// Copies that failed.
    pub copy_errors: usize,
}

impl RunSummary {
    /// Tally a set of records.
    #[must_use]
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                OutcomeStatus::Copied => summary.copied += 1,
                OutcomeStatus::NotFound => summary.not_found += 1,
                OutcomeStatus::InvalidInput => summary.invalid_input += 1,
                OutcomeStatus::CopyError => summary.copy_errors += 1,
            }
            summary
        })
    }

    /// Total number of inputs accounted for.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.copied + self.not_found + self.invalid_input + self.copy_errors
    }
}

/// Everything a caller learns from a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run identifier shared with published events.
    pub run_id: Uuid,
    /// How the inputs were interpreted.
    pub mode: MatchMode,
    /// Outcome per input, ordered by input line.
    pub records: Vec<OutcomeRecord>,
    /// Outcome counts.
    pub summary: RunSummary,
    /// Source roots that did not exist.
    pub skipped_sources: Vec<PathBuf>,
    /// Path of the run log, when it was written.
    pub log_path: Option<PathBuf>,
    /// Why the run log could not be written.
    pub log_error: Option<String>,
}

impl RunReport {
    /// `(API, bore, modified)` for every copied well diagram.
    #[must_use]
    pub fn copied_well_dates(&self) -> Vec<WellFileDate> {
        self.records
            .iter()
            .filter(|record| record.status == OutcomeStatus::Copied)
            .filter_map(|record| {
                Some(WellFileDate {
                    api: record.api.clone()?,
                    bore: record.bore.clone().unwrap_or_default(),
                    file_name: record
                        .source_path
                        .as_ref()
                        .and_then(|path| path.file_name())
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    modified: record.modified_local()?,
                })
            })
            .collect()
    }
}

/// A copied well diagram and its file date, handed to status cross-checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellFileDate {
    /// 10-digit API.
    pub api: String,
    /// 2-digit bore.
    pub bore: String,
    /// Name of the copied file.
    pub file_name: String,
    /// Local modification time of the file.
    pub modified: NaiveDateTime,
}
