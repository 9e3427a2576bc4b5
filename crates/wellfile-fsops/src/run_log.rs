//! Per-run log files written into the destination directory.
//!
//! # Design
//! - Log names carry the local start time; a numeric suffix avoids clobbering an
//!   earlier log from the same second.
//! - The CSV form is also the hand-off format for date cross-checks, so it can be
//!   read back into [`WellFileDate`] values.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;
use wellfile_config::RunLogKind;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{OutcomeRecord, OutcomeStatus, RunSummary, WellFileDate};

/// Timestamp format of the `LastModified` column.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOG_NAME_STAMP: &str = "%Y-%m-%d_%H-%M-%S";
const LOG_NAME_PREFIX: &str = "copy_log_";
pub(crate) const MAX_NAME_ATTEMPTS: usize = 1_000;
const FOUND_PATHS_SEPARATOR: &str = "; ";
const RULE: &str = "--------------------------------------------------";

#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    #[serde(rename = "Identifier")]
    identifier: String,
    #[serde(rename = "API")]
    api: String,
    #[serde(rename = "Bore")]
    bore: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "CopiedFilePath")]
    copied_file_path: String,
    #[serde(rename = "LastModified")]
    last_modified: String,
    #[serde(rename = "TargetFilePath")]
    target_file_path: String,
    #[serde(rename = "AllFoundPaths")]
    all_found_paths: String,
    #[serde(rename = "ErrorMessage")]
    error_message: String,
}

impl From<&OutcomeRecord> for LogRow {
    fn from(record: &OutcomeRecord) -> Self {
        Self {
            identifier: record.identifier.clone(),
            api: record.api.clone().unwrap_or_default(),
            bore: record.bore.clone().unwrap_or_default(),
            status: record.status.as_str().to_string(),
            copied_file_path: display_path(record.source_path.as_deref()),
            last_modified: record
                .modified_local()
                .map(|modified| modified.format(LOG_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            target_file_path: display_path(record.destination_path.as_deref()),
            all_found_paths: record
                .found_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(FOUND_PATHS_SEPARATOR),
            error_message: record.message.clone().unwrap_or_default(),
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_default()
}

/// Write the run log for `records` into `destination` and return its path.
///
/// # Errors
///
/// Returns an error when no log file can be created or written.
pub fn write_run_log(
    destination: &Path,
    kind: RunLogKind,
    started: DateTime<Local>,
    records: &[OutcomeRecord],
    summary: &RunSummary,
) -> FsOpsResult<PathBuf> {
    let (path, file) = create_log_file(destination, kind, started)?;
    match kind {
        RunLogKind::Csv => write_csv(&path, file, records)?,
        RunLogKind::Text => write_text(file, records, summary)
            .map_err(|source| FsOpsError::io("run_log.write", &path, source))?,
    }
    Ok(path)
}

fn create_log_file(
    destination: &Path,
    kind: RunLogKind,
    started: DateTime<Local>,
) -> FsOpsResult<(PathBuf, File)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = destination.join(log_file_name(kind, started, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
            Err(error) => return Err(FsOpsError::io("run_log.create", path, error)),
        }
    }
    Err(FsOpsError::InvalidInput {
        field: "run_log",
        reason: "no free log file name",
        value: Some(log_file_name(kind, started, 0)),
    })
}

/// Log file name for a run started at `started`; attempts after the first get a `_N` suffix.
pub(crate) fn log_file_name(kind: RunLogKind, started: DateTime<Local>, attempt: usize) -> String {
    let stem = format!("{LOG_NAME_PREFIX}{}", started.format(LOG_NAME_STAMP));
    let extension = kind.extension();
    if attempt == 0 {
        format!("{stem}.{extension}")
    } else {
        format!("{stem}_{attempt}.{extension}")
    }
}

fn write_csv(path: &Path, file: File, records: &[OutcomeRecord]) -> FsOpsResult<()> {
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer
            .serialize(LogRow::from(record))
            .map_err(|source| FsOpsError::csv("run_log.serialize", path, source))?;
    }
    writer
        .flush()
        .map_err(|source| FsOpsError::io("run_log.flush", path, source))
}

fn write_text(file: File, records: &[OutcomeRecord], summary: &RunSummary) -> io::Result<()> {
    let mut out = BufWriter::new(file);
    for record in records {
        writeln!(out, "{}", text_line(record))?;
    }
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Process Finished. Files Copied: {}. Files Not Found: {}. Invalid Inputs: {}. Copy Errors: {}.",
        summary.copied, summary.not_found, summary.invalid_input, summary.copy_errors
    )?;
    out.flush()
}

fn text_line(record: &OutcomeRecord) -> String {
    let row = LogRow::from(record);
    match record.status {
        OutcomeStatus::Copied => format!(
            "COPIED: '{}' -> '{}' (modified {})",
            row.copied_file_path, row.target_file_path, row.last_modified
        ),
        OutcomeStatus::NotFound => format!(
            "NOT FOUND: '{}' was not found in any source folder.",
            row.identifier
        ),
        OutcomeStatus::InvalidInput => {
            format!("INVALID: '{}' {}.", row.identifier, row.error_message)
        }
        OutcomeStatus::CopyError => format!(
            "ERROR: Could not copy '{}' from '{}'. Reason: {}",
            row.identifier, row.copied_file_path, row.error_message
        ),
    }
}

/// Read the copied well diagrams back out of a CSV run log.
///
/// Rows that are not `Copied`, have no API, or carry an unreadable timestamp are
/// skipped.
///
/// # Errors
///
/// Returns an error when the log cannot be opened or is not a run log.
pub fn read_copied_dates(path: &Path) -> FsOpsResult<Vec<WellFileDate>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|source| FsOpsError::csv("run_log.open", path, source))?;
    let mut dates = Vec::new();
    for row in reader.deserialize::<LogRow>() {
        let row = row.map_err(|source| FsOpsError::csv("run_log.read", path, source))?;
        if row.status != OutcomeStatus::Copied.as_str() || row.api.is_empty() {
            continue;
        }
        let Ok(modified) = NaiveDateTime::parse_from_str(&row.last_modified, LOG_TIME_FORMAT)
        else {
            warn!(identifier = %row.identifier, value = %row.last_modified, "unreadable LastModified");
            continue;
        };
        let file_name = Path::new(&row.copied_file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        dates.push(WellFileDate {
            api: row.api,
            bore: row.bore,
            file_name,
            modified,
        });
    }
    Ok(dates)
}
