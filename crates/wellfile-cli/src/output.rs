//! Output renderers and formatting helpers for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::Serialize;
use wellfile_abandon::AbandonmentFinding;
use wellfile_events::Event;
use wellfile_fsops::{LOG_TIME_FORMAT, OutcomeStatus, RunReport};
use wellfile_indexer::CatalogRun;

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};

/// What an index command wrote, for display.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct IndexSummary {
    pub(crate) kind: &'static str,
    pub(crate) entries: usize,
    pub(crate) output: PathBuf,
    pub(crate) csv: Option<PathBuf>,
    pub(crate) skipped_roots: Vec<PathBuf>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

/// Progress lines go to stderr so stdout stays parseable.
pub(crate) fn render_progress(event: &Event, format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    if let Some(line) = progress_line(event) {
        eprintln!("{line}");
    }
}

pub(crate) fn progress_line(event: &Event) -> Option<String> {
    match event {
        Event::RunStarted {
            mode,
            tasks,
            sources,
            ..
        } => Some(format!(
            "searching {sources} source folder(s) for {tasks} {mode} input(s)"
        )),
        Event::SourceSkipped { path, .. } => Some(format!("skipped missing source {path}")),
        Event::SourceScanned {
            path,
            files_seen,
            matches,
            ..
        } => Some(format!("scanned {path}: {files_seen} files, {matches} matches")),
        Event::TaskResolved {
            identifier,
            status,
            detail,
            ..
        } => Some(match detail {
            Some(detail) => format!("{identifier}: {status} ({detail})"),
            None => format!("{identifier}: {status}"),
        }),
        Event::RunCompleted { .. } => None,
        Event::RunFailed { message, .. } => Some(format!("run failed: {message}")),
    }
}

pub(crate) fn render_run_report(report: &RunReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            println!("{:>5} {:<14} {:<13} {:<19} SOURCE", "LINE", "INPUT", "STATUS", "MODIFIED");
            for record in &report.records {
                let modified = record
                    .modified_local()
                    .map(|stamp| stamp.format(LOG_TIME_FORMAT).to_string())
                    .unwrap_or_default();
                let location = match record.status {
                    OutcomeStatus::InvalidInput | OutcomeStatus::CopyError => {
                        record.message.clone().unwrap_or_default()
                    }
                    _ => display_path(record.source_path.as_deref()),
                };
                println!(
                    "{:>5} {:<14} {:<13} {:<19} {}",
                    record.line,
                    record.identifier,
                    record.status.as_str(),
                    modified,
                    location
                );
            }
            for skipped in &report.skipped_sources {
                println!("skipped source: {}", skipped.display());
            }
            let summary = &report.summary;
            println!(
                "copied: {}, not found: {}, invalid: {}, copy errors: {}",
                summary.copied, summary.not_found, summary.invalid_input, summary.copy_errors
            );
            if let Some(path) = &report.log_path {
                println!("run log: {}", path.display());
            }
        }
    }
    Ok(())
}

pub(crate) fn render_index_summary(summary: &IndexSummary, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Table => {
            println!("{} entries: {}", summary.kind, summary.entries);
            println!("json: {}", summary.output.display());
            if let Some(csv) = &summary.csv {
                println!("csv: {}", csv.display());
            }
            for root in &summary.skipped_roots {
                println!("skipped missing folder: {}", root.display());
            }
        }
    }
    Ok(())
}

pub(crate) fn render_catalog_run(run: &CatalogRun, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(run)?,
        OutputFormat::Table => {
            for folder in &run.indexed {
                println!(
                    "indexed {} ({} files) -> {}",
                    folder.name,
                    folder.files,
                    folder.output.display()
                );
            }
            for folder in &run.skipped {
                println!("skipped {}: {}", folder.name, folder.reason);
            }
            println!(
                "indexed: {}, skipped: {}, already indexed: {}",
                run.indexed.len(),
                run.skipped.len(),
                run.already_indexed
            );
            if !run.catalog_updated {
                println!("catalog unchanged");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_findings(findings: &[AbandonmentFinding], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(findings)?,
        OutputFormat::Table => {
            println!(
                "{:<10} {:<4} {:<19} {:<19} {:<5} STATUS",
                "API", "BORE", "MODIFIED", "ABANDONED", "STALE"
            );
            for finding in findings {
                println!(
                    "{:<10} {:<4} {:<19} {:<19} {:<5} {}",
                    finding.api,
                    finding.bore,
                    finding.file_modified.format(LOG_TIME_FORMAT),
                    finding
                        .abandonment_date
                        .map(|date| date.format(LOG_TIME_FORMAT).to_string())
                        .unwrap_or_default(),
                    if finding.stale { "yes" } else { "no" },
                    finding.well_status.as_deref().unwrap_or("-")
                );
            }
            let stale = findings.iter().filter(|finding| finding.stale).count();
            println!("files: {}, stale: {stale}", findings.len());
        }
    }
    Ok(())
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_default()
}
