//! Resolver pipeline: parse, scan, resolve and copy, then log.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use wellfile_config::CopyPolicy;
use wellfile_events::{Event, EventBus};

use crate::copy::copy_into;
use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{MatchMode, OutcomeRecord, OutcomeStatus, RunReport, RunSummary, Task};
use crate::parse::{ParsedInput, parse_inputs};
use crate::run_log::write_run_log;
use crate::scan::scan_root;

/// Parameters for a single resolver run.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// Identifier shared by the report and every published event.
    pub run_id: Uuid,
    /// How input lines are interpreted.
    pub mode: MatchMode,
    /// Raw input lines, one entry per line.
    pub lines: &'a [String],
    /// Source roots, destination and log format.
    pub policy: &'a CopyPolicy,
    /// Local start time; stamps the run log name.
    pub started: DateTime<Local>,
}

/// Runs resolver requests and reports progress on an optional event bus.
#[derive(Clone, Default)]
pub struct ResolverService {
    events: Option<EventBus>,
}

impl ResolverService {
    /// Construct a service that publishes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: None }
    }

    /// Publish run progress to `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Execute a run to completion.
    ///
    /// Per-input problems become outcome records; only failures that make the
    /// whole run meaningless are returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the source list is empty, no destination is set, or the
    /// destination directory cannot be created.
    pub fn apply(&self, request: ResolveRequest<'_>) -> FsOpsResult<RunReport> {
        match self.execute(&request) {
            Ok(report) => {
                info!(
                    run_id = %report.run_id,
                    copied = report.summary.copied,
                    not_found = report.summary.not_found,
                    invalid_input = report.summary.invalid_input,
                    copy_errors = report.summary.copy_errors,
                    "resolver run completed"
                );
                self.publish(Event::RunCompleted {
                    run_id: report.run_id,
                    copied: report.summary.copied,
                    not_found: report.summary.not_found,
                    invalid_input: report.summary.invalid_input,
                    copy_errors: report.summary.copy_errors,
                    log_path: report
                        .log_path
                        .as_ref()
                        .map(|path| path.display().to_string()),
                });
                Ok(report)
            }
            Err(error) => {
                let detail = error.detail();
                warn!(run_id = %request.run_id, error = %detail, "resolver run failed");
                self.publish(Event::RunFailed {
                    run_id: request.run_id,
                    message: detail,
                });
                Err(error)
            }
        }
    }

    fn execute(&self, request: &ResolveRequest<'_>) -> FsOpsResult<RunReport> {
        let policy = request.policy;
        if policy.sources.is_empty() {
            return Err(FsOpsError::InvalidInput {
                field: "sources",
                reason: "must not be empty",
                value: None,
            });
        }
        let destination = policy
            .destination
            .as_deref()
            .ok_or(FsOpsError::InvalidInput {
                field: "destination",
                reason: "is required",
                value: None,
            })?;
        fs::create_dir_all(destination)
            .map_err(|source| FsOpsError::io("destination.create", destination, source))?;

        let mut parsed = parse_inputs(request.lines, request.mode);
        info!(
            run_id = %request.run_id,
            mode = request.mode.as_str(),
            tasks = parsed.tasks.len(),
            rejected = parsed.rejected.len(),
            sources = policy.sources.len(),
            "resolver run started"
        );
        self.publish(Event::RunStarted {
            run_id: request.run_id,
            mode: request.mode.as_str().to_string(),
            tasks: parsed.tasks.len(),
            sources: policy.sources.len(),
        });
        for record in &parsed.rejected {
            self.publish_resolved(request.run_id, record);
        }

        let skipped_sources = self.scan_sources(request.run_id, &policy.sources, &mut parsed);

        let ParsedInput {
            tasks, rejected, ..
        } = parsed;
        let mut records = rejected;
        for task in &tasks {
            let record = resolve_task(task, destination);
            self.publish_resolved(request.run_id, &record);
            records.push(record);
        }
        records.sort_by_key(|record| record.line);

        let summary = RunSummary::from_records(&records);
        let written = write_run_log(
            destination,
            policy.run_log,
            request.started,
            &records,
            &summary,
        );
        let (log_path, log_error) = match written {
            Ok(path) => (Some(path), None),
            Err(error) => {
                let detail = error.detail();
                warn!(run_id = %request.run_id, error = %detail, "failed to write run log");
                (None, Some(detail))
            }
        };

        Ok(RunReport {
            run_id: request.run_id,
            mode: request.mode,
            records,
            summary,
            skipped_sources,
            log_path,
            log_error,
        })
    }

    fn scan_sources(
        &self,
        run_id: Uuid,
        sources: &[PathBuf],
        parsed: &mut ParsedInput,
    ) -> Vec<PathBuf> {
        let mut skipped = Vec::new();
        for root in sources {
            if !root.is_dir() {
                warn!(run_id = %run_id, root = %root.display(), "source root missing; skipping");
                self.publish(Event::SourceSkipped {
                    run_id,
                    path: root.display().to_string(),
                });
                skipped.push(root.clone());
                continue;
            }
            if parsed.is_empty() {
                continue;
            }
            let stats = scan_root(root, parsed);
            info!(
                run_id = %run_id,
                root = %root.display(),
                files_seen = stats.files_seen,
                matches = stats.matches,
                "source root scanned"
            );
            self.publish(Event::SourceScanned {
                run_id,
                path: root.display().to_string(),
                files_seen: stats.files_seen,
                matches: stats.matches,
            });
        }
        skipped
    }

    fn publish_resolved(&self, run_id: Uuid, record: &OutcomeRecord) {
        let detail = match record.status {
            OutcomeStatus::Copied => record
                .destination_path
                .as_ref()
                .map(|path| path.display().to_string()),
            OutcomeStatus::NotFound => None,
            OutcomeStatus::InvalidInput | OutcomeStatus::CopyError => record.message.clone(),
        };
        self.publish(Event::TaskResolved {
            run_id,
            identifier: record.identifier.clone(),
            status: record.status.as_str().to_string(),
            detail,
        });
    }

    fn publish(&self, event: Event) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

fn resolve_task(task: &Task, destination: &Path) -> OutcomeRecord {
    let Some(best) = task.best_candidate() else {
        return OutcomeRecord::for_task(task, OutcomeStatus::NotFound);
    };
    let modified = Some(DateTime::<Utc>::from(best.modified));
    match copy_into(&best.path, destination) {
        Ok(target) => OutcomeRecord {
            source_path: Some(best.path.clone()),
            destination_path: Some(target),
            modified,
            ..OutcomeRecord::for_task(task, OutcomeStatus::Copied)
        },
        Err(error) => {
            warn!(
                identifier = task.key.label(),
                source = %best.path.display(),
                error = %error,
                "copy failed"
            );
            OutcomeRecord {
                source_path: Some(best.path.clone()),
                modified,
                message: Some(error.to_string()),
                ..OutcomeRecord::for_task(task, OutcomeStatus::CopyError)
            }
        }
    }
}
