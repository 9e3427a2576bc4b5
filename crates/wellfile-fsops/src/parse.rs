//! Input parsing: classify lines into tasks and rejected inputs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{Identifier, MatchMode, OutcomeRecord, Task, TaskKey};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Tasks accepted for scanning plus the lines rejected up front.
#[derive(Debug, Default)]
pub struct ParsedInput {
    /// One task per distinct accepted input, in first-occurrence order.
    pub tasks: Vec<Task>,
    /// `InvalidInput` records for malformed lines.
    pub rejected: Vec<OutcomeRecord>,
    names: HashMap<String, usize>,
}

impl ParsedInput {
    /// Index of the task that accepts `file_name`, if any.
    #[must_use]
    pub fn task_for(&self, file_name: &str) -> Option<usize> {
        self.names.get(file_name).copied()
    }

    /// Whether no line produced a task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Classify raw lines for `mode`.
///
/// Blank lines are skipped. Repeated inputs collapse into the task created at the
/// first occurrence, so no file is copied twice in one run.
#[must_use]
pub fn parse_inputs<S: AsRef<str>>(lines: &[S], mode: MatchMode) -> ParsedInput {
    let mut parsed = ParsedInput::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, raw) in lines.iter().enumerate() {
        let line = index + 1;
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(key) = classify(trimmed, mode) else {
            parsed
                .rejected
                .push(OutcomeRecord::rejected(line, trimmed, mode));
            continue;
        };
        match seen.entry(key.label().to_string()) {
            Entry::Occupied(first) => {
                debug!(input = trimmed, line, first_line = *first.get(), "duplicate input collapsed");
            }
            Entry::Vacant(slot) => {
                slot.insert(line);
                let task_index = parsed.tasks.len();
                for name in key.file_names() {
                    parsed.names.entry(name).or_insert(task_index);
                }
                parsed.tasks.push(Task::new(key, line));
            }
        }
    }

    parsed
}

fn classify(trimmed: &str, mode: MatchMode) -> Option<TaskKey> {
    match mode {
        MatchMode::Wells => Identifier::parse(trimmed).map(TaskKey::Well),
        MatchMode::Names => is_bare_file_name(trimmed).then(|| TaskKey::Name(trimmed.to_string())),
    }
}

fn is_bare_file_name(candidate: &str) -> bool {
    !candidate.contains(['/', '\\']) && candidate != "." && candidate != ".."
}

/// Read an input list file into lines, dropping a leading byte-order mark.
///
/// # Errors
///
/// Returns [`FsOpsError::Io`] when the file cannot be read.
pub fn read_input_list(path: &Path) -> FsOpsResult<Vec<String>> {
    let raw = fs::read_to_string(path)
        .map_err(|source| FsOpsError::io("input_list.read", path, source))?;
    let body = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&raw);
    Ok(body.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutcomeStatus;
    use anyhow::Result;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    #[test]
    fn malformed_lines_are_rejected_and_blank_lines_skipped() {
        let parsed = parse_inputs(&["040192017105", "", "   ", "12345"], MatchMode::Wells);
        assert_eq!(parsed.tasks.len(), 1);
        assert_eq!(parsed.rejected.len(), 1);
        let rejected = &parsed.rejected[0];
        assert_eq!(rejected.line, 4);
        assert_eq!(rejected.identifier, "12345");
        assert_eq!(rejected.status, OutcomeStatus::InvalidInput);
        assert_eq!(rejected.message.as_deref(), Some("must be exactly 12 digits"));
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let parsed = parse_inputs(
            &["040192017100", " 040192017100", "040192017101"],
            MatchMode::Wells,
        );
        assert_eq!(parsed.tasks.len(), 2);
        assert_eq!(parsed.tasks[0].line, 1);
        assert_eq!(parsed.tasks[1].line, 3);
    }

    #[test]
    fn reverse_index_maps_every_accepted_name() {
        let parsed = parse_inputs(&["040192017100", "040192017105"], MatchMode::Wells);
        assert_eq!(parsed.task_for("0401920171.pdf"), Some(0));
        assert_eq!(parsed.task_for("0401920171_00.pdf"), Some(0));
        assert_eq!(parsed.task_for("0401920171_05.pdf"), Some(1));
        assert_eq!(parsed.task_for("0401920171_01.pdf"), None);
    }

    #[test]
    fn name_mode_rejects_paths() {
        let parsed = parse_inputs(&["report.xlsx", "dir/report.xlsx", "..", "a\\b.pdf"], MatchMode::Names);
        assert_eq!(parsed.tasks.len(), 1);
        assert_eq!(parsed.task_for("report.xlsx"), Some(0));
        assert_eq!(parsed.rejected.len(), 3);
        assert!(
            parsed
                .rejected
                .iter()
                .all(|record| record.message.as_deref() == Some("must be a bare file name"))
        );
    }

    #[test]
    fn read_input_list_strips_bom() -> Result<()> {
        let dir = temp_dir("parse")?;
        let path = dir.path().join("ids.txt");
        write_file(&path, "\u{feff}040192017100\r\n040192017105\n")?;
        let lines = read_input_list(&path)?;
        assert_eq!(lines, vec!["040192017100", "040192017105"]);
        Ok(())
    }

    #[test]
    fn read_input_list_reports_missing_file() -> Result<()> {
        let dir = temp_dir("parse")?;
        let missing = dir.path().join("missing.txt");
        let error = read_input_list(&missing).err();
        assert!(matches!(
            error,
            Some(FsOpsError::Io { operation: "input_list.read", .. })
        ));
        Ok(())
    }
}
