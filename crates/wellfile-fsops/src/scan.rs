//! Source-tree scanning.

use std::fs;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::model::Candidate;
use crate::parse::ParsedInput;

/// Counters collected while walking one source root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files inspected.
    pub files_seen: u64,
    /// Files recorded as candidates.
    pub matches: u64,
}

/// Walk `root` and attach every file whose name a task accepts.
///
/// Directory symlinks are not followed. A symlink to a regular file is treated as
/// that file. Unreadable entries are logged and skipped.
pub fn scan_root(root: &Path, parsed: &mut ParsedInput) -> ScanStats {
    let mut stats = ScanStats::default();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(
                    root = %root.display(),
                    path = ?error.path().map(Path::display),
                    error = %error,
                    "skipping unreadable entry"
                );
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if file_type.is_file() {
            stats.files_seen += 1;
        }

        let Some(task_index) = entry.file_name().to_str().and_then(|name| parsed.task_for(name))
        else {
            continue;
        };

        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(error) => {
                warn!(path = %entry.path().display(), error = %error, "skipping unreadable file");
                continue;
            }
        };
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(error) => {
                warn!(path = %entry.path().display(), error = %error, "modification time unavailable");
                continue;
            }
        };

        if let Some(task) = parsed.tasks.get_mut(task_index) {
            task.push_candidate(Candidate {
                path: entry.into_path(),
                modified,
            });
            stats.matches += 1;
        }
    }
    stats
}
