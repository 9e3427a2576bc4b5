//! Shared tree walking for the indexers.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Timestamp format used for `modified` columns.
pub const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A regular file found under an index root.
#[derive(Debug, Clone)]
pub(crate) struct FileHit {
    pub(crate) path: PathBuf,
    pub(crate) name: String,
    pub(crate) modified: String,
}

/// Render a filesystem timestamp in local wall-clock time.
#[must_use]
pub fn format_modified(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format(MODIFIED_FORMAT)
        .to_string()
}

/// Collect every regular file under `root`, pruning directories whose path
/// contains one of `exclude_markers`.
pub(crate) fn walk_root(root: &Path, exclude_markers: &[String]) -> Vec<FileHit> {
    let mut hits = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude_markers));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(root = %root.display(), error = %error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = match entry
            .metadata()
            .map_err(io::Error::from)
            .and_then(|metadata| metadata.modified())
        {
            Ok(modified) => modified,
            Err(error) => {
                warn!(path = %entry.path().display(), error = %error, "could not access file; skipping");
                continue;
            }
        };
        hits.push(FileHit {
            name: entry.file_name().to_string_lossy().into_owned(),
            modified: format_modified(modified),
            path: entry.into_path(),
        });
    }
    hits
}

fn is_excluded(entry: &DirEntry, exclude_markers: &[String]) -> bool {
    if !entry.file_type().is_dir() || exclude_markers.is_empty() {
        return false;
    }
    let path = entry.path().to_string_lossy();
    exclude_markers
        .iter()
        .any(|marker| path.contains(marker.as_str()))
}
