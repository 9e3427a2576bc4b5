//! Plain file catalogs: every file under a set of roots.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::walk::walk_root;

/// One catalogued file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Local modification time, `%Y-%m-%d %H:%M:%S`.
    pub modified: String,
}

/// Result of cataloguing a set of roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileIndex {
    /// Files in discovery order.
    pub entries: Vec<FileEntry>,
    /// Roots that did not exist.
    pub skipped_roots: Vec<PathBuf>,
}

/// Catalog every regular file under `roots`.
#[must_use]
pub fn index_files(roots: &[PathBuf]) -> FileIndex {
    let mut index = FileIndex::default();
    for root in roots {
        if !root.is_dir() {
            warn!(root = %root.display(), "folder not found; skipping");
            index.skipped_roots.push(root.clone());
            continue;
        }
        let before = index.entries.len();
        index
            .entries
            .extend(walk_root(root, &[]).into_iter().map(|hit| FileEntry {
                name: hit.name,
                path: hit.path.display().to_string(),
                modified: hit.modified,
            }));
        info!(
            root = %root.display(),
            files = index.entries.len() - before,
            "folder catalogued"
        );
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    #[test]
    fn catalogs_all_files_and_skips_missing_roots() -> Result<()> {
        let root = temp_dir("files")?;
        write_file(&root.path().join("a.txt"), "a")?;
        write_file(&root.path().join("sub/b.pdf"), "b")?;
        let missing = root.path().join("missing");

        let index = index_files(&[missing.clone(), root.path().to_path_buf()]);

        assert_eq!(index.skipped_roots, vec![missing]);
        let mut names: Vec<_> = index.entries.iter().map(|entry| entry.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.pdf"]);
        let nested = index
            .entries
            .iter()
            .find(|entry| entry.name == "b.pdf")
            .map(|entry| entry.path.clone())
            .unwrap_or_default();
        assert!(nested.ends_with("b.pdf"));
        assert!(nested.contains("sub"));
        Ok(())
    }
}
