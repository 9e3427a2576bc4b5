//! Well-diagram (WBD) indexing: PDFs whose names start with a 10-digit API.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wellfile_config::IndexPolicy;

use crate::error::{IndexError, Result};
use crate::walk::walk_root;

const API_PATTERN: &str = r"^(\d{10})";

/// One indexed well diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbdEntry {
    /// Leading 10-digit API.
    pub api: String,
    /// File name.
    pub filename: String,
    /// Full path.
    pub path: String,
    /// Local modification time, `%Y-%m-%d %H:%M:%S`.
    pub modified: String,
}

/// Result of a diagram index run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WbdIndex {
    /// Matching diagrams, sorted by path.
    pub entries: Vec<WbdEntry>,
    /// Roots that did not exist.
    pub skipped_roots: Vec<PathBuf>,
}

/// Applies the diagram filters from an [`IndexPolicy`].
#[derive(Debug, Clone)]
pub struct WbdIndexer {
    api_pattern: Regex,
    policy: IndexPolicy,
}

impl WbdIndexer {
    /// Build an indexer for `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API pattern fails to compile.
    pub fn new(policy: &IndexPolicy) -> Result<Self> {
        let api_pattern = Regex::new(API_PATTERN).map_err(|source| IndexError::RegexCompile {
            pattern: API_PATTERN,
            source,
        })?;
        Ok(Self {
            api_pattern,
            policy: policy.clone(),
        })
    }

    /// Index every accepted diagram under `roots`.
    #[must_use]
    pub fn index(&self, roots: &[PathBuf]) -> WbdIndex {
        let mut index = WbdIndex::default();
        for root in roots {
            if !root.is_dir() {
                warn!(root = %root.display(), "folder not found; skipping");
                index.skipped_roots.push(root.clone());
                continue;
            }
            let before = index.entries.len();
            for hit in walk_root(root, &self.policy.exclude_dir_markers) {
                let Some(api) = self.api_for(&hit.name) else {
                    continue;
                };
                debug!(api = %api, file = %hit.name, "diagram found");
                index.entries.push(WbdEntry {
                    api,
                    filename: hit.name,
                    path: hit.path.display().to_string(),
                    modified: hit.modified,
                });
            }
            info!(
                root = %root.display(),
                diagrams = index.entries.len() - before,
                "folder indexed"
            );
        }
        index.entries.sort_by(|a, b| a.path.cmp(&b.path));
        index
    }

    /// The API of `file_name` when it passes every diagram filter.
    #[must_use]
    pub fn api_for(&self, file_name: &str) -> Option<String> {
        let extension_matches = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.policy.extension));
        if !extension_matches || file_name.chars().count() > self.policy.max_file_name_len {
            return None;
        }
        self.api_pattern
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .map(|api| api.as_str().to_string())
    }
}
