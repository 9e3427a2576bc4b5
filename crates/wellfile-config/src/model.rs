//! Typed configuration documents.
//!
//! # Design
//! - Every section defaults cleanly so a missing or partial document still loads.
//! - The folder catalog keeps unknown keys so rewriting it never drops user data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{DEFAULT_EXCLUDE_MARKER, DEFAULT_EXTENSION, DEFAULT_MAX_FILE_NAME_LEN};

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WellfileConfig {
    /// Defaults for copy runs.
    pub copy: CopyPolicy,
    /// Settings for the diagram indexer.
    pub index: IndexPolicy,
    /// Logging overrides.
    pub logging: LoggingSection,
}

/// Copy-run policy: where to look, where to write, and how to log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyPolicy {
    /// Source roots, scanned in the listed order.
    pub sources: Vec<PathBuf>,
    /// Destination directory for copied files and the run log.
    pub destination: Option<PathBuf>,
    /// Format of the run log written to the destination.
    pub run_log: RunLogKind,
}

/// Format of the per-run log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunLogKind {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Human-readable lines.
    Text,
}

impl RunLogKind {
    /// File extension used for log files of this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Diagram-indexer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexPolicy {
    /// Directory path fragments that exclude a subtree.
    pub exclude_dir_markers: Vec<String>,
    /// Longest accepted file name, in characters.
    pub max_file_name_len: usize,
    /// Diagram file extension, without the leading dot.
    pub extension: String,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self {
            exclude_dir_markers: vec![DEFAULT_EXCLUDE_MARKER.to_string()],
            max_file_name_len: DEFAULT_MAX_FILE_NAME_LEN,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Logging overrides; command-line flags and `RUST_LOG` take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Level or filter directive.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
}

/// Folder catalog (`folders.json`): roots to index and whether they have been indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderCatalog {
    /// Catalog entries in document order.
    pub folders: Vec<FolderEntry>,
}

impl FolderCatalog {
    /// Entries that still need indexing.
    pub fn pending(&self) -> impl Iterator<Item = &FolderEntry> {
        self.folders
            .iter()
            .filter(|entry| entry.indexed == IndexedFlag::No)
    }
}

/// One folder listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Display name; also names the index file.
    pub name: String,
    /// Root directory to index.
    pub path: PathBuf,
    /// Whether the folder has been indexed.
    #[serde(rename = "Indexed", default)]
    pub indexed: IndexedFlag,
    /// Local timestamp of the last successful index.
    #[serde(
        rename = "Date Indexed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_indexed: Option<String>,
    /// Keys this tool does not interpret, preserved on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Yes`/`No` flag as stored in the catalog document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexedFlag {
    /// Already indexed.
    Yes,
    /// Not yet indexed.
    #[default]
    No,
}
