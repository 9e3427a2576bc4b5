//! Default values applied when a configuration document omits a field.

/// Directory-name fragment that marks a subtree as excluded from diagram indexing.
pub const DEFAULT_EXCLUDE_MARKER: &str = "Don't use";
/// Longest file name (in characters) accepted by the diagram indexer.
pub const DEFAULT_MAX_FILE_NAME_LEN: usize = 20;
/// Extension (without the dot) of well-diagram files.
pub const DEFAULT_EXTENSION: &str = "pdf";
