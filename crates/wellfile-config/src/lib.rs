#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! File-backed configuration for the wellfile tools.
//!
//! Layout: `model.rs` (typed config documents), `defaults.rs` (default values),
//! `validate.rs` (validation helpers), `loader.rs` (reading and writing JSON documents).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{DEFAULT_EXCLUDE_MARKER, DEFAULT_EXTENSION, DEFAULT_MAX_FILE_NAME_LEN};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_catalog, load_config, save_catalog};
pub use model::{
    CopyPolicy, FolderCatalog, FolderEntry, IndexPolicy, IndexedFlag, LoggingSection, RunLogKind,
    WellfileConfig,
};
