#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Folder and well-diagram indexers that emit JSON and CSV catalogs.
//!
//! # Design
//! - Pure library surface used by the CLI; callers choose every output path.
//! - Missing roots and unreadable files are skipped with a warning, never fatal.
//! - Only writing outputs and reading the folder catalog can fail a run.

pub mod error;
pub mod files;
pub mod folders;
pub mod output;
pub mod wbd;
mod walk;

pub use error::{IndexError, Result};
pub use files::{FileEntry, FileIndex, index_files};
pub use folders::{CatalogRun, IndexedFolder, SkippedFolder, index_catalog, sanitize_name};
pub use output::{csv_sibling, write_csv, write_json};
pub use wbd::{WbdEntry, WbdIndex, WbdIndexer};
pub use walk::{MODIFIED_FORMAT, format_modified};
