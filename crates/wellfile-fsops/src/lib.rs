#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! Resolve well identifiers (or plain file names) to the newest matching file
//! across a set of source trees and copy each winner into a destination folder.
//!
//! Layout: `parse.rs` (input classification), `scan.rs` (tree walking),
//! `copy.rs` (staged copies), `run_log.rs` (per-run logs), `service.rs` (the pipeline).

pub mod copy;
pub mod error;
pub mod model;
pub mod parse;
pub mod run_log;
pub mod scan;
pub mod service;

pub use error::{FsOpsError, FsOpsResult};
pub use model::{
    Candidate, Identifier, MatchMode, OutcomeRecord, OutcomeStatus, RunReport, RunSummary, Task,
    TaskKey, WellFileDate,
};
pub use parse::{ParsedInput, parse_inputs, read_input_list};
pub use run_log::{LOG_TIME_FORMAT, read_copied_dates, write_run_log};
pub use service::{ResolveRequest, ResolverService};
