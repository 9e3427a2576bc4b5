#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Flags well diagrams that predate the well's abandonment.
//!
//! Statuses come from a [`WellStatusSource`]; the shipped implementation reads an
//! exported CSV report.

pub mod check;
pub mod dates;
pub mod error;
pub mod source;

pub use check::{AbandonmentFinding, check_abandonment, write_findings_csv};
pub use dates::{REPORT_DATE_FORMATS, parse_report_date};
pub use error::{AbandonError, AbandonResult};
pub use source::{CsvWellStatusSource, WellStatus, WellStatusSource};
