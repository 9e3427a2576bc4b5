#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Shared test helpers used across the wellfile crates.
//! Layout: fixtures.rs (temp trees, files with pinned modification times, permission probes).

pub mod fixtures;
