//! Command handlers grouped by concern.

pub(crate) mod abandon;
pub(crate) mod copy;
pub(crate) mod index;
