//! Output formats.

pub mod lua;

/// Number of rows after which a progress message is logged.
pub(crate) const PROGRESS_NOTIFY_INCREMENT: u64 = 100_000;
