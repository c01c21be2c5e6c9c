//! Reporting utilities: run statistics and formatted terminal output.

pub mod format;

pub use format::*;

/// Input-side counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files: usize,
    pub rows_read: usize,
}
