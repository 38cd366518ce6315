//! Fatal search conditions.

use thiserror::Error;

/// Conditions that abort a run.
///
/// These are invariant violations, not user errors: a decided prefix must
/// never contain an unassigned block, and the incremental cut must always
/// agree with the full recompute when sanity checking is on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A block inside the decided prefix `[0..bid)` carried no partition.
    #[error("block inside the decided prefix up to {bid} is unassigned")]
    UnassignedBlock { bid: usize },

    /// Sanity-check mode found the incremental cut out of step with the full
    /// recompute.
    #[error("incremental cut {incremental} disagrees with full recompute {full} at depth {bid}")]
    SanityCheck {
        bid: usize,
        incremental: u32,
        full: u32,
    },

    /// A worker thread panicked.
    #[error("worker {tid} panicked")]
    WorkerPanic { tid: usize },
}
