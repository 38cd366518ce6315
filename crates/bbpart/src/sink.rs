//! Opaque observers for prune batches and telemetry.
//!
//! The engine owns the data it emits until the sink call returns; sinks copy
//! what they want to keep. Both traits may be called from the drain-tick
//! thread concurrently with the search, so implementations must be
//! `Send + Sync`. When no sink is attached the engine queues and formats
//! nothing.

use std::time::Duration;

use crate::hypergraph::Partition;

/// One pruned subtree: the depth at which it was cut and the decided prefix
/// that roots it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PruneEvent {
    /// Depth of the cut; the subtree held `2^(num_blocks - bid)` leaves.
    pub bid: usize,
    /// Decisions for blocks `0..bid`.
    pub prefix: Vec<Partition>,
}

/// Consumer of pruned-subtree descriptors, e.g. a decision-tree overlay.
pub trait PruneSink: Send + Sync {
    /// Receive a drained batch of prune events.
    fn on_pruned(&self, batch: &[PruneEvent]);
}

/// Consumer of progress counters and the final answer.
pub trait TelemetrySink: Send + Sync {
    /// Cumulative visited/pruned leaf counts and the current best cut
    /// (`-1` while unknown). The counts are advisory: they are sampled with
    /// relaxed ordering while workers run.
    fn on_telemetry(&self, visited: u64, pruned: u64, best_cut: i64);

    /// The winning assignment and the wall time of the run. Called once, at
    /// the end, and only when at least one leaf was reached.
    fn on_best(&self, assignment: &[Partition], wall_time: Duration);
}
