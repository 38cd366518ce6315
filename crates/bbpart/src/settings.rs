//! Runtime options recognized by the engine.

/// Engine configuration.
///
/// `threads` is an upper bound; the coordinator clamps it to the hardware and
/// to the tree size and snaps it down to a power of two. The remaining
/// options gate the pruning rules and the observer plumbing.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Upper bound on the worker count.
    pub threads: usize,
    /// Prune the mirrored half of the tree (swapping partition labels maps
    /// every solution onto one with block 0 in partition A).
    pub prune_half: bool,
    /// Prune subtrees whose partial cut already exceeds the best known cut.
    pub prune_by_cost: bool,
    /// Minimum pending prune events before a drain tick forwards a batch.
    pub gui_update_batch: usize,
    /// Skip enqueuing prune events for the decision-tree view; pruned-leaf
    /// counters are still kept.
    pub no_dtv: bool,
    /// Skip accumulating pruned-leaf counters.
    pub no_pie: bool,
    /// No drain tick and no prune-event queueing at all.
    pub headless: bool,
    /// Per-prune and per-leaf diagnostic lines (emitted at trace level; the
    /// caller's subscriber filter decides whether they are visible).
    pub verbose: bool,
    /// Recompute the cut from scratch at every node and compare it against
    /// the incremental value; any mismatch aborts the run.
    pub sanity_check: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threads: 1,
            prune_half: true,
            prune_by_cost: true,
            gui_update_batch: 100,
            no_dtv: false,
            no_pie: false,
            headless: false,
            verbose: false,
            sanity_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_both_prunes() {
        let s = Settings::default();
        assert_eq!(s.threads, 1);
        assert!(s.prune_half);
        assert!(s.prune_by_cost);
        assert_eq!(s.gui_update_batch, 100);
        assert!(!s.no_dtv);
        assert!(!s.no_pie);
        assert!(!s.headless);
        assert!(!s.verbose);
        assert!(!s.sanity_check);
    }
}
