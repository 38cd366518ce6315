//! Depth-first worker and the state it shares with the coordinator.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::error::SearchError;
use crate::hypergraph::{Hypergraph, Partition};
use crate::search::node::SearchNode;
use crate::settings::Settings;
use crate::sink::PruneEvent;

/// The global best-known cut, `-1` while no leaf has completed.
///
/// Writes go through the mutex; the atomic mirror exists for advisory reads
/// by the drain tick. Workers cache the bound locally and refresh the cache
/// on every leaf exchange, so a stale value only means extra exploration.
pub(crate) struct SharedBound {
    value: Mutex<i64>,
    watch: AtomicI64,
}

impl SharedBound {
    pub(crate) fn new() -> Self {
        Self {
            value: Mutex::new(-1),
            watch: AtomicI64::new(-1),
        }
    }

    /// Merge a worker's best leaf cut into the bound and return the merged
    /// value, which is never larger than `local`.
    pub(crate) fn exchange(&self, local: i64) -> i64 {
        let mut value = self.value.lock().expect("bound mutex poisoned");
        if *value < 0 || (local >= 0 && local < *value) {
            *value = local;
            self.watch.store(local, Ordering::Relaxed);
        }
        *value
    }

    /// Advisory read for telemetry.
    pub(crate) fn peek(&self) -> i64 {
        self.watch.load(Ordering::Relaxed)
    }
}

/// Per-worker slots written by the worker and drained by the coordinator.
#[derive(Default)]
pub(crate) struct WorkerSlots {
    pub visited: AtomicU64,
    pub pruned: AtomicU64,
    pub queue: Mutex<Vec<PruneEvent>>,
}

/// State shared by the coordinator, the workers, and the drain tick.
pub(crate) struct RunShared {
    pub settings: Settings,
    /// Whether prune events are queued at all (a prune sink is attached and
    /// neither `no_dtv` nor `headless` suppresses the queue).
    pub enqueue_prunes: bool,
    pub bound: SharedBound,
    pub stop: Arc<AtomicBool>,
    /// Set once all workers have joined; tells the drain tick to exit.
    pub done: AtomicBool,
    pub slots: Vec<WorkerSlots>,
}

impl RunShared {
    pub(crate) fn new(
        settings: Settings,
        enqueue_prunes: bool,
        stop: Arc<AtomicBool>,
        workers: usize,
    ) -> Self {
        Self {
            settings,
            enqueue_prunes,
            bound: SharedBound::new(),
            stop,
            done: AtomicBool::new(false),
            slots: (0..workers).map(|_| WorkerSlots::default()).collect(),
        }
    }
}

/// Best complete assignment a single worker found.
pub(crate) struct WorkerOutput {
    pub best: Option<(u32, Vec<Partition>)>,
}

/// One depth-first worker over a static subtree.
pub(crate) struct Worker<'a> {
    tid: usize,
    h: &'a Hypergraph,
    shared: &'a RunShared,
    /// Local cache of the global bound, refreshed on every leaf exchange.
    cached_best: i64,
    local_best: Option<(u32, Vec<Partition>)>,
    stack: Vec<SearchNode>,
}

impl<'a> Worker<'a> {
    pub(crate) fn new(tid: usize, h: &'a Hypergraph, shared: &'a RunShared) -> Self {
        Self {
            tid,
            h,
            shared,
            cached_best: -1,
            local_best: None,
            stack: Vec::with_capacity(h.num_blocks() + 1),
        }
    }

    /// Explore the subtree under `root` to exhaustion (or cancellation).
    pub(crate) fn run(mut self, root: SearchNode) -> Result<WorkerOutput, SearchError> {
        let num_blocks = self.h.num_blocks();
        let capacity = self.h.partition_capacity();
        let shared = self.shared;
        let settings = &shared.settings;
        self.stack.push(root);

        while let Some(node) = self.stack.pop() {
            if shared.stop.load(Ordering::Relaxed) {
                trace!(tid = self.tid, "worker observed stop request");
                break;
            }

            // Balance: a side past capacity can never reach a balanced leaf.
            if node.count_a > capacity || node.count_b > capacity {
                trace!(tid = self.tid, bid = node.bid, "pruned imbalanced branch");
                self.report_prune(&node)?;
                continue;
            }

            // Mirror: the half with block 0 in partition B repeats the other
            // half with labels swapped.
            if settings.prune_half
                && node.bid == 1
                && node.assignment[0] == Some(Partition::B)
            {
                trace!(tid = self.tid, "pruned mirrored half of the tree");
                self.report_prune(&node)?;
                continue;
            }

            if settings.sanity_check {
                let full = crate::cost::calc_cost(self.h, &node.assignment);
                if full != node.cut {
                    return Err(SearchError::SanityCheck {
                        bid: node.bid,
                        incremental: node.cut,
                        full,
                    });
                }
            }

            // Bound: the cut is monotone in the decided prefix.
            if node.bid < num_blocks
                && settings.prune_by_cost
                && self.cached_best >= 0
                && i64::from(node.cut) > self.cached_best
            {
                trace!(tid = self.tid, bid = node.bid, cut = node.cut, "pruned costly branch");
                self.report_prune(&node)?;
                continue;
            }

            if node.bid == num_blocks {
                self.reach_leaf(&node)?;
                continue;
            }

            // Push B first so A is explored first off the LIFO stack.
            self.stack.push(node.extend(self.h, Partition::B));
            self.stack.push(node.extend(self.h, Partition::A));
        }

        Ok(WorkerOutput {
            best: self.local_best,
        })
    }

    fn reach_leaf(&mut self, node: &SearchNode) -> Result<(), SearchError> {
        trace!(tid = self.tid, cut = node.cut, "leaf reached");
        let improved = match &self.local_best {
            Some((best, _)) => node.cut < *best,
            None => true,
        };
        if improved {
            self.local_best = Some((node.cut, node.prefix()?));
        }
        let local = self
            .local_best
            .as_ref()
            .map(|(cut, _)| i64::from(*cut))
            .unwrap_or(-1);
        self.cached_best = self.shared.bound.exchange(local);
        self.shared.slots[self.tid]
            .visited
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn report_prune(&self, node: &SearchNode) -> Result<(), SearchError> {
        let slots = &self.shared.slots[self.tid];
        if !self.shared.settings.no_pie {
            let leaves = 1u64 << (self.h.num_blocks() - node.bid);
            slots.pruned.fetch_add(leaves, Ordering::Relaxed);
        }
        if self.shared.enqueue_prunes {
            let event = PruneEvent {
                bid: node.bid,
                prefix: node.prefix()?,
            };
            slots
                .queue
                .lock()
                .expect("prune queue mutex poisoned")
                .push(event);
        }
        Ok(())
    }
}
