//! Worker planning, spawning, and result aggregation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::hypergraph::{Assignment, Hypergraph, Partition};
use crate::search::node::SearchNode;
use crate::search::worker::{RunShared, Worker, WorkerOutput};
use crate::settings::Settings;
use crate::sink::{PruneEvent, PruneSink, TelemetrySink};

/// Splitting deeper than this never pays off; the clamp also keeps the
/// power-of-two arithmetic clear of shift overflow for large block counts.
const MAX_SPLIT_DEPTH: usize = 16;

/// Winning side assignment and its cut size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestCut {
    pub cut_size: u32,
    pub assignment: Vec<Partition>,
}

/// Outcome of one run.
#[derive(Clone, Debug)]
pub struct Results {
    /// `None` only when the run was cancelled before any leaf completed.
    pub best: Option<BestCut>,
    pub visited_leaves: u64,
    pub pruned_leaves: u64,
    pub wall_time: Duration,
}

/// Cooperative stop request for a running partitioner.
///
/// Workers check the token at the top of their loop; on observing it they
/// publish whatever local best they hold and exit.
#[derive(Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The branch-and-bound coordinator.
///
/// Owns the problem and the run configuration, decides the worker count,
/// hands each worker a static subtree, and merges the per-worker results.
pub struct Partitioner {
    graph: Hypergraph,
    settings: Settings,
    stop: Arc<AtomicBool>,
    prune_sink: Option<Arc<dyn PruneSink>>,
    telemetry_sink: Option<Arc<dyn TelemetrySink>>,
}

impl Partitioner {
    pub fn new(graph: Hypergraph, settings: Settings) -> Self {
        Self {
            graph,
            settings,
            stop: Arc::new(AtomicBool::new(false)),
            prune_sink: None,
            telemetry_sink: None,
        }
    }

    pub fn graph(&self) -> &Hypergraph {
        &self.graph
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Token for requesting cancellation from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken(Arc::clone(&self.stop))
    }

    /// Attach a consumer of pruned-subtree batches.
    pub fn set_prune_sink(&mut self, sink: Arc<dyn PruneSink>) {
        self.prune_sink = Some(sink);
    }

    /// Attach a consumer of progress counters and the final answer.
    pub fn set_telemetry_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.telemetry_sink = Some(sink);
    }

    /// Run the search to completion (or cancellation) and return the merged
    /// results.
    pub fn run(&self) -> Result<Results, SearchError> {
        let start = Instant::now();
        let num_blocks = self.graph.num_blocks();
        if num_blocks == 0 {
            return Ok(Results {
                best: Some(BestCut {
                    cut_size: 0,
                    assignment: Vec::new(),
                }),
                visited_leaves: 0,
                pruned_leaves: 0,
                wall_time: start.elapsed(),
            });
        }

        let (threads, split_depth) = self.plan_threads();
        let pin_first = self.settings.prune_half && threads > 1;
        debug!(threads, split_depth, pin_first, "planned worker split");
        let roots = self.worker_roots(threads, split_depth, pin_first)?;

        let enqueue_prunes =
            self.prune_sink.is_some() && !self.settings.no_dtv && !self.settings.headless;
        let shared = RunShared::new(
            self.settings.clone(),
            enqueue_prunes,
            Arc::clone(&self.stop),
            threads,
        );
        if pin_first {
            self.account_mirror_half(&shared);
        }

        let run_tick = !self.settings.headless
            && (self.prune_sink.is_some() || self.telemetry_sink.is_some());
        let tick = if num_blocks >= 70 {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(10)
        };

        let graph = &self.graph;
        let shared_ref = &shared;
        let outputs = thread::scope(|scope| -> Result<Vec<WorkerOutput>, SearchError> {
            let handles: Vec<_> = roots
                .into_iter()
                .enumerate()
                .map(|(tid, root)| scope.spawn(move || Worker::new(tid, graph, shared_ref).run(root)))
                .collect();
            let drain = run_tick.then(|| {
                scope.spawn(move || {
                    while !shared_ref.done.load(Ordering::Acquire) {
                        thread::sleep(tick);
                        self.drain(shared_ref, false);
                    }
                })
            });

            let mut first_err = None;
            let mut outputs = Vec::with_capacity(handles.len());
            for (tid, handle) in handles.into_iter().enumerate() {
                let result = handle
                    .join()
                    .unwrap_or_else(|_| Err(SearchError::WorkerPanic { tid }));
                match result {
                    Ok(output) => outputs.push(output),
                    Err(err) => {
                        if first_err.is_none() {
                            // Cut the remaining workers short; the run is lost.
                            self.stop.store(true, Ordering::Relaxed);
                            first_err = Some(err);
                        }
                    }
                }
            }
            shared_ref.done.store(true, Ordering::Release);
            if let Some(handle) = drain {
                let _ = handle.join();
            }
            first_err.map_or(Ok(outputs), Err)
        })?;

        // Final flush regardless of batch size.
        self.drain(&shared, true);

        let visited_leaves: u64 = shared
            .slots
            .iter()
            .map(|s| s.visited.load(Ordering::Relaxed))
            .sum();
        let pruned_leaves: u64 = shared
            .slots
            .iter()
            .map(|s| s.pruned.load(Ordering::Relaxed))
            .sum();

        // Lowest worker index wins ties, so scan in order with a strict
        // comparison.
        let mut best: Option<BestCut> = None;
        for output in outputs {
            if let Some((cut_size, assignment)) = output.best {
                let better = match &best {
                    Some(current) => cut_size < current.cut_size,
                    None => true,
                };
                if better {
                    best = Some(BestCut {
                        cut_size,
                        assignment,
                    });
                }
            }
        }

        let wall_time = start.elapsed();
        if let (Some(sink), Some(win)) = (&self.telemetry_sink, &best) {
            sink.on_best(&win.assignment, wall_time);
        }
        info!(
            best_cut = best.as_ref().map_or(-1, |b| i64::from(b.cut_size)),
            visited_leaves,
            pruned_leaves,
            wall_ms = wall_time.as_millis() as u64,
            "partitioning run finished"
        );
        Ok(Results {
            best,
            visited_leaves,
            pruned_leaves,
            wall_time,
        })
    }

    /// Clamp the requested thread count to the hardware and the tree, then
    /// snap it down to a power of two.
    fn plan_threads(&self) -> (usize, usize) {
        let num_blocks = self.graph.num_blocks();
        let requested = self.settings.threads.max(1);
        if !requested.is_power_of_two() {
            warn!(requested, "thread count is not a power of two; snapping down");
        }
        let hardware = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let tree = if num_blocks >= 2 {
            1usize << (num_blocks - 2).min(MAX_SPLIT_DEPTH)
        } else {
            1
        };
        let clamped = requested.min(hardware).min(tree);
        let split_depth = clamped.ilog2() as usize;
        if num_blocks <= split_depth {
            return (1, 0);
        }
        (1 << split_depth, split_depth)
    }

    /// Build each worker's root by binary-counting the worker index into the
    /// leading blocks. With the mirror prune active, block 0 is pinned to
    /// partition A so every worker stays in the surviving half of the tree,
    /// and the counting shifts down by one position.
    fn worker_roots(
        &self,
        threads: usize,
        split_depth: usize,
        pin_first: bool,
    ) -> Result<Vec<SearchNode>, SearchError> {
        let num_blocks = self.graph.num_blocks();
        let offset = usize::from(pin_first);
        let prefix_len = if threads == 1 { 0 } else { split_depth + offset };
        (0..threads)
            .map(|tid| {
                let mut assignment: Assignment = vec![None; num_blocks];
                if pin_first {
                    assignment[0] = Some(Partition::A);
                }
                for j in 0..split_depth {
                    let bit = (tid >> (split_depth - 1 - j)) & 1;
                    assignment[offset + j] = Some(if bit == 0 {
                        Partition::A
                    } else {
                        Partition::B
                    });
                }
                SearchNode::root(&self.graph, assignment, prefix_len)
            })
            .collect()
    }

    /// Account the mirrored half of the tree once, to worker 0, when no
    /// worker will ever walk into it.
    fn account_mirror_half(&self, shared: &RunShared) {
        let num_blocks = self.graph.num_blocks();
        if !self.settings.no_pie {
            shared.slots[0]
                .pruned
                .fetch_add(1u64 << (num_blocks - 1), Ordering::Relaxed);
        }
        if shared.enqueue_prunes {
            shared.slots[0]
                .queue
                .lock()
                .expect("prune queue mutex poisoned")
                .push(PruneEvent {
                    bid: 1,
                    prefix: vec![Partition::B],
                });
        }
        debug!("mirrored half of the tree accounted to worker 0");
    }

    /// Forward queued prune batches and a telemetry sample to the sinks.
    fn drain(&self, shared: &RunShared, emit_all: bool) {
        if let Some(sink) = &self.prune_sink {
            for slots in &shared.slots {
                let batch = {
                    let mut queue = slots.queue.lock().expect("prune queue mutex poisoned");
                    if queue.is_empty()
                        || (!emit_all && queue.len() < self.settings.gui_update_batch)
                    {
                        continue;
                    }
                    std::mem::take(&mut *queue)
                };
                sink.on_pruned(&batch);
            }
        }
        if let Some(sink) = &self.telemetry_sink {
            let visited = shared
                .slots
                .iter()
                .map(|s| s.visited.load(Ordering::Relaxed))
                .sum();
            let pruned = shared
                .slots
                .iter()
                .map(|s| s.pruned.load(Ordering::Relaxed))
                .sum();
            sink.on_telemetry(visited, pruned, shared.bound.peek());
        }
    }
}
