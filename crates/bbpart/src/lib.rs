//! Exact hypergraph bipartitioning by parallel branch and bound.
//!
//! Purpose
//! - Given an undirected hypergraph of blocks connected by nets, assign every
//!   block to one of two partitions so that the partition sizes differ by at
//!   most one and the number of nets with blocks on both sides (the cut size)
//!   is minimal. The answer is exact: the engine walks the full binary
//!   decision tree of depth `|blocks|`, pruned by balance, mirror symmetry,
//!   and the best-known bound.
//!
//! Architecture
//! - [`hypergraph`]: the immutable problem representation with O(1) access to
//!   both directions of the block/net incidence relation.
//! - [`cost`]: the cut evaluator, both the full recompute and the incremental
//!   one-block extension used on the hot path.
//! - [`search`]: explicit-stack depth-first workers, the coordinator that
//!   splits the top of the tree among a power-of-two number of workers, and
//!   the shared best-cost bound.
//! - [`sink`]: opaque observers for prune batches and telemetry. The engine
//!   runs headless without them; nothing is queued or formatted when no sink
//!   is attached.
//!
//! Notes
//! - The decision tree has `2^|blocks|` leaves, so problems beyond roughly 30
//!   blocks are out of reach by design; the point of the engine is exactness
//!   on small instances, not scale.
//! - The optimal cut value is deterministic across worker counts. Event order
//!   (telemetry, prune batches) is not.

pub mod cost;
pub mod hypergraph;
pub mod search;
pub mod sink;

mod error;
mod settings;

pub use error::SearchError;
pub use hypergraph::{Assignment, Hypergraph, Partition};
pub use search::{BestCut, CancelToken, Partitioner, Results};
pub use settings::Settings;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
