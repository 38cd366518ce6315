//! Parallel branch-and-bound over the binary decision tree.
//!
//! Purpose
//! - Walk every balanced assignment of blocks to two partitions and return
//!   one with minimal cut, pruning subtrees that cannot contain a better
//!   leaf.
//!
//! Shape of the search
//! - Each node of the tree fixes the partition of one more block; a leaf is a
//!   complete assignment. Workers run an explicit LIFO stack of search nodes
//!   rather than recursing: tree depth equals the block count, per-node state
//!   is the thing the incremental cost update needs, and a stack makes the
//!   copy-on-push lifetime obvious.
//! - The coordinator splits the top of the tree among a power-of-two number
//!   of workers by pre-assigning the first few blocks, then merges the
//!   per-worker results. Workers share only the best-known bound (a mutex,
//!   taken once per leaf) and their prune/telemetry slots.
//!
//! Pruning rules
//! - Balance: a side that already exceeds `ceil(|blocks|/2)` can never reach
//!   a balanced leaf.
//! - Mirror: swapping partition labels maps the half of the tree with block 0
//!   in partition B onto the half with block 0 in partition A, so the B half
//!   can be discarded wholesale.
//! - Bound: the cut only grows as blocks are decided, so a partial cut above
//!   the best completed cut is hopeless. A stale bound only costs extra
//!   exploration, never a wrong answer.

pub mod coordinator;

mod node;
mod worker;

pub use coordinator::{BestCut, CancelToken, Partitioner, Results};
