//! One node of the decision tree.

use crate::cost::{extend_crossing, initial_crossing};
use crate::error::SearchError;
use crate::hypergraph::{Assignment, Hypergraph, Partition};

/// A partial assignment with its cached cut state.
///
/// Blocks `[0..bid)` are decided, everything after is unassigned. The per-net
/// crossing flags and their sum are materialized at construction and kept in
/// step by [`SearchNode::extend`]; nothing on the stack ever carries an
/// unknown cut. Nodes are value types: `extend` copies, and a node is never
/// mutated once pushed.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub assignment: Assignment,
    /// Next block to decide; equals the block count at a leaf.
    pub bid: usize,
    /// Blocks decided into partition A.
    pub count_a: u64,
    /// Blocks decided into partition B.
    pub count_b: u64,
    /// Per-net crossing flags under `assignment`.
    pub crossing: Vec<bool>,
    /// Sum of `crossing`.
    pub cut: u32,
}

impl SearchNode {
    /// Build a subtree root from a pre-assigned prefix.
    ///
    /// The partition counts are derived by counting the prefix entries, and
    /// the cut state comes from one full recompute; this is the only full
    /// recompute a worker performs outside sanity-check mode.
    pub fn root(
        h: &Hypergraph,
        assignment: Assignment,
        bid: usize,
    ) -> Result<SearchNode, SearchError> {
        let mut count_a = 0;
        let mut count_b = 0;
        for (i, slot) in assignment.iter().take(bid).enumerate() {
            match slot {
                Some(Partition::A) => count_a += 1,
                Some(Partition::B) => count_b += 1,
                None => return Err(SearchError::UnassignedBlock { bid: i }),
            }
        }
        let (crossing, cut) = initial_crossing(h, &assignment);
        Ok(SearchNode {
            assignment,
            bid,
            count_a,
            count_b,
            crossing,
            cut,
        })
    }

    /// Copy-construct the child that decides the next block into `part`.
    pub fn extend(&self, h: &Hypergraph, part: Partition) -> SearchNode {
        let (delta, crossing) = extend_crossing(h, &self.assignment, &self.crossing, self.bid, part);
        let mut assignment = self.assignment.clone();
        assignment[self.bid] = Some(part);
        let (count_a, count_b) = match part {
            Partition::A => (self.count_a + 1, self.count_b),
            Partition::B => (self.count_a, self.count_b + 1),
        };
        SearchNode {
            assignment,
            bid: self.bid + 1,
            count_a,
            count_b,
            crossing,
            cut: self.cut + delta,
        }
    }

    /// The decided prefix as concrete partitions.
    pub fn prefix(&self) -> Result<Vec<Partition>, SearchError> {
        self.assignment
            .iter()
            .take(self.bid)
            .enumerate()
            .map(|(i, slot)| slot.ok_or(SearchError::UnassignedBlock { bid: i }))
            .collect()
    }
}
