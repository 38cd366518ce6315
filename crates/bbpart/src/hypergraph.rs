//! Immutable hypergraph of blocks and nets.
//!
//! Blocks are dense indices `0..num_blocks`, nets are dense indices
//! `0..num_nets`, and each net is the list of blocks it connects. The inverse
//! index (nets per block) is derived at construction so the search can walk
//! the incidence relation in both directions without scanning.

use tracing::warn;

/// One of the two sides a block can be assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Side 0.
    A,
    /// Side 1.
    B,
}

impl Partition {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Partition::A => Partition::B,
            Partition::B => Partition::A,
        }
    }

    /// Numeric label, 0 for [`Partition::A`] and 1 for [`Partition::B`].
    pub fn bit(self) -> u8 {
        match self {
            Partition::A => 0,
            Partition::B => 1,
        }
    }
}

/// Block-to-partition record; `None` marks a block that is not yet assigned.
pub type Assignment = Vec<Option<Partition>>;

/// Problem hypergraph. Read-only after construction and freely shareable
/// across worker threads.
#[derive(Clone, Debug)]
pub struct Hypergraph {
    /// Member blocks of each net.
    nets: Vec<Vec<u32>>,
    /// Nets containing each block.
    block_nets: Vec<Vec<u32>>,
}

impl Hypergraph {
    /// Build the hypergraph from a parsed net list.
    ///
    /// Every member id must be below `num_blocks`. Empty nets and blocks that
    /// appear in no net are legal but almost certainly input mistakes, so
    /// both are warned about.
    pub fn new(num_blocks: usize, nets: Vec<Vec<u32>>) -> Self {
        let mut block_nets = vec![Vec::new(); num_blocks];
        for (nid, members) in nets.iter().enumerate() {
            if members.is_empty() {
                warn!(net = nid, "net has no member blocks");
            }
            for &bid in members {
                assert!(
                    (bid as usize) < num_blocks,
                    "net {nid} references block {bid} but there are only {num_blocks} blocks"
                );
                block_nets[bid as usize].push(nid as u32);
            }
        }
        if block_nets.iter().any(|nets| nets.is_empty()) {
            warn!("some blocks are not connected to any net");
        }
        Self { nets, block_nets }
    }

    /// Number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.block_nets.len()
    }

    /// Number of nets.
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    /// Member blocks of net `nid`.
    pub fn net(&self, nid: u32) -> &[u32] {
        &self.nets[nid as usize]
    }

    /// Nets containing block `bid`.
    pub fn block_nets(&self, bid: usize) -> &[u32] {
        &self.block_nets[bid]
    }

    /// Maximum block count either partition may hold: `ceil(num_blocks / 2)`.
    pub fn partition_capacity(&self) -> u64 {
        (self.num_blocks() as u64 + 1) / 2
    }
}
