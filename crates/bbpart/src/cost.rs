//! Cut-cost evaluation.
//!
//! A net crosses when it has at least one member in each partition;
//! unassigned members do not contribute. The cut size of an assignment is the
//! number of crossing nets. Two evaluation paths exist: the full recompute,
//! used once to seed a worker's root node and in sanity-check mode, and the
//! incremental extension, which touches only the nets of the block being
//! decided and is the only cost computation on the hot path.

use crate::hypergraph::{Hypergraph, Partition};

/// Whether net `nid` has members in both partitions under `assignment`.
pub fn net_crosses(h: &Hypergraph, nid: u32, assignment: &[Option<Partition>]) -> bool {
    let mut in_a = false;
    let mut in_b = false;
    for &bid in h.net(nid) {
        match assignment[bid as usize] {
            Some(Partition::A) => in_a = true,
            Some(Partition::B) => in_b = true,
            None => {}
        }
        if in_a && in_b {
            return true;
        }
    }
    false
}

/// Cut size of `assignment`, recomputed from scratch over every net.
pub fn calc_cost(h: &Hypergraph, assignment: &[Option<Partition>]) -> u32 {
    (0..h.num_nets() as u32)
        .filter(|&nid| net_crosses(h, nid, assignment))
        .count() as u32
}

/// Per-net crossing flags of `assignment`, plus their sum.
///
/// Seeds a search root; everything after that goes through
/// [`extend_crossing`].
pub fn initial_crossing(h: &Hypergraph, assignment: &[Option<Partition>]) -> (Vec<bool>, u32) {
    let crossing: Vec<bool> = (0..h.num_nets() as u32)
        .map(|nid| net_crosses(h, nid, assignment))
        .collect();
    let cut = crossing.iter().filter(|&&c| c).count() as u32;
    (crossing, cut)
}

/// Cut delta and updated per-net flags for deciding block `bid` into `part`.
///
/// `assignment` is the parent assignment, with `bid` still undecided and
/// `crossing` its per-net flags. A net already crossing stays crossing. A net
/// of `bid` that is not yet crossing starts to cross exactly when one of its
/// already-assigned members sits on the opposite side.
pub fn extend_crossing(
    h: &Hypergraph,
    assignment: &[Option<Partition>],
    crossing: &[bool],
    bid: usize,
    part: Partition,
) -> (u32, Vec<bool>) {
    let other = Some(part.opposite());
    let mut child = crossing.to_vec();
    let mut delta = 0;
    for &nid in h.block_nets(bid) {
        if child[nid as usize] {
            continue;
        }
        if h.net(nid).iter().any(|&b| assignment[b as usize] == other) {
            child[nid as usize] = true;
            delta += 1;
        }
    }
    (delta, child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::hypergraph::Partition::{A, B};

    fn assigned(parts: &[Option<Partition>]) -> Vec<Option<Partition>> {
        parts.to_vec()
    }

    #[test]
    fn unassigned_members_do_not_cross() {
        let h = Hypergraph::new(3, vec![vec![0, 1, 2]]);
        assert!(!net_crosses(&h, 0, &assigned(&[Some(A), None, None])));
        assert!(!net_crosses(&h, 0, &assigned(&[Some(A), Some(A), None])));
        assert!(net_crosses(&h, 0, &assigned(&[Some(A), Some(B), None])));
    }

    #[test]
    fn calc_cost_counts_crossing_nets() {
        let h = Hypergraph::new(4, vec![vec![0, 1], vec![2, 3], vec![0, 3]]);
        // 0,1 -> A; 2,3 -> B: only the {0,3} net crosses.
        let full = assigned(&[Some(A), Some(A), Some(B), Some(B)]);
        assert_eq!(calc_cost(&h, &full), 1);
        // Everything on one side: nothing crosses.
        let mono = assigned(&[Some(A), Some(A), Some(A), Some(A)]);
        assert_eq!(calc_cost(&h, &mono), 0);
    }

    #[test]
    fn extension_delta_matches_full_recompute() {
        let h = Hypergraph::new(
            6,
            vec![vec![0, 1, 2], vec![2, 3], vec![3, 4, 5], vec![0, 5], vec![1, 4]],
        );
        let mut assignment: Vec<Option<Partition>> = vec![None; 6];
        let (mut crossing, mut cut) = initial_crossing(&h, &assignment);
        assert_eq!(cut, 0);
        for (bid, part) in [(0, A), (1, B), (2, A), (3, B), (4, A), (5, B)] {
            let (delta, child) = extend_crossing(&h, &assignment, &crossing, bid, part);
            assignment[bid] = Some(part);
            cut += delta;
            crossing = child;
            assert_eq!(cut, calc_cost(&h, &assignment), "after deciding block {bid}");
        }
    }

    #[test]
    fn random_decision_sequences_agree_with_reference() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let num_blocks = rng.gen_range(2..=10);
            let num_nets = rng.gen_range(1..=12);
            let nets: Vec<Vec<u32>> = (0..num_nets)
                .map(|_| {
                    let arity = rng.gen_range(1..=num_blocks);
                    let mut members: Vec<u32> = (0..num_blocks as u32).collect();
                    for i in (1..members.len()).rev() {
                        members.swap(i, rng.gen_range(0..=i));
                    }
                    members.truncate(arity);
                    members
                })
                .collect();
            let h = Hypergraph::new(num_blocks, nets);

            let mut assignment: Vec<Option<Partition>> = vec![None; num_blocks];
            let (mut crossing, mut cut) = initial_crossing(&h, &assignment);
            for bid in 0..num_blocks {
                let part = if rng.gen_bool(0.5) { A } else { B };
                let (delta, child) = extend_crossing(&h, &assignment, &crossing, bid, part);
                assignment[bid] = Some(part);
                cut += delta;
                crossing = child;
                assert_eq!(cut, calc_cost(&h, &assignment));
                // The per-net flags must agree with the definition, not just the sum.
                for nid in 0..h.num_nets() as u32 {
                    assert_eq!(crossing[nid as usize], net_crosses(&h, nid, &assignment));
                }
            }
        }
    }

    #[test]
    fn crossing_is_monotone_under_extension() {
        let h = Hypergraph::new(4, vec![vec![0, 1, 2, 3], vec![1, 2]]);
        let assignment = assigned(&[Some(A), Some(B), None, None]);
        let (crossing, cut) = initial_crossing(&h, &assignment);
        for part in [A, B] {
            let (delta, child) = extend_crossing(&h, &assignment, &crossing, 2, part);
            assert!(cut + delta >= cut);
            for nid in 0..h.num_nets() {
                assert!(child[nid] >= crossing[nid], "net {nid} stopped crossing");
            }
        }
    }
}
