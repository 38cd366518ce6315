//! Timing probe for the engine on a deterministic grid problem.
//!
//! Purpose
//! - Provide a quick, reproducible data point for "how long does an exact
//!   run on an n-block problem take, and what does a second worker buy?"
//!   without reaching for the full benchmark harness.

use std::time::Instant;

use bbpart::{Hypergraph, Partitioner, Settings};

/// 4x5 grid of blocks with one two-pin net per adjacent pair.
fn grid(rows: u32, cols: u32) -> Hypergraph {
    let mut nets = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let b = r * cols + c;
            if c + 1 < cols {
                nets.push(vec![b, b + 1]);
            }
            if r + 1 < rows {
                nets.push(vec![b, b + cols]);
            }
        }
    }
    Hypergraph::new((rows * cols) as usize, nets)
}

fn main() {
    let h = grid(4, 5);
    println!(
        "grid problem: {} blocks, {} nets",
        h.num_blocks(),
        h.num_nets()
    );

    for threads in [1, 2, 4] {
        let settings = Settings {
            threads,
            headless: true,
            ..Settings::default()
        };
        let partitioner = Partitioner::new(h.clone(), settings);
        let start = Instant::now();
        let results = partitioner.run().expect("run completes");
        let best = results.best.expect("a complete run always has a best");
        println!(
            "threads={threads}: cut={} visited={} pruned={} in {:.1} ms",
            best.cut_size,
            results.visited_leaves,
            results.pruned_leaves,
            start.elapsed().as_secs_f64() * 1e3,
        );
    }
}
