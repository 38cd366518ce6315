//! Criterion microbenches for the partitioning engine (group "search").
//!
//! - Full engine runs on a deterministic grid problem, single- and
//!   multi-threaded.
//! - The two cost paths in isolation: full recompute and one-block extension.
//!
//! The grid problem is fixed so runs are stable; no randomness anywhere.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use bbpart::cost::{calc_cost, extend_crossing, initial_crossing};
use bbpart::{Hypergraph, Partition, Partitioner, Settings};

/// `rows x cols` grid of blocks with one two-pin net per adjacent pair.
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

fn headless(threads: usize) -> Settings {
    Settings {
        threads,
        headless: true,
        ..Settings::default()
    }
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let h = grid(4, 4);
    group.bench_function("grid4x4_1_thread", |b| {
        b.iter_batched(
            || Partitioner::new(h.clone(), headless(1)),
            |p| p.run().unwrap(),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("grid4x4_4_threads", |b| {
        b.iter_batched(
            || Partitioner::new(h.clone(), headless(4)),
            |p| p.run().unwrap(),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cost_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let h = grid(4, 4);
    let n = h.num_blocks();
    // A half-decided assignment, alternating sides.
    let assignment: Vec<Option<Partition>> = (0..n)
        .map(|b| {
            (b < n / 2).then(|| {
                if b % 2 == 0 {
                    Partition::A
                } else {
                    Partition::B
                }
            })
        })
        .collect();
    let (crossing, _) = initial_crossing(&h, &assignment);

    group.bench_function("calc_cost_full", |b| {
        b.iter(|| calc_cost(&h, &assignment))
    });
    group.bench_function("extend_one_block", |b| {
        b.iter(|| extend_crossing(&h, &assignment, &crossing, n / 2, Partition::A))
    });
    group.finish();
}

criterion_group!(benches, bench_engine, bench_cost_paths);
criterion_main!(benches);
