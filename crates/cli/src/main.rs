//! Command-line front end: single headless runs and the benchmark sweep.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bbpart::{Partitioner, Settings};

mod bench;
mod problem;

#[derive(Parser)]
#[command(name = "bbpart")]
#[command(about = "Exact branch-and-bound bipartitioning of block/net hypergraphs")]
struct Cmd {
    /// Problem file to partition (required unless --benchmark is given)
    in_file: Option<PathBuf>,

    /// Upper bound on worker threads (snapped down to a power of two)
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Per-prune and per-leaf diagnostic output
    #[arg(long)]
    verbose: bool,

    /// Recompute the cut from scratch at every node and compare it against
    /// the incremental value
    #[arg(long = "sanity_check")]
    sanity_check: bool,

    /// Run the benchmark sweep instead of a single problem
    #[arg(long)]
    benchmark: bool,

    /// JSON settings applied to every benchmark run
    #[arg(long = "bench_settings_in")]
    bench_settings_in: Option<PathBuf>,

    /// Directory holding the benchmark problem files
    #[arg(long = "bench_dir", default_value = "benchmarks")]
    bench_dir: PathBuf,

    /// Where benchmark statistics are written
    #[arg(long = "json_out", default_value = "bench_results.json")]
    json_out: PathBuf,

    /// Repeat each benchmark this many times
    #[arg(long, default_value_t = 5)]
    repeat: usize,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let default_filter = if cmd.verbose { "info,bbpart=trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if cmd.benchmark {
        return bench::run(
            &cmd.bench_dir,
            &cmd.json_out,
            cmd.repeat,
            cmd.bench_settings_in.as_deref(),
        );
    }

    let in_file = cmd
        .in_file
        .context("an input problem file is required unless --benchmark is given")?;
    let graph = problem::load(&in_file)?;
    info!(
        blocks = graph.num_blocks(),
        nets = graph.num_nets(),
        "problem loaded"
    );

    let settings = Settings {
        threads: cmd.threads,
        verbose: cmd.verbose,
        sanity_check: cmd.sanity_check,
        headless: true,
        ..Settings::default()
    };
    let results = Partitioner::new(graph, settings).run()?;
    let best = results
        .best
        .context("run finished without reaching a leaf")?;
    info!(
        visited_leaves = results.visited_leaves,
        pruned_leaves = results.pruned_leaves,
        wall_time_ms = results.wall_time.as_millis() as u64,
        "partitioning finished"
    );
    println!("best cut size: {}", best.cut_size);
    Ok(())
}
