//! Benchmark harness: run named problems repeatedly and write the collected
//! statistics as one JSON object.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use bbpart::{Partitioner, Settings};

use crate::problem;

/// Problems the sweep runs, resolved as `<bench_dir>/<name>.txt`. Larger
/// netlists stay out: the exact tree doubles with every block.
pub const BENCH_NAMES: &[&str] = &["cm82a"];

/// Run every benchmark `repeat` times and write the statistics to `json_out`.
///
/// The output file is created up front so an unwritable path fails before
/// any time is spent on the runs.
pub fn run(
    bench_dir: &Path,
    json_out: &Path,
    repeat: usize,
    settings_path: Option<&Path>,
) -> Result<()> {
    let settings = match settings_path {
        Some(path) => read_settings(path)?,
        None => Settings {
            headless: true,
            ..Settings::default()
        },
    };
    File::create(json_out)
        .with_context(|| format!("opening {} for writing", json_out.display()))?;

    let mut doc = Map::new();
    for name in BENCH_NAMES {
        let path = bench_dir.join(format!("{name}.txt"));
        let mut cut_sizes = Vec::with_capacity(repeat);
        let mut visited_leaves = Vec::with_capacity(repeat);
        let mut pruned_leaves = Vec::with_capacity(repeat);
        let mut wall_times = Vec::with_capacity(repeat);
        for run_id in 0..repeat {
            let graph = problem::load(&path)?;
            info!(bench = name, run = run_id, "running benchmark");
            let results = Partitioner::new(graph, settings.clone()).run()?;
            let best = results
                .best
                .context("benchmark run finished without reaching a leaf")?;
            cut_sizes.push(best.cut_size);
            visited_leaves.push(results.visited_leaves);
            pruned_leaves.push(results.pruned_leaves);
            wall_times.push(results.wall_time.as_millis() as u64);
        }
        doc.insert(
            (*name).to_string(),
            json!({
                "cut_sizes": cut_sizes,
                "visited_leaves": visited_leaves,
                "pruned_leaves": pruned_leaves,
                "wall_times": wall_times,
            }),
        );
    }

    fs::write(json_out, serde_json::to_vec_pretty(&Value::Object(doc))?)
        .with_context(|| format!("writing {}", json_out.display()))?;
    info!(path = %json_out.display(), "benchmark results written");
    Ok(())
}

/// Read a benchmark settings file: a JSON object applied key by key.
///
/// Benchmarks always run headless. Unrecognized keys are warned about and
/// skipped; an empty object is a hard error because it almost certainly
/// means the wrong file was passed.
pub fn read_settings(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading benchmark settings {}", path.display()))?;
    let doc: Value =
        serde_json::from_str(&text).context("benchmark settings are not valid JSON")?;
    let obj = doc
        .as_object()
        .context("benchmark settings must be a JSON object")?;
    ensure!(!obj.is_empty(), "benchmark settings object is empty");

    let mut settings = Settings {
        headless: true,
        ..Settings::default()
    };
    for (key, value) in obj {
        match key.as_str() {
            "threads" => {
                let threads = value
                    .as_u64()
                    .with_context(|| format!("setting {key} must be an unsigned integer"))?;
                settings.threads = usize::try_from(threads)?;
            }
            "prune_half" => settings.prune_half = as_bool(key, value)?,
            "prune_by_cost" => settings.prune_by_cost = as_bool(key, value)?,
            "verbose" => settings.verbose = as_bool(key, value)?,
            "sanity_check" => settings.sanity_check = as_bool(key, value)?,
            _ => warn!(key = key.as_str(), "benchmark setting not recognized"),
        }
    }
    Ok(settings)
}

fn as_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .with_context(|| format!("setting {key} must be a boolean"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_settings(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("settings.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn settings_keys_are_applied() {
        let dir = tempdir().unwrap();
        let path = write_settings(
            dir.path(),
            r#"{"threads": 4, "prune_half": false, "sanity_check": true}"#,
        );
        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.threads, 4);
        assert!(!settings.prune_half);
        assert!(settings.sanity_check);
        assert!(settings.headless);
        // Untouched keys keep their defaults.
        assert!(settings.prune_by_cost);
    }

    #[test]
    fn empty_settings_object_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_settings(dir.path(), "{}");
        assert!(read_settings(&path).unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn unknown_settings_keys_are_skipped() {
        let dir = tempdir().unwrap();
        let path = write_settings(dir.path(), r#"{"threads": 2, "gui_scale": 3}"#);
        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.threads, 2);
    }

    #[test]
    fn mistyped_settings_values_are_fatal() {
        let dir = tempdir().unwrap();
        let path = write_settings(dir.path(), r#"{"prune_half": "yes"}"#);
        assert!(read_settings(&path).is_err());
    }

    #[test]
    fn sweep_writes_the_expected_json_shape() {
        let dir = tempdir().unwrap();
        // A small stand-in problem under the benchmark's expected name.
        let bench_dir = dir.path().join("benches");
        fs::create_dir(&bench_dir).unwrap();
        fs::write(
            bench_dir.join("cm82a.txt"),
            "6 4\n3 0 1 2\n3 3 4 5\n2 0 3\n2 2 5\n",
        )
        .unwrap();
        let out = dir.path().join("results.json");

        run(&bench_dir, &out, 3, None).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let record = &doc["cm82a"];
        for field in ["cut_sizes", "visited_leaves", "pruned_leaves", "wall_times"] {
            assert_eq!(record[field].as_array().unwrap().len(), 3, "{field}");
        }
        // The engine is exact, so every repeat reports the same cut.
        let cuts = record["cut_sizes"].as_array().unwrap();
        assert!(cuts.iter().all(|c| c == &cuts[0]));
    }

    #[test]
    fn unwritable_output_path_fails_before_running() {
        let dir = tempdir().unwrap();
        let bench_dir = dir.path().join("missing");
        // The output path is a directory, so the up-front create must fail
        // even though the problem directory does not exist either.
        let err = run(&bench_dir, dir.path(), 1, None).unwrap_err();
        assert!(err.to_string().contains("for writing"), "{err}");
    }

    fn repo_benchmarks() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../benchmarks")
    }

    #[test]
    fn recorded_benchmark_is_deterministic_across_worker_counts() {
        let path = repo_benchmarks().join("cm82a.txt");
        let mut cuts = Vec::new();
        for threads in [1, 2, 4] {
            let graph = crate::problem::load(&path).unwrap();
            let settings = Settings {
                threads,
                headless: true,
                ..Settings::default()
            };
            let results = Partitioner::new(graph, settings).run().unwrap();
            cuts.push(results.best.unwrap().cut_size);
        }
        assert_eq!(cuts[0], cuts[1]);
        assert_eq!(cuts[1], cuts[2]);
    }
}
