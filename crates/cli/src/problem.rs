//! Problem-file reader.
//!
//! Format: the first line is `<n_blocks> <n_nets>`; each following line
//! describes one net as `<k> <b0> ... <b_{k-1}>` with zero-based block ids.
//! Trailing whitespace is ignored, as are blank lines and anything after the
//! last net.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use bbpart::Hypergraph;

/// Read and parse a problem file.
pub fn load(path: &Path) -> Result<Hypergraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading problem file {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing problem file {}", path.display()))
}

/// Parse problem text into a hypergraph.
pub fn parse(text: &str) -> Result<Hypergraph> {
    let mut lines = text.lines().map(str::trim).enumerate();

    let (_, header) = lines.next().context("problem file is empty")?;
    let fields: Vec<&str> = header.split_ascii_whitespace().collect();
    ensure!(
        fields.len() == 2,
        "first line must contain exactly two values, found {}",
        fields.len()
    );
    let num_blocks: usize = fields[0].parse().context("block count is not an integer")?;
    let num_nets: usize = fields[1].parse().context("net count is not an integer")?;

    let mut nets: Vec<Vec<u32>> = Vec::with_capacity(num_nets);
    for (index, line) in lines {
        if nets.len() == num_nets {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let lineno = index + 1;
        let mut fields = line.split_ascii_whitespace();
        let declared: usize = fields
            .next()
            .with_context(|| format!("line {lineno}: missing member count"))?
            .parse()
            .with_context(|| format!("line {lineno}: member count is not an integer"))?;
        let members: Vec<u32> = fields
            .map(|field| {
                field
                    .parse()
                    .with_context(|| format!("line {lineno}: block id is not an integer"))
            })
            .collect::<Result<_>>()?;
        ensure!(
            members.len() == declared,
            "line {lineno}: net lists {} blocks but declares {declared}",
            members.len()
        );
        for &bid in &members {
            ensure!(
                (bid as usize) < num_blocks,
                "line {lineno}: block id {bid} out of range ({num_blocks} blocks)"
            );
        }
        nets.push(members);
    }
    ensure!(
        nets.len() == num_nets,
        "expected {num_nets} nets, found {}",
        nets.len()
    );
    Ok(Hypergraph::new(num_blocks, nets))
}
