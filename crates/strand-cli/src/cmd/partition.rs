//! `strand partition`: split a graph into connected components.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strand_core::GraphError;
use strand_core::algo::partition;
use strand_core::graph::{EdgeId, GraphBuilder};

use crate::document::{DocGraph, PART_SEPARATOR, load_document, node_names};
use crate::output::{CliError, OutputMode, pretty_section, render, render_error};

/// Arguments for `strand partition`.
#[derive(Args, Debug)]
pub struct PartitionArgs {
    /// Graph document (JSON).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct PartitionOutput {
    nodes: Vec<String>,
    edges: Vec<String>,
}

/// Execute `strand partition`.
pub fn run_partition(args: &PartitionArgs, output: OutputMode) -> anyhow::Result<()> {
    let builder = load_document(&args.file)?.to_graph()?;
    let payload = match partition_report(builder.graph()) {
        Ok(payload) => payload,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("partitioning failed");
        }
    };
    render(output, &payload, |parts, w| render_partitions_human(parts, w))
}

fn partition_report(graph: &DocGraph) -> Result<Vec<PartitionOutput>, GraphError> {
    let parts = partition(graph)?;
    Ok(parts
        .iter()
        .map(|part| PartitionOutput {
            nodes: node_names(graph, &part.nodes),
            edges: edge_ids(graph, &part.edges),
        })
        .collect())
}

fn edge_ids(graph: &DocGraph, edges: &[EdgeId]) -> Vec<String> {
    edges
        .iter()
        .filter_map(|&edge| graph.edge_weight(edge))
        .map(|parts| parts.join(PART_SEPARATOR))
        .collect()
}

fn render_partitions_human(parts: &[PartitionOutput], w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Components ({})", parts.len()))?;
    for (idx, part) in parts.iter().enumerate() {
        writeln!(
            w,
            "{:>3}. {} node(s), {} edge(s): {}",
            idx + 1,
            part.nodes.len(),
            part.edges.len(),
            part.nodes.join(" ")
        )?;
    }
    Ok(())
}
