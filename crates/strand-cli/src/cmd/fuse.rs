//! `strand fuse`: collapse degree-2 chains into single edges.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strand_core::GraphError;
use strand_core::algo::{ConcatMerger, FuseSummary, GraphFuser};
use strand_core::config::FuseConfig;
use strand_core::graph::GraphBuilder;
use tracing::info;

use crate::document::{DocBuilder, GraphDocument, load_document, save_document};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render, render_error};

/// Arguments for `strand fuse`.
#[derive(Args, Debug)]
pub struct FuseArgs {
    /// Graph document (JSON).
    pub file: PathBuf,

    /// Write the fused document here instead of printing it.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FuseOutput {
    summary: FuseSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph: Option<GraphDocument>,
}

/// Execute `strand fuse`.
pub fn run_fuse(args: &FuseArgs, config: FuseConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut builder = load_document(&args.file)?.to_graph()?;

    let (summary, document) = match fuse_graph(&mut builder, config) {
        Ok(fused) => fused,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("fuse failed");
        }
    };
    info!(
        runs = summary.runs_fused,
        nodes_removed = summary.nodes_removed,
        "fused {}",
        args.file.display()
    );

    let payload = match &args.output {
        Some(path) => {
            save_document(path, &document)?;
            FuseOutput {
                summary,
                written_to: Some(path.clone()),
                graph: None,
            }
        }
        None => FuseOutput {
            summary,
            written_to: None,
            graph: Some(document),
        },
    };
    render(output, &payload, render_fuse_human)
}

fn fuse_graph(builder: &mut DocBuilder, config: FuseConfig) -> Result<(FuseSummary, GraphDocument), GraphError> {
    let summary = GraphFuser::with_config(ConcatMerger, config).fuse(builder)?;
    Ok((summary, GraphDocument::from_graph(builder.graph())))
}

fn render_fuse_human(payload: &FuseOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let summary = &payload.summary;
    pretty_section(w, "Fuse summary")?;
    pretty_kv(w, "runs fused", summary.runs_fused.to_string())?;
    pretty_kv(w, "nodes removed", summary.nodes_removed.to_string())?;
    pretty_kv(w, "edges merged", summary.edges_merged.to_string())?;
    pretty_kv(w, "edges created", summary.edges_created.to_string())?;
    pretty_kv(w, "isolated cycles", summary.isolated_cycles.to_string())?;

    if let Some(path) = &payload.written_to {
        pretty_kv(w, "written to", path.display().to_string())?;
    }
    if let Some(graph) = &payload.graph {
        writeln!(w)?;
        pretty_section(w, &format!("Edges ({})", graph.edges.len()))?;
        for edge in &graph.edges {
            writeln!(w, "{} -- {}  {}", edge.from, edge.to, edge.id)?;
        }
    }
    Ok(())
}
