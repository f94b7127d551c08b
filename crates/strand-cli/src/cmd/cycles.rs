//! `strand cycles`: report whether a graph contains a cycle.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strand_core::algo::{CycleDetector, DirectedCycleDetector};
use strand_core::graph::GraphBuilder;

use crate::document::{DocGraph, load_document, node_names};
use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `strand cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    /// Graph document (JSON).
    pub file: PathBuf,

    /// Read each edge as `from → to` instead of undirected.
    #[arg(long)]
    pub directed: bool,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    contains_cycle: bool,
    cyclic_nodes: Vec<String>,
}

/// Execute `strand cycles`.
pub fn run_cycles(args: &CyclesArgs, output: OutputMode) -> anyhow::Result<()> {
    let builder = load_document(&args.file)?.to_graph()?;
    let payload = cycle_report(builder.graph(), args.directed);
    render(output, &payload, render_cycles_human)
}

fn cycle_report(graph: &DocGraph, directed: bool) -> CyclesOutput {
    let (contains_cycle, cyclic) = if directed {
        let detector = DirectedCycleDetector::new(graph);
        (detector.contains_cycle(), detector.cyclic_nodes())
    } else {
        let detector = CycleDetector::new(graph);
        (detector.contains_cycle(), detector.cyclic_nodes())
    };

    CyclesOutput {
        contains_cycle,
        cyclic_nodes: node_names(graph, &cyclic),
    }
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if !payload.contains_cycle {
        return writeln!(w, "No cycles found.");
    }
    pretty_kv(w, "contains cycle", "yes")?;
    pretty_kv(w, "cyclic nodes", payload.cyclic_nodes.join(", "))
}
