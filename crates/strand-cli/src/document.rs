//! JSON graph documents: the CLI's input and `fuse` output format.
//!
//! ```json
//! { "nodes": ["A", "B"], "edges": [{ "id": "AB", "from": "A", "to": "B" }] }
//! ```
//!
//! Edge payloads inside the graph are the list of original edge ids an edge
//! stands for, so fused edges can be traced back to their parts. Original ids
//! may not contain [`PART_SEPARATOR`], and a fused edge's id must be its parts
//! joined by it, so every original id can be read back from a saved document.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use strand_core::graph::{BasicGraphBuilder, Graph, GraphBuilder, NodeId};
use tracing::debug;

/// Separator between part ids in a fused edge id.
pub const PART_SEPARATOR: &str = "+";

/// Node names with edge payloads listing original edge ids.
pub type DocGraph = Graph<String, Vec<String>>;
pub type DocBuilder = BasicGraphBuilder<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Original edge ids, present only on fused edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<String>,
}

impl EdgeDocument {
    /// The original edge ids this edge stands for.
    fn original_ids(&self) -> Result<Vec<String>> {
        if self.parts.is_empty() {
            if self.id.contains(PART_SEPARATOR) {
                bail!(
                    "edge id '{}' contains '{PART_SEPARATOR}', which only fused edges may use; list its parts",
                    self.id
                );
            }
            return Ok(vec![self.id.clone()]);
        }

        if let Some(part) = self.parts.iter().find(|part| part.is_empty() || part.contains(PART_SEPARATOR)) {
            bail!("edge '{}' has invalid part id '{part}'", self.id);
        }
        let joined = self.parts.join(PART_SEPARATOR);
        if joined != self.id {
            bail!("fused edge id '{}' does not match its parts '{joined}'", self.id);
        }
        Ok(self.parts.clone())
    }
}

/// Names of `nodes`, skipping ids no longer in the graph.
pub fn node_names(graph: &DocGraph, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|&node| graph.node_weight(node).cloned())
        .collect()
}

impl GraphDocument {
    /// Build a graph from the document.
    ///
    /// Nodes referenced only by edges are created in order of first mention.
    /// A fused edge (one with `parts`) keeps its parts as its payload.
    pub fn to_graph(&self) -> Result<DocBuilder> {
        let mut builder = DocBuilder::new();
        let mut by_name = HashMap::with_capacity(self.nodes.len());

        let mut intern = |builder: &mut DocBuilder, name: &str| -> NodeId {
            if let Some(&id) = by_name.get(name) {
                return id;
            }
            let id = builder.add_node(name.to_string());
            by_name.insert(name.to_string(), id);
            id
        };

        for name in &self.nodes {
            intern(&mut builder, name);
        }

        let mut seen = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !seen.insert(edge.id.as_str()) {
                bail!("duplicate edge id '{}'", edge.id);
            }
            let from = intern(&mut builder, &edge.from);
            let to = intern(&mut builder, &edge.to);
            let parts = edge.original_ids()?;
            builder
                .connect(from, to, parts)
                .with_context(|| format!("Failed to add edge '{}'", edge.id))?;
        }

        debug!(
            nodes = builder.graph().node_count(),
            edges = builder.graph().edge_count(),
            "graph document loaded"
        );
        Ok(builder)
    }

    /// Write `graph` back out as a document.
    ///
    /// Edges standing for a single original edge keep its id; fused edges get
    /// their parts joined with [`PART_SEPARATOR`].
    pub fn from_graph(graph: &DocGraph) -> Self {
        let nodes = graph.nodes().filter_map(|node| graph.node_weight(node).cloned()).collect();
        let edges = graph
            .edges()
            .filter_map(|edge| {
                let (a, b) = graph.endpoints(edge)?;
                let parts = graph.edge_weight(edge)?;
                let (id, parts) = match parts.as_slice() {
                    [single] => (single.clone(), Vec::new()),
                    _ => (parts.join(PART_SEPARATOR), parts.clone()),
                };
                Some(EdgeDocument {
                    id,
                    from: graph.node_weight(a)?.clone(),
                    to: graph.node_weight(b)?.clone(),
                    parts,
                })
            })
            .collect();
        Self { nodes, edges }
    }
}

pub fn load_document(path: &Path) -> Result<GraphDocument> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_document(path: &Path, document: &GraphDocument) -> Result<()> {
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
