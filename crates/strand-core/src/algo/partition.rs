//! Connected-component partitioning.
//!
//! One depth-first controller is reused for every component: after a
//! component is exhausted the controller is pointed at the next unvisited
//! node with `set_source`, so nodes seen by earlier components stay visited
//! and no flag reset pass is needed between components. Sources come from a
//! single forward pass over the node order. A counter of
//! unvisited nodes drives the loop; each pass visits at least its source, so
//! the loop terminates.

use std::mem;

use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::graph::{EdgeId, Graph, NodeId};
use crate::traversal::{GraphTraversal, Sequencer, VisitAction, Visitor};

/// A maximal connected subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    /// Member nodes in visit order.
    pub nodes: Vec<NodeId>,
    /// Edges with at least one endpoint among `nodes`, in index order.
    pub edges: Vec<EdgeId>,
}

impl Partition {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

/// Accumulates visited nodes into the open bucket; `finish` seals it.
#[derive(Debug, Default)]
struct BucketVisitor {
    open: Vec<NodeId>,
    sealed: Vec<Vec<NodeId>>,
}

impl<N, E> Visitor<N, E> for BucketVisitor {
    fn visit(&mut self, _graph: &Graph<N, E>, node: NodeId) -> VisitAction {
        self.open.push(node);
        VisitAction::Continue
    }

    fn finish(&mut self) {
        if !self.open.is_empty() {
            self.sealed.push(mem::take(&mut self.open));
        }
    }
}

/// Split `graph` into its connected components.
///
/// Every node appears in exactly one partition. Partitions are returned in
/// the order their first node appears in the graph.
///
/// # Errors
///
/// Returns [`GraphError::PartitionExhausted`] if nodes remain unvisited but
/// none can be found to start a new component from.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn partition<N, E>(graph: &Graph<N, E>) -> Result<Vec<Partition>, GraphError> {
    let mut remaining = graph.node_count();
    let Some(first) = graph.nodes().next() else {
        return Ok(Vec::new());
    };

    let mut traversal = GraphTraversal::new(graph, BucketVisitor::default(), Sequencer::depth_first(first));
    let mut cursor = graph.nodes();
    while remaining > 0 {
        let Some(source) = cursor.find(|&node| !traversal.is_visited(node)) else {
            warn!(remaining, "no unvisited source left while partitioning");
            return Err(GraphError::PartitionExhausted { remaining });
        };

        let before = traversal.visited_count();
        traversal.set_source(source);
        traversal.traverse();
        let visited = traversal.visited_count() - before;
        remaining = remaining.saturating_sub(visited);
    }

    let buckets = traversal.into_visitor().sealed;
    let mut edge_seen = fixedbitset::FixedBitSet::with_capacity(graph.edge_bound());
    let partitions: Vec<Partition> = buckets
        .into_iter()
        .map(|nodes| {
            let mut edges: Vec<EdgeId> = nodes
                .iter()
                .flat_map(|&node| graph.incident_edges(node))
                .filter(|edge| !edge_seen.put(edge.index()))
                .collect();
            edges.sort_unstable();
            Partition { nodes, edges }
        })
        .collect();

    debug!(components = partitions.len(), "partitioning done");
    Ok(partitions)
}
