//! The graph mutation contract.
//!
//! Nodes and edges are created and destroyed only through a
//! [`GraphBuilder`]. Edges are built in two steps, mirroring how the fuser
//! uses them: [`GraphBuilder::build_edge`] validates the endpoints and hands
//! back a [`PendingEdge`] with no payload, the caller attaches one, and
//! [`GraphBuilder::add_edge`] inserts it after re-checking the endpoints.

use tracing::trace;

use super::model::{EdgeId, Graph, NodeId};
use crate::error::GraphError;

/// An edge that has been built but not yet added to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdge<E> {
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub payload: Option<E>,
}

impl<E> PendingEdge<E> {
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.node_a == self.node_b
    }
}

/// An edge taken out of the graph, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEdge<E> {
    pub id: EdgeId,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub payload: E,
}

/// A node taken out of the graph, with the edges removed along with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode<N, E> {
    pub id: NodeId,
    pub weight: N,
    pub edges: Vec<RemovedEdge<E>>,
}

/// Mutation contract consumed by the fuser.
pub trait GraphBuilder<N, E> {
    /// The graph being built.
    fn graph(&self) -> &Graph<N, E>;

    /// Add a node carrying `weight`.
    fn add_node(&mut self, weight: N) -> NodeId;

    /// Build an edge between two existing nodes without adding it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if either endpoint is unknown.
    fn build_edge(&self, node_a: NodeId, node_b: NodeId) -> Result<PendingEdge<E>, GraphError>;

    /// Add a previously built edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingPayload`] if no payload was attached and
    /// [`GraphError::DanglingEndpoint`] if an endpoint was removed since the
    /// edge was built.
    fn add_edge(&mut self, edge: PendingEdge<E>) -> Result<EdgeId, GraphError>;

    /// Remove a single edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] if the edge is unknown.
    fn remove_edge(&mut self, edge: EdgeId) -> Result<RemovedEdge<E>, GraphError>;

    /// Remove a node together with all of its incident edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is unknown.
    fn remove_node(&mut self, node: NodeId) -> Result<RemovedNode<N, E>, GraphError>;

    /// Remove several nodes; stops at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GraphBuilder::remove_node`] failure.
    fn remove_nodes(&mut self, nodes: &[NodeId]) -> Result<Vec<RemovedNode<N, E>>, GraphError> {
        nodes.iter().map(|&node| self.remove_node(node)).collect()
    }

    /// Build, attach `payload` and add in one step.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphBuilder::build_edge`] and [`GraphBuilder::add_edge`]
    /// failures.
    fn connect(&mut self, node_a: NodeId, node_b: NodeId, payload: E) -> Result<EdgeId, GraphError> {
        let mut edge = self.build_edge(node_a, node_b)?;
        edge.payload = Some(payload);
        self.add_edge(edge)
    }
}

/// The default builder: owns its graph outright.
#[derive(Debug, Clone)]
pub struct BasicGraphBuilder<N, E> {
    graph: Graph<N, E>,
}

impl<N, E> Default for BasicGraphBuilder<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> BasicGraphBuilder<N, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Continue building on an existing graph.
    #[must_use]
    pub const fn from_graph(graph: Graph<N, E>) -> Self {
        Self { graph }
    }

    /// Hand back the finished graph.
    #[must_use]
    pub fn into_graph(self) -> Graph<N, E> {
        self.graph
    }
}

impl<N, E> From<Graph<N, E>> for BasicGraphBuilder<N, E> {
    fn from(graph: Graph<N, E>) -> Self {
        Self::from_graph(graph)
    }
}

impl<N, E> GraphBuilder<N, E> for BasicGraphBuilder<N, E> {
    fn graph(&self) -> &Graph<N, E> {
        &self.graph
    }

    fn add_node(&mut self, weight: N) -> NodeId {
        self.graph.insert_node(weight)
    }

    fn build_edge(&self, node_a: NodeId, node_b: NodeId) -> Result<PendingEdge<E>, GraphError> {
        for node in [node_a, node_b] {
            if !self.graph.contains_node(node) {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        Ok(PendingEdge {
            node_a,
            node_b,
            payload: None,
        })
    }

    fn add_edge(&mut self, edge: PendingEdge<E>) -> Result<EdgeId, GraphError> {
        let PendingEdge {
            node_a,
            node_b,
            payload,
        } = edge;
        let Some(payload) = payload else {
            return Err(GraphError::MissingPayload { node_a, node_b });
        };
        for node in [node_a, node_b] {
            if !self.graph.contains_node(node) {
                return Err(GraphError::DanglingEndpoint(node));
            }
        }
        let id = self.graph.insert_edge(node_a, node_b, payload);
        trace!(edge = id.index(), a = node_a.index(), b = node_b.index(), "edge added");
        Ok(id)
    }

    fn remove_edge(&mut self, edge: EdgeId) -> Result<RemovedEdge<E>, GraphError> {
        let (node_a, node_b, payload) = self
            .graph
            .take_edge(edge)
            .ok_or(GraphError::EdgeNotFound(edge))?;
        Ok(RemovedEdge {
            id: edge,
            node_a,
            node_b,
            payload,
        })
    }

    fn remove_node(&mut self, node: NodeId) -> Result<RemovedNode<N, E>, GraphError> {
        let (weight, removed) = self
            .graph
            .take_node(node)
            .ok_or(GraphError::NodeNotFound(node))?;
        trace!(node = node.index(), edges = removed.len(), "node removed");
        Ok(RemovedNode {
            id: node,
            weight,
            edges: removed
                .into_iter()
                .map(|(id, node_a, node_b, payload)| RemovedEdge {
                    id,
                    node_a,
                    node_b,
                    payload,
                })
                .collect(),
        })
    }
}
