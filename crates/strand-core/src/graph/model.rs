//! Arena-backed undirected multigraph.
//!
//! Nodes and edges live in a [`StableUnGraph`] so their ids stay valid while
//! other nodes are removed. Parallel edges and self-loops are allowed. An edge
//! keeps its endpoints in insertion order (`node_a`, `node_b`); the undirected
//! algorithms ignore that order, the directed cycle detector reads it as
//! `node_a → node_b`.
//!
//! # Degree
//!
//! A node's degree counts edge endpoint occurrences: every parallel edge adds
//! one, a self-loop adds two. [`Graph::related_nodes`] follows the same rule,
//! so `related_nodes(n).len() == degree(n)` always holds.

use fixedbitset::FixedBitSet;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

use crate::algo::partition::Partition;

/// Stable id of a node.
pub type NodeId = NodeIndex;
/// Stable id of an edge.
pub type EdgeId = EdgeIndex;

/// Verdict of a query predicate.
///
/// Lets single-match queries stop without scanning the rest of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    /// Include the element and keep scanning.
    PassAndContinue,
    /// Include the element and stop.
    PassAndStop,
    /// Skip the element.
    Fail,
}

/// An undirected multigraph with node payloads `N` and edge payloads `E`.
///
/// Mutation goes through a [`GraphBuilder`](super::GraphBuilder); the
/// algorithms only ever need `&Graph`.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    inner: StableUnGraph<N, E>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: StableUnGraph::default(),
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Upper bound (exclusive) on node indices, for sizing bitsets.
    #[must_use]
    pub fn node_bound(&self) -> usize {
        self.inner.node_indices().map(|n| n.index() + 1).max().unwrap_or(0)
    }

    /// Upper bound (exclusive) on edge indices, for sizing bitsets.
    #[must_use]
    pub fn edge_bound(&self) -> usize {
        self.inner.edge_indices().map(|e| e.index() + 1).max().unwrap_or(0)
    }

    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.inner.edge_weight(edge).is_some()
    }

    #[must_use]
    pub fn node_weight(&self, node: NodeId) -> Option<&N> {
        self.inner.node_weight(node)
    }

    /// The payload of an edge.
    #[must_use]
    pub fn edge_weight(&self, edge: EdgeId) -> Option<&E> {
        self.inner.edge_weight(edge)
    }

    /// The endpoints of an edge as `(node_a, node_b)`.
    #[must_use]
    pub fn endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.inner.edge_endpoints(edge)
    }

    /// The endpoint of `edge` opposite to `node`.
    ///
    /// For a self-loop this is `node` itself.
    #[must_use]
    pub fn opposite(&self, edge: EdgeId, node: NodeId) -> Option<NodeId> {
        let (a, b) = self.endpoints(edge)?;
        if a == node {
            Some(b)
        } else if b == node {
            Some(a)
        } else {
            None
        }
    }

    /// All node ids, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices()
    }

    /// All edge ids, in index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inner.edge_indices()
    }

    /// Every edge touching `node`, each listed once (self-loops included).
    #[must_use]
    pub fn incident_edges(&self, node: NodeId) -> Vec<EdgeId> {
        if !self.contains_node(node) {
            return Vec::new();
        }
        let mut ids: Vec<EdgeId> = self.inner.edges(node).map(|e| e.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of incident edge endpoint occurrences.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident_edges(node)
            .into_iter()
            .map(|edge| if self.is_self_loop(edge) { 2 } else { 1 })
            .sum()
    }

    /// Neighbors reached through each incident edge endpoint occurrence.
    ///
    /// Parallel edges repeat the neighbor; a self-loop yields `node` twice.
    #[must_use]
    pub fn related_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut related = Vec::new();
        for edge in self.incident_edges(node) {
            if let Some(other) = self.opposite(edge, node) {
                related.push(other);
                if other == node {
                    related.push(node);
                }
            }
        }
        related
    }

    #[must_use]
    pub fn is_self_loop(&self, edge: EdgeId) -> bool {
        self.endpoints(edge).is_some_and(|(a, b)| a == b)
    }

    /// The first edge connecting `a` and `b`, in either direction.
    ///
    /// With parallel edges the choice is arbitrary; use
    /// [`Graph::edges_between`] to see all of them.
    #[must_use]
    pub fn edge_to(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.incident_edges(a)
            .into_iter()
            .find(|&edge| self.opposite(edge, a) == Some(b))
    }

    /// Every edge connecting `a` and `b`, in either direction.
    #[must_use]
    pub fn edges_between(&self, a: NodeId, b: NodeId) -> Vec<EdgeId> {
        self.incident_edges(a)
            .into_iter()
            .filter(|&edge| self.opposite(edge, a) == Some(b))
            .collect()
    }

    /// Edges stored as `node → other`.
    #[must_use]
    pub fn out_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.incident_edges(node)
            .into_iter()
            .filter(|&edge| self.endpoints(edge).is_some_and(|(a, _)| a == node))
            .collect()
    }

    /// Edges stored as `other → node`.
    #[must_use]
    pub fn in_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.incident_edges(node)
            .into_iter()
            .filter(|&edge| self.endpoints(edge).is_some_and(|(_, b)| b == node))
            .collect()
    }

    /// Nodes whose degree is exactly `degree`.
    #[must_use]
    pub fn nodes_of_degree(&self, degree: usize) -> Vec<NodeId> {
        self.query_nodes(|g, node| {
            if g.degree(node) == degree {
                QueryResult::PassAndContinue
            } else {
                QueryResult::Fail
            }
        })
    }

    /// Collect the nodes accepted by `predicate`, honoring early exit.
    pub fn query_nodes<F>(&self, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(&Self, NodeId) -> QueryResult,
    {
        let mut matched = Vec::new();
        for node in self.nodes() {
            match predicate(self, node) {
                QueryResult::PassAndContinue => matched.push(node),
                QueryResult::PassAndStop => {
                    matched.push(node);
                    break;
                }
                QueryResult::Fail => {}
            }
        }
        matched
    }

    /// Collect the edges accepted by `predicate`, honoring early exit.
    pub fn query_edges<F>(&self, mut predicate: F) -> Vec<EdgeId>
    where
        F: FnMut(&Self, EdgeId) -> QueryResult,
    {
        let mut matched = Vec::new();
        for edge in self.edges() {
            match predicate(self, edge) {
                QueryResult::PassAndContinue => matched.push(edge),
                QueryResult::PassAndStop => {
                    matched.push(edge);
                    break;
                }
                QueryResult::Fail => {}
            }
        }
        matched
    }

    /// The first node accepted by `predicate`.
    pub fn find_node<F>(&self, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.query_nodes(|g, node| {
            if predicate(g, node) {
                QueryResult::PassAndStop
            } else {
                QueryResult::Fail
            }
        })
        .pop()
    }

    /// Call `visit` for every node.
    pub fn visit_nodes<F>(&self, mut visit: F)
    where
        F: FnMut(&Self, NodeId),
    {
        for node in self.nodes() {
            visit(self, node);
        }
    }

    /// Call `visit` for every edge.
    pub fn visit_edges<F>(&self, mut visit: F)
    where
        F: FnMut(&Self, EdgeId),
    {
        for edge in self.edges() {
            visit(self, edge);
        }
    }

    /// An empty node bitset sized for this graph.
    #[must_use]
    pub fn node_set(&self) -> FixedBitSet {
        FixedBitSet::with_capacity(self.node_bound())
    }

    pub(crate) fn insert_node(&mut self, weight: N) -> NodeId {
        self.inner.add_node(weight)
    }

    /// Caller guarantees both endpoints exist.
    pub(crate) fn insert_edge(&mut self, a: NodeId, b: NodeId, payload: E) -> EdgeId {
        self.inner.add_edge(a, b, payload)
    }

    pub(crate) fn take_edge(&mut self, edge: EdgeId) -> Option<(NodeId, NodeId, E)> {
        let (a, b) = self.inner.edge_endpoints(edge)?;
        let payload = self.inner.remove_edge(edge)?;
        Some((a, b, payload))
    }

    /// Remove `node` and its incident edges, returning the node payload and
    /// the removed edges.
    #[allow(clippy::type_complexity)]
    pub(crate) fn take_node(&mut self, node: NodeId) -> Option<(N, Vec<(EdgeId, NodeId, NodeId, E)>)> {
        if !self.contains_node(node) {
            return None;
        }
        let mut removed = Vec::new();
        for edge in self.incident_edges(node) {
            if let Some((a, b, payload)) = self.take_edge(edge) {
                removed.push((edge, a, b, payload));
            }
        }
        let weight = self.inner.remove_node(node)?;
        Some((weight, removed))
    }
}

impl<N: Clone, E: Clone> Graph<N, E> {
    /// Copy a partition out into an independent graph.
    ///
    /// Node and edge ids of the copy are renumbered; edges whose endpoints
    /// are not both in the partition are left out.
    #[must_use]
    pub fn subgraph(&self, partition: &Partition) -> Self {
        let mut copy = Self::new();
        let mut mapping = std::collections::HashMap::with_capacity(partition.nodes.len());
        for &node in &partition.nodes {
            if let Some(weight) = self.node_weight(node) {
                mapping.insert(node, copy.insert_node(weight.clone()));
            }
        }
        for &edge in &partition.edges {
            let Some((a, b)) = self.endpoints(edge) else {
                continue;
            };
            if let (Some(&na), Some(&nb), Some(payload)) =
                (mapping.get(&a), mapping.get(&b), self.edge_weight(edge))
            {
                copy.insert_edge(na, nb, payload.clone());
            }
        }
        copy
    }
}
