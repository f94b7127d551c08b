//! Visit-order strategies.
//!
//! A [`Sequencer`] decides which node the controller pulls next. It never
//! marks nodes itself: the controller owns the visited set and passes it in,
//! so a sequencer can be swapped mid-traversal without losing track of what
//! has already been seen.
//!
//! # Topological strategies
//!
//! The undirected topological order is leaf pruning. Every node starts with a
//! counter equal to its degree and nodes of degree < 2 are seeded. Visiting a
//! node decrements the counter of each unvisited related node (once per edge
//! endpoint), which becomes ready when its counter drops to 1: all but one of
//! its edges lead to visited nodes. Nodes on a cycle keep each other's counters
//! at 2 or more and are never reached.
//!
//! The directed variant counts incoming edges instead, follows edges from
//! `node_a` to `node_b`, and releases a node at 0.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::graph::{Graph, NodeId};

/// The visit order a [`Sequencer`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Undirected leaf pruning, first-in first-out.
    BreadthFirstTopological,
    /// Undirected leaf pruning, last-in first-out.
    DepthFirstTopological,
    /// In-degree release along edge direction, first-in first-out.
    DirectedTopological,
    /// Plain depth-first search from a source.
    DepthFirst { source: NodeId },
    /// A single path from a source through degree-2 nodes.
    NoBifurcation { source: NodeId },
}

impl Strategy {
    #[must_use]
    pub const fn source(self) -> Option<NodeId> {
        match self {
            Self::DepthFirst { source } | Self::NoBifurcation { source } => Some(source),
            Self::BreadthFirstTopological | Self::DepthFirstTopological | Self::DirectedTopological => None,
        }
    }

    const fn is_fifo(self) -> bool {
        matches!(self, Self::BreadthFirstTopological | Self::DirectedTopological)
    }
}

/// Produces the sequence of nodes a traversal visits.
#[derive(Debug, Clone)]
pub struct Sequencer {
    strategy: Strategy,
    frontier: VecDeque<NodeId>,
    counters: Vec<usize>,
}

impl Sequencer {
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            frontier: VecDeque::new(),
            counters: Vec::new(),
        }
    }

    #[must_use]
    pub const fn breadth_first_topological() -> Self {
        Self::new(Strategy::BreadthFirstTopological)
    }

    #[must_use]
    pub const fn depth_first_topological() -> Self {
        Self::new(Strategy::DepthFirstTopological)
    }

    #[must_use]
    pub const fn directed_topological() -> Self {
        Self::new(Strategy::DirectedTopological)
    }

    #[must_use]
    pub const fn depth_first(source: NodeId) -> Self {
        Self::new(Strategy::DepthFirst { source })
    }

    /// Walk from `source` through degree-2 nodes until the path forks, ends or
    /// closes on itself.
    ///
    /// The source is always visited whatever its degree; every other visited
    /// node has degree 2. With two unvisited degree-2 neighbors the walk
    /// follows the first one only.
    #[must_use]
    pub const fn no_bifurcation(source: NodeId) -> Self {
        Self::new(Strategy::NoBifurcation { source })
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Point a source-based strategy at a new start node.
    ///
    /// Topological strategies have no source; for them this is a no-op.
    pub fn set_source(&mut self, source: NodeId) {
        match &mut self.strategy {
            Strategy::DepthFirst { source: current } | Strategy::NoBifurcation { source: current } => {
                *current = source;
            }
            Strategy::BreadthFirstTopological
            | Strategy::DepthFirstTopological
            | Strategy::DirectedTopological => {}
        }
    }

    /// Reset the frontier for `graph`, skipping nodes already in `visited`.
    pub fn init<N, E>(&mut self, graph: &Graph<N, E>, visited: &FixedBitSet) {
        self.frontier.clear();
        self.counters.clear();

        match self.strategy {
            Strategy::BreadthFirstTopological | Strategy::DepthFirstTopological => {
                self.counters.resize(graph.node_bound(), 0);
                for node in graph.nodes() {
                    let degree = graph.degree(node);
                    self.counters[node.index()] = degree;
                    if degree < 2 && !visited.contains(node.index()) {
                        self.frontier.push_back(node);
                    }
                }
            }
            Strategy::DirectedTopological => {
                self.counters.resize(graph.node_bound(), 0);
                for node in graph.nodes() {
                    let in_degree = graph.in_edges(node).len();
                    self.counters[node.index()] = in_degree;
                    if in_degree == 0 && !visited.contains(node.index()) {
                        self.frontier.push_back(node);
                    }
                }
            }
            Strategy::DepthFirst { source } | Strategy::NoBifurcation { source } => {
                if graph.contains_node(source) && !visited.contains(source.index()) {
                    self.frontier.push_back(source);
                }
            }
        }
    }

    /// The next unvisited node, or `None` when the run is exhausted.
    pub fn next(&mut self, visited: &FixedBitSet) -> Option<NodeId> {
        loop {
            let node = if self.strategy.is_fifo() {
                self.frontier.pop_front()
            } else {
                self.frontier.pop_back()
            }?;
            if !visited.contains(node.index()) {
                return Some(node);
            }
        }
    }

    /// Expand the frontier from a node the visitor just accepted.
    pub fn cont<N, E>(&mut self, graph: &Graph<N, E>, node: NodeId, visited: &FixedBitSet) {
        match self.strategy {
            Strategy::BreadthFirstTopological | Strategy::DepthFirstTopological => {
                for related in graph.related_nodes(node) {
                    if visited.contains(related.index()) {
                        continue;
                    }
                    let counter = &mut self.counters[related.index()];
                    *counter = counter.saturating_sub(1);
                    if *counter == 1 {
                        self.frontier.push_back(related);
                    }
                }
            }
            Strategy::DirectedTopological => {
                for edge in graph.out_edges(node) {
                    let Some((_, target)) = graph.endpoints(edge) else {
                        continue;
                    };
                    if visited.contains(target.index()) {
                        continue;
                    }
                    let counter = &mut self.counters[target.index()];
                    *counter = counter.saturating_sub(1);
                    if *counter == 0 {
                        self.frontier.push_back(target);
                    }
                }
            }
            Strategy::DepthFirst { .. } => {
                for related in graph.related_nodes(node) {
                    if !visited.contains(related.index()) {
                        self.frontier.push_back(related);
                    }
                }
            }
            Strategy::NoBifurcation { source } => {
                if node != source && graph.degree(node) != 2 {
                    return;
                }
                let step = graph
                    .related_nodes(node)
                    .into_iter()
                    .find(|&related| !visited.contains(related.index()) && graph.degree(related) == 2);
                if let Some(step) = step {
                    self.frontier.push_back(step);
                }
            }
        }
    }
}
