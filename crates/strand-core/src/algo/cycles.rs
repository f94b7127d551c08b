//! Cycle detection by incomplete topological traversal.
//!
//! # Overview
//!
//! A topological order only reaches nodes whose predecessors have all been
//! released. Nodes on a cycle hold each other back, so after the traversal
//! has run dry the graph contains a cycle iff fewer nodes were visited than
//! the graph holds.
//!
//! - [`CycleDetector`] uses the undirected leaf-pruning order: parallel edges
//!   and self-loops count as cycles.
//! - [`DirectedCycleDetector`] follows edges from `node_a` to `node_b`: only
//!   directed cycles (including self-loops) count.
//!
//! Both run in O(V + E) with a queue; nothing recurses.
//!
//! # Usage
//!
//! ```rust
//! use strand_core::algo::cycles::contains_cycle;
//! use strand_core::graph::{BasicGraphBuilder, GraphBuilder};
//!
//! let mut builder = BasicGraphBuilder::<(), ()>::new();
//! let a = builder.add_node(());
//! let b = builder.add_node(());
//! builder.connect(a, b, ())?;
//! assert!(!contains_cycle(builder.graph()));
//! builder.connect(b, a, ())?;
//! assert!(contains_cycle(builder.graph()));
//! # Ok::<(), strand_core::GraphError>(())
//! ```

use tracing::{debug, instrument};

use crate::graph::{Graph, NodeId};
use crate::traversal::{GraphTraversal, Sequencer, VisitAction, Visitor};

/// Counts visits; everything else is left to the sequencer.
#[derive(Debug, Default, Clone, Copy)]
struct CountingVisitor {
    count: usize,
}

impl<N, E> Visitor<N, E> for CountingVisitor {
    fn visit(&mut self, _graph: &Graph<N, E>, _node: NodeId) -> VisitAction {
        self.count += 1;
        VisitAction::Continue
    }
}

/// Result of one topological pass.
struct Pass<'g, N, E> {
    traversal: GraphTraversal<'g, N, E, CountingVisitor>,
}

impl<'g, N, E> Pass<'g, N, E> {
    fn run(graph: &'g Graph<N, E>, sequencer: Sequencer) -> Self {
        let mut traversal = GraphTraversal::new(graph, CountingVisitor::default(), sequencer);
        traversal.traverse();
        Self { traversal }
    }

    fn contains_cycle(&self) -> bool {
        self.traversal.visitor().count < self.traversal.graph().node_count()
    }

    fn unreached(&self) -> Vec<NodeId> {
        let graph = self.traversal.graph();
        graph.nodes().filter(|&n| !self.traversal.is_visited(n)).collect()
    }
}

/// Undirected cycle detector.
pub struct CycleDetector<'g, N, E> {
    pass: Pass<'g, N, E>,
}

impl<'g, N, E> CycleDetector<'g, N, E> {
    /// Run the breadth-first topological pass over `graph`.
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn new(graph: &'g Graph<N, E>) -> Self {
        let pass = Pass::run(graph, Sequencer::breadth_first_topological());
        debug!(
            visited = pass.traversal.visitor().count,
            cyclic = pass.contains_cycle(),
            "undirected topological pass done"
        );
        Self { pass }
    }

    #[must_use]
    pub fn contains_cycle(&self) -> bool {
        self.pass.contains_cycle()
    }

    /// Nodes the topological order never reached: every cycle member plus
    /// any node trapped between cycles.
    #[must_use]
    pub fn cyclic_nodes(&self) -> Vec<NodeId> {
        self.pass.unreached()
    }
}

/// Directed cycle detector.
pub struct DirectedCycleDetector<'g, N, E> {
    pass: Pass<'g, N, E>,
}

impl<'g, N, E> DirectedCycleDetector<'g, N, E> {
    /// Run the directed topological pass over `graph`.
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn new(graph: &'g Graph<N, E>) -> Self {
        let pass = Pass::run(graph, Sequencer::directed_topological());
        debug!(
            visited = pass.traversal.visitor().count,
            cyclic = pass.contains_cycle(),
            "directed topological pass done"
        );
        Self { pass }
    }

    #[must_use]
    pub fn contains_cycle(&self) -> bool {
        self.pass.contains_cycle()
    }

    /// Nodes on a directed cycle or downstream of one.
    #[must_use]
    pub fn cyclic_nodes(&self) -> Vec<NodeId> {
        self.pass.unreached()
    }
}

/// Whether `graph`, read as undirected, contains a cycle.
#[must_use]
pub fn contains_cycle<N, E>(graph: &Graph<N, E>) -> bool {
    CycleDetector::new(graph).contains_cycle()
}

/// Whether `graph`, read as `node_a → node_b`, contains a directed cycle.
#[must_use]
pub fn contains_directed_cycle<N, E>(graph: &Graph<N, E>) -> bool {
    DirectedCycleDetector::new(graph).contains_cycle()
}
