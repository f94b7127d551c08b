use proptest::prelude::*;
use strand_core::graph::{BasicGraphBuilder, GraphBuilder, NodeId};

/// A multigraph as plain indices; self-loops and parallel edges allowed.
#[derive(Debug, Clone)]
pub struct EdgeList {
    pub nodes: usize,
    pub edges: Vec<(usize, usize)>,
}

impl EdgeList {
    /// Build with payload `vec![i]` on the `i`-th edge.
    pub fn build(&self) -> (BasicGraphBuilder<usize, Vec<usize>>, Vec<NodeId>) {
        let mut builder = BasicGraphBuilder::new();
        let ids: Vec<NodeId> = (0..self.nodes).map(|i| builder.add_node(i)).collect();
        for (index, &(a, b)) in self.edges.iter().enumerate() {
            builder
                .connect(ids[a], ids[b], vec![index])
                .expect("generated endpoints exist");
        }
        (builder, ids)
    }

    /// Replace edge `i` with a path through `cuts[i]` fresh nodes.
    pub fn subdivide(&self, cuts: &[usize]) -> Self {
        let mut nodes = self.nodes;
        let mut edges = Vec::with_capacity(self.edges.len());
        for (&(a, b), &cut) in self.edges.iter().zip(cuts) {
            let mut prev = a;
            for _ in 0..cut {
                edges.push((prev, nodes));
                prev = nodes;
                nodes += 1;
            }
            edges.push((prev, b));
        }
        Self { nodes, edges }
    }

    pub fn has_undirected_cycle(&self) -> bool {
        let mut sets = DisjointSets::new(self.nodes);
        self.edges.iter().any(|&(a, b)| !sets.union(a, b))
    }

    pub fn component_count(&self) -> usize {
        let mut sets = DisjointSets::new(self.nodes);
        let merged = self.edges.iter().filter(|&&(a, b)| sets.union(a, b)).count();
        self.nodes - merged
    }

    pub fn has_directed_cycle(&self) -> bool {
        let mut graph = petgraph::graph::DiGraph::<(), ()>::new();
        let ids: Vec<_> = (0..self.nodes).map(|_| graph.add_node(())).collect();
        for &(a, b) in &self.edges {
            graph.add_edge(ids[a], ids[b], ());
        }
        petgraph::algo::is_cyclic_directed(&graph)
    }
}

struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns false when `a` and `b` were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

pub fn arb_edge_list(max_nodes: usize, max_edges: usize) -> impl Strategy<Value = EdgeList> {
    (1..=max_nodes).prop_flat_map(move |nodes| {
        prop::collection::vec((0..nodes, 0..nodes), 0..=max_edges).prop_map(move |edges| EdgeList { nodes, edges })
    })
}

/// Sparse random graphs with every edge stretched into a chain of 0-3 extra nodes.
pub fn arb_chained(max_nodes: usize, max_edges: usize) -> impl Strategy<Value = EdgeList> {
    arb_edge_list(max_nodes, max_edges)
        .prop_flat_map(|list| {
            let len = list.edges.len();
            (Just(list), prop::collection::vec(0usize..4, len))
        })
        .prop_map(|(list, cuts)| list.subdivide(&cuts))
}
