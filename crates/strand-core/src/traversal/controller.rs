use fixedbitset::FixedBitSet;
use tracing::trace;

use super::sequencer::Sequencer;
use super::{TraversalOutcome, VisitAction, Visitor};
use crate::graph::{Graph, NodeId};

/// Drives a [`Visitor`] over the nodes a [`Sequencer`] produces.
///
/// The controller owns the visited set. It is cleared by [`init`](Self::init)
/// and kept across [`set_sequencer`](Self::set_sequencer) and
/// [`set_source`](Self::set_source), which lets a caller run several passes
/// over one graph without revisiting nodes.
#[derive(Debug)]
pub struct GraphTraversal<'g, N, E, V> {
    graph: &'g Graph<N, E>,
    visitor: V,
    sequencer: Sequencer,
    visited: FixedBitSet,
    visited_count: usize,
}

impl<'g, N, E, V> GraphTraversal<'g, N, E, V>
where
    V: Visitor<N, E>,
{
    /// Create an initialised traversal.
    pub fn new(graph: &'g Graph<N, E>, visitor: V, sequencer: Sequencer) -> Self {
        let mut traversal = Self {
            graph,
            visitor,
            sequencer,
            visited: FixedBitSet::new(),
            visited_count: 0,
        };
        traversal.init();
        traversal
    }

    /// Forget every visited node and restart the sequencer.
    pub fn init(&mut self) {
        self.visited = self.graph.node_set();
        self.visited_count = 0;
        self.sequencer.init(self.graph, &self.visited);
    }

    /// Pull nodes until the sequencer runs dry or the visitor stops or
    /// suspends the traversal.
    ///
    /// [`Visitor::finish`] is called when the sequencer is exhausted and on
    /// [`VisitAction::Stop`], but not on [`VisitAction::Suspend`]: calling
    /// `traverse` again resumes where the suspended run left off.
    pub fn traverse(&mut self) -> TraversalOutcome {
        while let Some(node) = self.sequencer.next(&self.visited) {
            self.visited.insert(node.index());
            self.visited_count += 1;

            match self.visitor.visit(self.graph, node) {
                VisitAction::Continue => self.sequencer.cont(self.graph, node, &self.visited),
                VisitAction::KillBranch => trace!(node = node.index(), "branch killed"),
                VisitAction::Suspend => {
                    self.sequencer.cont(self.graph, node, &self.visited);
                    return TraversalOutcome::Suspended;
                }
                VisitAction::Stop => {
                    self.visitor.finish();
                    return TraversalOutcome::Stopped;
                }
            }
        }

        self.visitor.finish();
        TraversalOutcome::Completed
    }

    /// Swap the visit strategy, keeping the visited set.
    pub fn set_sequencer(&mut self, sequencer: Sequencer) {
        self.sequencer = sequencer;
        self.sequencer.init(self.graph, &self.visited);
    }

    /// Restart the current source-based strategy from `source`, keeping the
    /// visited set.
    pub fn set_source(&mut self, source: NodeId) {
        self.sequencer.set_source(source);
        self.sequencer.init(self.graph, &self.visited);
    }

    #[must_use]
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(node.index())
    }

    /// Number of nodes visited since the last [`init`](Self::init).
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited_count
    }

    #[must_use]
    pub const fn graph(&self) -> &'g Graph<N, E> {
        self.graph
    }

    #[must_use]
    pub const fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    #[must_use]
    pub const fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    #[must_use]
    pub fn into_visitor(self) -> V {
        self.visitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BasicGraphBuilder, GraphBuilder};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<NodeId>,
        finished: usize,
        stop_at: Option<NodeId>,
        suspend_at: Option<NodeId>,
        prune_at: Option<NodeId>,
    }

    impl<N, E> Visitor<N, E> for Recorder {
        fn visit(&mut self, _graph: &Graph<N, E>, node: NodeId) -> VisitAction {
            self.seen.push(node);
            if self.stop_at == Some(node) {
                VisitAction::Stop
            } else if self.suspend_at == Some(node) {
                VisitAction::Suspend
            } else if self.prune_at == Some(node) {
                VisitAction::KillBranch
            } else {
                VisitAction::Continue
            }
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    /// a - b - c - d
    fn path() -> (Graph<char, ()>, [NodeId; 4]) {
        let mut builder = BasicGraphBuilder::new();
        let a = builder.add_node('a');
        let b = builder.add_node('b');
        let c = builder.add_node('c');
        let d = builder.add_node('d');
        builder.connect(a, b, ()).expect("a-b");
        builder.connect(b, c, ()).expect("b-c");
        builder.connect(c, d, ()).expect("c-d");
        (builder.into_graph(), [a, b, c, d])
    }

    #[test]
    fn completed_traversal_finishes_once() {
        let (graph, [a, ..]) = path();
        let mut traversal = GraphTraversal::new(&graph, Recorder::default(), Sequencer::depth_first(a));
        assert_eq!(traversal.traverse(), TraversalOutcome::Completed);
        assert_eq!(traversal.visited_count(), 4);
        assert_eq!(traversal.visitor().finished, 1);
    }

    #[test]
    fn stop_finishes_immediately() {
        let (graph, [a, b, ..]) = path();
        let recorder = Recorder {
            stop_at: Some(b),
            ..Recorder::default()
        };
        let mut traversal = GraphTraversal::new(&graph, recorder, Sequencer::depth_first(a));
        assert_eq!(traversal.traverse(), TraversalOutcome::Stopped);
        let recorder = traversal.into_visitor();
        assert_eq!(recorder.seen, vec![a, b]);
        assert_eq!(recorder.finished, 1);
    }

    #[test]
    fn suspend_resumes_where_it_left_off() {
        let (graph, [a, b, c, d]) = path();
        let recorder = Recorder {
            suspend_at: Some(b),
            ..Recorder::default()
        };
        let mut traversal = GraphTraversal::new(&graph, recorder, Sequencer::depth_first(a));
        assert_eq!(traversal.traverse(), TraversalOutcome::Suspended);
        assert_eq!(traversal.visitor().finished, 0);
        assert_eq!(traversal.traverse(), TraversalOutcome::Completed);
        assert_eq!(traversal.visitor().seen, vec![a, b, c, d]);
        assert_eq!(traversal.visitor().finished, 1);
    }

    #[test]
    fn kill_branch_prunes_expansion() {
        let (graph, [a, b, c, _]) = path();
        let recorder = Recorder {
            prune_at: Some(b),
            ..Recorder::default()
        };
        let mut traversal = GraphTraversal::new(&graph, recorder, Sequencer::depth_first(a));
        traversal.traverse();
        assert_eq!(traversal.visitor().seen, vec![a, b]);
        assert!(!traversal.is_visited(c));
    }

    #[test]
    fn set_source_keeps_visited_nodes() {
        let (graph, [a, b, c, d]) = path();
        let recorder = Recorder {
            prune_at: Some(b),
            ..Recorder::default()
        };
        let mut traversal = GraphTraversal::new(&graph, recorder, Sequencer::depth_first(a));
        traversal.traverse();
        traversal.set_source(d);
        traversal.traverse();
        assert_eq!(traversal.visitor().seen, vec![a, b, d, c]);
        assert_eq!(traversal.visited_count(), 4);

        traversal.init();
        assert_eq!(traversal.visited_count(), 0);
        assert!(!traversal.is_visited(a));
    }
}
