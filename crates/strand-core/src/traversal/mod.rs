//! Traversal framework: visit order decoupled from what is done per node.
//!
//! ```text
//!  Sequencer ──next()──▶ GraphTraversal ──visit(node)──▶ Visitor
//!      ▲                      │   ▲                         │
//!      └──────cont(node)──────┘   └──────VisitAction────────┘
//! ```
//!
//! The controller pulls a node, marks it visited, asks the visitor what to
//! do, and lets the sequencer expand from it. Traversal is an explicit pull
//! loop, so deep graphs never grow the call stack.

pub mod controller;
pub mod sequencer;

pub use controller::GraphTraversal;
pub use sequencer::{Sequencer, Strategy};

use crate::graph::{Graph, NodeId};

/// What the controller should do after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    /// Expand from the node and keep going.
    Continue,
    /// Do not expand from the node, but keep going.
    KillBranch,
    /// Expand from the node, then return without finishing.
    Suspend,
    /// Finish and return.
    Stop,
}

/// How a call to [`GraphTraversal::traverse`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOutcome {
    /// The sequencer ran dry.
    Completed,
    /// The visitor returned [`VisitAction::Suspend`].
    Suspended,
    /// The visitor returned [`VisitAction::Stop`].
    Stopped,
}

/// Per-node callbacks invoked by a [`GraphTraversal`].
pub trait Visitor<N, E> {
    fn visit(&mut self, graph: &Graph<N, E>, node: NodeId) -> VisitAction;

    /// Called at the end of every maximal run.
    fn finish(&mut self) {}
}
