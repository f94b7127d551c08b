//! Degree-2 chain fusing.
//!
//! # Overview
//!
//! Fusing removes every node of degree 2 by replacing each maximal chain of
//! such nodes with one edge between the chain's two boundary nodes. The
//! payloads of the replaced edges are combined by an [`EdgeMerger`].
//!
//! ## Stages
//!
//! ```text
//! stage 1  depth-first topological pass
//!          collect runs of degree-2 nodes, sealed at any other node
//!             ↓  degree-2 nodes on cycles are never reached
//! stage 2  no-bifurcation walks from the leftovers
//!          (a) a node next to a junction: walk the chain away from it
//!          (b) otherwise the node sits on an isolated cycle
//!             ↓
//! plan     boundary → run … → boundary edge chains, merged payloads
//!             ↓  nothing has been modified up to here
//! rewrite  remove run nodes, add one edge per chain
//! ```
//!
//! An isolated cycle has no boundary: its first node survives and the rest
//! collapse into a self-loop on it (see [`IsolatedCycles`]). A lone node
//! whose only edge is a self-loop is already fused and is left alone, which
//! makes fusing idempotent.
//!
//! # Failure
//!
//! Merger rejections and consistency failures found while planning leave the
//! graph untouched. A builder that breaks its contract during the rewrite
//! leaves the graph partially rewritten; see
//! [`GraphError::leaves_graph_invalid`].

pub mod merger;
mod plan;

use std::collections::HashMap;
use std::mem;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

pub use merger::{ChainEdge, ConcatMerger, EdgeMerger};
use plan::ChainPlan;

use crate::config::{FuseConfig, IsolatedCycles};
use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder, NodeId};
use crate::traversal::{GraphTraversal, Sequencer, VisitAction, Visitor};

/// What a successful fuse did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FuseSummary {
    /// Runs of degree-2 nodes replaced by a single edge.
    pub runs_fused: usize,
    /// Degree-2 nodes removed.
    pub nodes_removed: usize,
    /// Original edges folded into merged edges.
    pub edges_merged: usize,
    /// Replacement edges added.
    pub edges_created: usize,
    /// Isolated cycles found, whether collapsed or preserved.
    pub isolated_cycles: usize,
}

/// Collects runs of nodes between `finish` calls.
#[derive(Debug, Default)]
struct RunCollector {
    /// Stage 1 seals on any node of degree ≠ 2; stage 2 takes every node.
    degree_two_only: bool,
    open: Vec<NodeId>,
    runs: Vec<Vec<NodeId>>,
}

impl RunCollector {
    fn seal(&mut self) {
        if !self.open.is_empty() {
            self.runs.push(mem::take(&mut self.open));
        }
    }
}

impl<N, E> Visitor<N, E> for RunCollector {
    fn visit(&mut self, graph: &Graph<N, E>, node: NodeId) -> VisitAction {
        if !self.degree_two_only || graph.degree(node) == 2 {
            self.open.push(node);
        } else {
            self.seal();
        }
        VisitAction::Continue
    }

    fn finish(&mut self) {
        self.seal();
    }
}

/// Collapses degree-2 chains through a [`GraphBuilder`].
#[derive(Debug, Clone)]
pub struct GraphFuser<M> {
    merger: M,
    config: FuseConfig,
}

impl<M> GraphFuser<M> {
    pub fn new(merger: M) -> Self {
        Self::with_config(merger, FuseConfig::default())
    }

    pub const fn with_config(merger: M, config: FuseConfig) -> Self {
        Self { merger, config }
    }

    pub const fn merger(&self) -> &M {
        &self.merger
    }

    pub fn into_merger(self) -> M {
        self.merger
    }

    /// Fuse every degree-2 chain in the builder's graph, in place.
    ///
    /// # Errors
    ///
    /// - [`GraphError::ResidualChains`] / [`GraphError::UnresolvedChain`] on
    ///   inconsistent topology (graph untouched).
    /// - [`GraphError::MergeRejected`] if the merger refuses a chain (graph
    ///   untouched).
    /// - Builder errors, including [`GraphError::IncidentEdgesRetained`], if
    ///   the builder breaks its contract mid-rewrite (graph invalid).
    #[instrument(skip_all, fields(nodes = builder.graph().node_count(), edges = builder.graph().edge_count()))]
    pub fn fuse<N, E, B>(&mut self, builder: &mut B) -> Result<FuseSummary, GraphError>
    where
        B: GraphBuilder<N, E>,
        M: EdgeMerger<E>,
    {
        let mut summary = FuseSummary::default();
        let graph = builder.graph();

        let runs = collect_runs(graph)?;
        let mut plans = Vec::with_capacity(runs.len());
        for run in &runs {
            let Some(plan) = ChainPlan::for_run(graph, run)? else {
                trace!(node = run[0].index(), "lone self-loop already fused");
                continue;
            };
            if plan.closed {
                summary.isolated_cycles += 1;
                if self.config.isolated_cycles == IsolatedCycles::Preserve {
                    continue;
                }
            }
            let chain = plan.chain_edges(graph)?;
            let merged = self.merger.merge(&chain).inspect_err(|err| {
                warn!(start = plan.start.index(), error = %err, "merge rejected; graph left untouched");
            })?;
            plans.push((plan, merged));
        }
        debug!(runs = runs.len(), chains = plans.len(), "fuse planned");

        for (plan, merged) in plans {
            summary.nodes_removed += plan.doomed.len();
            summary.edges_merged += plan.steps.len();
            self.rewrite(builder, plan, merged)?;
            summary.runs_fused += 1;
            summary.edges_created += 1;
        }

        debug!(
            runs_fused = summary.runs_fused,
            nodes_removed = summary.nodes_removed,
            edges_merged = summary.edges_merged,
            isolated_cycles = summary.isolated_cycles,
            "fuse done"
        );
        Ok(summary)
    }

    fn rewrite<N, E, B>(&mut self, builder: &mut B, plan: ChainPlan, merged: E) -> Result<(), GraphError>
    where
        B: GraphBuilder<N, E>,
        M: EdgeMerger<E>,
    {
        let removed = builder.remove_nodes(&plan.doomed)?;
        let mut payloads: HashMap<_, _> = removed
            .into_iter()
            .flat_map(|node| node.edges)
            .map(|edge| (edge.id, edge.payload))
            .collect();

        let mut chain = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            if builder.graph().contains_edge(step.edge) {
                warn!(edge = step.edge.index(), "builder kept an incident edge of a removed node");
                return Err(GraphError::IncidentEdgesRetained(step.edge));
            }
            chain.push(payloads.remove(&step.edge).ok_or(GraphError::EdgeNotFound(step.edge))?);
        }

        let mut pending = builder.build_edge(plan.start, plan.end)?;
        self.merger.set_merged_object(&mut pending, merged, chain);
        let edge = builder.add_edge(pending)?;
        trace!(
            edge = edge.index(),
            start = plan.start.index(),
            end = plan.end.index(),
            removed = plan.doomed.len(),
            "chain fused"
        );
        Ok(())
    }
}

/// Fuse `builder`'s graph with default settings.
///
/// # Errors
///
/// See [`GraphFuser::fuse`].
pub fn fuse<N, E, B, M>(builder: &mut B, merger: M) -> Result<FuseSummary, GraphError>
where
    B: GraphBuilder<N, E>,
    M: EdgeMerger<E>,
{
    GraphFuser::new(merger).fuse(builder)
}

/// Stage 1 and stage 2: every degree-2 node ends up in exactly one run.
fn collect_runs<N, E>(graph: &Graph<N, E>) -> Result<Vec<Vec<NodeId>>, GraphError> {
    let collector = RunCollector {
        degree_two_only: true,
        ..RunCollector::default()
    };
    let mut traversal = GraphTraversal::new(graph, collector, Sequencer::depth_first_topological());
    traversal.traverse();
    let stage_one = traversal.visitor().runs.len();

    // Degrees are fixed while collecting: priority (a) sources first, then the rest.
    let (mut sources, fallback): (Vec<NodeId>, Vec<NodeId>) = graph
        .nodes()
        .filter(|&node| !traversal.is_visited(node) && graph.degree(node) == 2)
        .partition(|&node| graph.related_nodes(node).into_iter().any(|r| graph.degree(r) > 2));
    let mut residual = sources.len() + fallback.len();
    sources.extend(fallback);
    debug!(runs = stage_one, residual, "stage 1 done");

    traversal.visitor_mut().degree_two_only = false;
    let mut candidates = sources.into_iter();
    let mut walking = false;
    while residual > 0 {
        let Some(source) = candidates.find(|&node| !traversal.is_visited(node)) else {
            warn!(residual, "degree-2 nodes left without a source");
            return Err(GraphError::ResidualChains { remaining: residual });
        };

        if walking {
            traversal.set_source(source);
        } else {
            traversal.set_sequencer(Sequencer::no_bifurcation(source));
            walking = true;
        }
        let before = traversal.visited_count();
        traversal.traverse();
        residual = residual.saturating_sub(traversal.visited_count() - before);
    }

    let runs = traversal.into_visitor().runs;
    debug!(runs = runs.len() - stage_one, "stage 2 done");
    Ok(runs)
}
