//! Turning a run of degree-2 nodes into a rewrite plan.

use std::collections::HashSet;

use super::merger::ChainEdge;
use crate::error::GraphError;
use crate::graph::{EdgeId, Graph, NodeId};

/// One edge of the chain, oriented from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

/// How one run is rewritten: delete `doomed`, then join `start` and `end`
/// with a single edge standing in for `steps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChainPlan {
    pub start: NodeId,
    pub end: NodeId,
    pub doomed: Vec<NodeId>,
    pub steps: Vec<Step>,
    /// The run had no boundary and collapses onto its first node.
    pub closed: bool,
}

impl ChainPlan {
    /// Plan the rewrite of `run`, a walk-ordered list of degree-2 nodes.
    ///
    /// Returns `Ok(None)` for a lone node whose only edge is a self-loop:
    /// there is nothing left to fuse.
    pub(crate) fn for_run<N, E>(graph: &Graph<N, E>, run: &[NodeId]) -> Result<Option<Self>, GraphError> {
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            return Ok(None);
        };
        let members: HashSet<NodeId> = run.iter().copied().collect();
        let mut used: HashSet<EdgeId> = HashSet::with_capacity(run.len() + 1);
        let mut steps = Vec::with_capacity(run.len() + 1);

        let entry = graph.incident_edges(first).into_iter().find_map(|edge| {
            graph
                .opposite(edge, first)
                .filter(|other| !members.contains(other))
                .map(|other| (edge, other))
        });

        let closed = entry.is_none();
        let start = match entry {
            Some((edge, boundary)) => {
                used.insert(edge);
                steps.push(Step {
                    edge,
                    from: boundary,
                    to: first,
                });
                boundary
            }
            None if run.len() == 1 => return Ok(None),
            None => first,
        };

        for pair in run.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let edge = graph
                .edges_between(from, to)
                .into_iter()
                .find(|edge| !used.contains(edge))
                .ok_or(GraphError::UnresolvedChain {
                    start: first,
                    reason: "consecutive run nodes are not adjacent",
                })?;
            used.insert(edge);
            steps.push(Step { edge, from, to });
        }

        let exit = graph.incident_edges(last).into_iter().find_map(|edge| {
            if used.contains(&edge) {
                return None;
            }
            graph
                .opposite(edge, last)
                .filter(|other| if closed { *other == first } else { !members.contains(other) })
                .map(|other| (edge, other))
        });
        let Some((edge, end)) = exit else {
            return Err(GraphError::UnresolvedChain {
                start: first,
                reason: "no exit edge at the end of the run",
            });
        };
        steps.push(Step {
            edge,
            from: last,
            to: end,
        });

        let doomed = if closed { run[1..].to_vec() } else { run.to_vec() };
        let mut plan = Self {
            start,
            end,
            doomed,
            steps,
            closed,
        };
        if plan.end.index() < plan.start.index() {
            plan.reverse();
        }
        Ok(Some(plan))
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.steps.reverse();
        for step in &mut self.steps {
            std::mem::swap(&mut step.from, &mut step.to);
        }
    }

    /// The chain as the merger sees it.
    pub(crate) fn chain_edges<'g, N, E>(&self, graph: &'g Graph<N, E>) -> Result<Vec<ChainEdge<'g, E>>, GraphError> {
        self.steps
            .iter()
            .map(|step| {
                let payload = graph.edge_weight(step.edge).ok_or(GraphError::EdgeNotFound(step.edge))?;
                let reversed = graph
                    .endpoints(step.edge)
                    .is_some_and(|(a, b)| a != b && a == step.to);
                Ok(ChainEdge {
                    id: step.edge,
                    payload,
                    from: step.from,
                    to: step.to,
                    reversed,
                })
            })
            .collect()
    }
}
