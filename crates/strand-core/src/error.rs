use std::fmt;

use crate::graph::{EdgeId, NodeId};

/// Errors raised by the graph builder contract and the topology algorithms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A node id does not refer to a node owned by the graph.
    #[error("node {} is not part of the graph", .0.index())]
    NodeNotFound(NodeId),

    /// An edge id does not refer to an edge owned by the graph.
    #[error("edge {} is not part of the graph", .0.index())]
    EdgeNotFound(EdgeId),

    /// A pending edge names an endpoint that was removed after it was built.
    #[error("edge endpoint {} no longer belongs to the graph", .0.index())]
    DanglingEndpoint(NodeId),

    /// A pending edge was handed to `add_edge` without a payload attached.
    #[error("pending edge {}-{} has no payload attached", .node_a.index(), .node_b.index())]
    MissingPayload { node_a: NodeId, node_b: NodeId },

    /// The partitioner ran out of source nodes while nodes were still unvisited.
    #[error("partitioning stalled with {remaining} unvisited node(s) and no source left")]
    PartitionExhausted { remaining: usize },

    /// Degree-2 nodes survived both fusing stages.
    #[error("{remaining} degree-2 node(s) could not be assigned to any chain")]
    ResidualChains { remaining: usize },

    /// A chain of degree-2 nodes is not contiguous in the graph.
    #[error("chain starting at node {} is not contiguous: {reason}", .start.index())]
    UnresolvedChain { start: NodeId, reason: &'static str },

    /// The edge merger refused to merge a chain.
    #[error(transparent)]
    MergeRejected(#[from] MergeError),

    /// The builder removed a node but left one of its incident edges behind.
    #[error("builder kept edge {} after removing its endpoint", .0.index())]
    IncidentEdgesRetained(EdgeId),
}

impl GraphError {
    /// Stable machine-readable classification of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
            Self::EdgeNotFound(_) => ErrorCode::EdgeNotFound,
            Self::DanglingEndpoint(_) | Self::MissingPayload { .. } => ErrorCode::InvalidEdge,
            Self::PartitionExhausted { .. }
            | Self::ResidualChains { .. }
            | Self::UnresolvedChain { .. } => ErrorCode::InconsistentTopology,
            Self::MergeRejected(_) => ErrorCode::MergeRejected,
            Self::IncidentEdgesRetained(_) => ErrorCode::BuilderContract,
        }
    }

    /// Whether the graph may have been partially rewritten when this error was raised.
    #[must_use]
    pub const fn leaves_graph_invalid(&self) -> bool {
        matches!(
            self,
            Self::IncidentEdgesRetained(_) | Self::DanglingEndpoint(_) | Self::MissingPayload { .. }
        )
    }
}

/// Rejection returned by an [`EdgeMerger`](crate::algo::fuse::EdgeMerger).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("edge merger rejected a chain of {chain_len} edge(s): {reason}")]
pub struct MergeError {
    pub chain_len: usize,
    pub reason: String,
}

impl MergeError {
    pub fn new(chain_len: usize, reason: impl Into<String>) -> Self {
        Self {
            chain_len,
            reason: reason.into(),
        }
    }
}

/// Machine-readable error codes for callers that branch on failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NodeNotFound,
    EdgeNotFound,
    InvalidEdge,
    InconsistentTopology,
    MergeRejected,
    BuilderContract,
}

impl ErrorCode {
    /// Stable code identifier (`G####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NodeNotFound => "G1001",
            Self::EdgeNotFound => "G1002",
            Self::InvalidEdge => "G1003",
            Self::InconsistentTopology => "G2001",
            Self::MergeRejected => "G3001",
            Self::BuilderContract => "G3002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NodeNotFound => "Node not found",
            Self::EdgeNotFound => "Edge not found",
            Self::InvalidEdge => "Invalid edge",
            Self::InconsistentTopology => "Inconsistent graph topology",
            Self::MergeRejected => "Edge merge rejected",
            Self::BuilderContract => "Graph builder contract violated",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NodeNotFound | Self::EdgeNotFound => {
                Some("Ids are invalidated by removal; re-query the graph after mutating it.")
            }
            Self::InvalidEdge => Some("Build and add edges between nodes that are still in the graph."),
            Self::InconsistentTopology => {
                Some("Degree bookkeeping disagrees with adjacency. Report a bug with the input graph.")
            }
            Self::MergeRejected => None,
            Self::BuilderContract => {
                Some("Discard this graph: removing a node must also remove its incident edges.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
