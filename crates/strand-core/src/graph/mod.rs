//! Graph model and mutation contract.
//!
//! # Overview
//!
//! [`Graph`] is an undirected multigraph over a stable arena: node and edge
//! ids survive the removal of other elements, so algorithms can hold plain
//! ids instead of references. Every edge carries an opaque payload `E` that
//! only the fuser's [`EdgeMerger`](crate::algo::fuse::EdgeMerger) ever
//! interprets.
//!
//! ```text
//! caller ──add_node/connect──▶ GraphBuilder ──owns──▶ Graph<N, E>
//!                                   ▲                    │
//!                     remove_nodes/ │                    │ &Graph
//!                     add_edge      │                    ▼
//!                               GraphFuser      CycleDetector, partition
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use strand_core::graph::{BasicGraphBuilder, GraphBuilder};
//!
//! let mut builder = BasicGraphBuilder::<&str, u32>::new();
//! let a = builder.add_node("a");
//! let b = builder.add_node("b");
//! builder.connect(a, b, 10)?;
//!
//! let graph = builder.into_graph();
//! assert_eq!(graph.degree(a), 1);
//! # Ok::<(), strand_core::GraphError>(())
//! ```

pub mod builder;
pub mod model;

pub use builder::{BasicGraphBuilder, GraphBuilder, PendingEdge, RemovedEdge, RemovedNode};
pub use model::{EdgeId, Graph, NodeId, QueryResult};
