#![forbid(unsafe_code)]
//! strand-core library.
//!
//! Topology engine for network-like graphs: an arena-backed undirected
//! multigraph, a pluggable traversal framework, and three algorithms built
//! on it (cycle detection, connected-component partitioning and degree-2
//! chain fusing).
//!
//! # Conventions
//!
//! - **Errors**: Algorithms return [`GraphError`]; configuration loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Example
//!
//! ```rust
//! use strand_core::algo::{ConcatMerger, GraphFuser, contains_cycle};
//! use strand_core::graph::{BasicGraphBuilder, GraphBuilder};
//!
//! let mut builder = BasicGraphBuilder::<&str, Vec<&str>>::new();
//! let a = builder.add_node("a");
//! let b = builder.add_node("b");
//! let c = builder.add_node("c");
//! builder.connect(a, b, vec!["ab"])?;
//! builder.connect(b, c, vec!["bc"])?;
//! assert!(!contains_cycle(builder.graph()));
//!
//! let summary = GraphFuser::new(ConcatMerger).fuse(&mut builder)?;
//! assert_eq!(summary.nodes_removed, 1);
//! let graph = builder.graph();
//! let edge = graph.edge_to(a, c).expect("fused edge");
//! assert_eq!(graph.edge_weight(edge), Some(&vec!["ab", "bc"]));
//! # Ok::<(), strand_core::GraphError>(())
//! ```

pub mod algo;
pub mod config;
pub mod error;
pub mod graph;
pub mod traversal;

pub use error::{ErrorCode, GraphError, MergeError};
