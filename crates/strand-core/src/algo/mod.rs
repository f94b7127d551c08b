//! Algorithms over [`Graph`](crate::graph::Graph).
//!
//! [`cycles`] and [`partition`] only read the graph. [`fuse`] rewrites it
//! through a [`GraphBuilder`](crate::graph::GraphBuilder).

pub mod cycles;
pub mod fuse;
pub mod partition;

pub use cycles::{CycleDetector, DirectedCycleDetector, contains_cycle, contains_directed_cycle};
pub use fuse::{ChainEdge, ConcatMerger, EdgeMerger, FuseSummary, GraphFuser, fuse};
pub use partition::{Partition, partition};
