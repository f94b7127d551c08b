//! The payload-merging contract used when a chain collapses into one edge.

use crate::error::MergeError;
use crate::graph::{EdgeId, NodeId, PendingEdge};

/// One edge of a chain, oriented along the walk from the chain's start
/// boundary to its end boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEdge<'a, E> {
    pub id: EdgeId,
    pub payload: &'a E,
    /// Walk-order endpoint nearer the start boundary.
    pub from: NodeId,
    /// Walk-order endpoint nearer the end boundary.
    pub to: NodeId,
    /// The edge is stored as `to → from`, against the walk.
    pub reversed: bool,
}

/// Merges the payloads of a fused chain.
pub trait EdgeMerger<E> {
    /// Produce the payload for the edge replacing `chain`.
    ///
    /// Called once per chain, before the graph is modified. Returning an
    /// error aborts the whole fuse with the graph untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError`] when the payloads cannot be combined.
    fn merge(&mut self, chain: &[ChainEdge<'_, E>]) -> Result<E, MergeError>;

    /// Attach `merged` to the replacement edge.
    ///
    /// `chain` holds the removed payloads in walk order. The default stores
    /// `merged` and drops the originals.
    fn set_merged_object(&mut self, edge: &mut PendingEdge<E>, merged: E, chain: Vec<E>) {
        drop(chain);
        edge.payload = Some(merged);
    }
}

/// Concatenates `Vec` payloads in walk order.
///
/// Segments walked against their stored direction are reversed first, so a
/// chain of polyline-like payloads comes out as one continuous sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatMerger;

impl<T: Clone> EdgeMerger<Vec<T>> for ConcatMerger {
    fn merge(&mut self, chain: &[ChainEdge<'_, Vec<T>>]) -> Result<Vec<T>, MergeError> {
        if chain.is_empty() {
            return Err(MergeError::new(0, "empty chain"));
        }
        let mut merged = Vec::with_capacity(chain.iter().map(|e| e.payload.len()).sum());
        for edge in chain {
            if edge.reversed {
                merged.extend(edge.payload.iter().rev().cloned());
            } else {
                merged.extend(edge.payload.iter().cloned());
            }
        }
        Ok(merged)
    }
}
