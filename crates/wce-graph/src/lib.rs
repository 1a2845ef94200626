#![forbid(unsafe_code)]

//! Weighted sparse graph APIs used by `wce-heap`.
//!
//! The cost engine only needs a narrow view of the graph: neighbour enumeration, edge weights,
//! and a dense rank per tracked edge. That view is the [`SparseGraph`] trait;
//! [`StaticSparseGraph`] is the immutable implementation used by the solver and the tests.

pub mod error;
pub mod graph;

pub use error::{Error, Result};
pub use graph::{GraphBuilder, StaticSparseGraph};

use serde::{Deserialize, Serialize};

pub type NodeId = usize;
pub type RankId = usize;
pub type EdgeId = u64;

/// Unordered node pair. The endpoints are stored sorted, so `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
}

impl Edge {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { u: a, v: b }
        } else {
            Self { u: b, v: a }
        }
    }

    /// Triangular index of the pair: `v * (v - 1) / 2 + u`.
    ///
    /// Only meaningful for `u < v`; self-loops never receive an id.
    pub fn id(&self) -> EdgeId {
        let u = self.u as EdgeId;
        let v = self.v as EdgeId;
        v * v.saturating_sub(1) / 2 + u
    }

    pub fn is_loop(&self) -> bool {
        self.u == self.v
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((a, b): (NodeId, NodeId)) -> Self {
        Self::new(a, b)
    }
}

/// Weight of a node pair.
///
/// Positive finite weights are the cost of deleting a present edge, negative ones the cost of
/// inserting an absent edge. `Forbidden` and `Permanent` mark pairs whose status is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeWeight {
    Finite(f64),
    Forbidden,
    Permanent,
}

impl EdgeWeight {
    pub const ZERO: EdgeWeight = EdgeWeight::Finite(0.0);

    pub fn is_zero(&self) -> bool {
        matches!(self, EdgeWeight::Finite(w) if *w == 0.0)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, EdgeWeight::Forbidden | EdgeWeight::Permanent)
    }

    /// Signed real view used by cost arithmetic: `Forbidden` is `-inf`, `Permanent` is `+inf`.
    pub fn magnitude(&self) -> f64 {
        match *self {
            EdgeWeight::Finite(w) => w,
            EdgeWeight::Forbidden => f64::NEG_INFINITY,
            EdgeWeight::Permanent => f64::INFINITY,
        }
    }
}

impl Default for EdgeWeight {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for EdgeWeight {
    fn from(w: f64) -> Self {
        if w == f64::INFINITY {
            EdgeWeight::Permanent
        } else if w == f64::NEG_INFINITY {
            EdgeWeight::Forbidden
        } else {
            EdgeWeight::Finite(w)
        }
    }
}

/// Read-only graph view consumed by the induced-cost engine.
///
/// Ranks are dense in `1..=num_edges()`; rank `0` means "not individually tracked".
pub trait SparseGraph {
    fn num_nodes(&self) -> usize;

    fn num_edges(&self) -> usize;

    /// Neighbours of `u` joined by a non-zero weight, in ascending order.
    fn non_zero_neighbours(&self, u: NodeId) -> &[NodeId];

    fn weight(&self, e: Edge) -> EdgeWeight;

    fn weight_by_rank(&self, rank: RankId) -> EdgeWeight;

    fn find_index(&self, e: Edge) -> RankId;

    fn edge_of_rank(&self, rank: RankId) -> Option<Edge>;
}

impl<T: SparseGraph + ?Sized> SparseGraph for &T {
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    fn num_edges(&self) -> usize {
        (**self).num_edges()
    }

    fn non_zero_neighbours(&self, u: NodeId) -> &[NodeId] {
        (**self).non_zero_neighbours(u)
    }

    fn weight(&self, e: Edge) -> EdgeWeight {
        (**self).weight(e)
    }

    fn weight_by_rank(&self, rank: RankId) -> EdgeWeight {
        (**self).weight_by_rank(rank)
    }

    fn find_index(&self, e: Edge) -> RankId {
        (**self).find_index(e)
    }

    fn edge_of_rank(&self, rank: RankId) -> Option<Edge> {
        (**self).edge_of_rank(rank)
    }
}
