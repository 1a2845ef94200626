//! Immutable weighted graph with dense edge ranks.
//!
//! Every node pair carrying a non-zero weight (including the fixed `Forbidden` / `Permanent`
//! states) receives a rank in `1..=num_edges`. Ranks follow ascending [`Edge::id`] order, so two
//! graphs built from the same weights always agree on the assignment.

use crate::error::{Error, Result};
use crate::{Edge, EdgeId, EdgeWeight, NodeId, RankId, SparseGraph};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Neighbour lists stored as one flat array plus per-node offsets.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    offsets: Vec<usize>,
    neighbours: Vec<NodeId>,
}

impl Adjacency {
    fn build(num_nodes: usize, edges: &[Edge]) -> Self {
        let mut degree: Vec<usize> = vec![0; num_nodes];
        for e in edges {
            degree[e.u] += 1;
            degree[e.v] += 1;
        }

        let mut offsets: Vec<usize> = Vec::with_capacity(num_nodes + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        let mut cursor: Vec<usize> = offsets[..num_nodes].to_vec();
        let mut neighbours: Vec<NodeId> = vec![0; edges.len() * 2];
        for e in edges {
            neighbours[cursor[e.u]] = e.v;
            cursor[e.u] += 1;
            neighbours[cursor[e.v]] = e.u;
            cursor[e.v] += 1;
        }
        for u in 0..num_nodes {
            neighbours[offsets[u]..offsets[u + 1]].sort_unstable();
        }

        Self {
            offsets,
            neighbours,
        }
    }

    fn of(&self, u: NodeId) -> &[NodeId] {
        match (self.offsets.get(u), self.offsets.get(u + 1)) {
            (Some(&start), Some(&end)) => &self.neighbours[start..end],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticSparseGraph {
    num_nodes: usize,
    adjacency: Adjacency,
    rank_index: HashMap<EdgeId, RankId>,
    // Indexed by rank; slot 0 is the untracked placeholder.
    edges: Vec<Option<Edge>>,
    weights: Vec<EdgeWeight>,
}

impl StaticSparseGraph {
    pub fn from_weighted_edges<I, W>(num_nodes: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, W)>,
        W: Into<EdgeWeight>,
    {
        let mut builder = GraphBuilder::new(num_nodes);
        for (a, b, w) in edges {
            builder.set_weight(a, b, w)?;
        }
        Ok(builder.build())
    }

    /// Ranked edges in rank order, paired with their rank and weight.
    pub fn ranked_edges(&self) -> impl Iterator<Item = (RankId, Edge, EdgeWeight)> + '_ {
        self.edges
            .iter()
            .zip(self.weights.iter())
            .enumerate()
            .filter_map(|(rank, (e, w))| e.map(|e| (rank, e, *w)))
    }

    pub fn degree(&self, u: NodeId) -> usize {
        self.adjacency.of(u).len()
    }
}

impl SparseGraph for StaticSparseGraph {
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn num_edges(&self) -> usize {
        self.edges.len() - 1
    }

    fn non_zero_neighbours(&self, u: NodeId) -> &[NodeId] {
        self.adjacency.of(u)
    }

    fn weight(&self, e: Edge) -> EdgeWeight {
        self.weight_by_rank(self.find_index(e))
    }

    fn weight_by_rank(&self, rank: RankId) -> EdgeWeight {
        self.weights.get(rank).copied().unwrap_or(EdgeWeight::ZERO)
    }

    fn find_index(&self, e: Edge) -> RankId {
        if e.is_loop() {
            return 0;
        }
        self.rank_index.get(&e.id()).copied().unwrap_or(0)
    }

    fn edge_of_rank(&self, rank: RankId) -> Option<Edge> {
        self.edges.get(rank).copied().flatten()
    }
}

/// Collects pair weights before freezing them into a [`StaticSparseGraph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    num_nodes: usize,
    weights: HashMap<EdgeId, (Edge, EdgeWeight)>,
}

impl GraphBuilder {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            weights: HashMap::default(),
        }
    }

    /// Sets the weight of `{a, b}`. A later call for the same pair overwrites the earlier one,
    /// and a zero weight removes the pair.
    pub fn set_weight(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: impl Into<EdgeWeight>,
    ) -> Result<&mut Self> {
        for node in [a, b] {
            if node >= self.num_nodes {
                return Err(Error::NodeOutOfRange {
                    node,
                    num_nodes: self.num_nodes,
                });
            }
        }
        let e = Edge::new(a, b);
        if e.is_loop() {
            return Err(Error::SelfLoop { node: a });
        }

        let weight = weight.into();
        if weight.is_zero() {
            self.weights.remove(&e.id());
        } else {
            self.weights.insert(e.id(), (e, weight));
        }
        Ok(self)
    }

    pub fn build(self) -> StaticSparseGraph {
        let mut entries: Vec<(EdgeId, Edge, EdgeWeight)> = self
            .weights
            .into_iter()
            .map(|(id, (e, w))| (id, e, w))
            .collect();
        entries.sort_unstable_by_key(|(id, _, _)| *id);

        let mut rank_index: HashMap<EdgeId, RankId> = HashMap::default();
        rank_index.reserve(entries.len());
        let mut edges: Vec<Option<Edge>> = Vec::with_capacity(entries.len() + 1);
        let mut weights: Vec<EdgeWeight> = Vec::with_capacity(entries.len() + 1);
        edges.push(None);
        weights.push(EdgeWeight::ZERO);

        for (id, e, w) in &entries {
            rank_index.insert(*id, edges.len());
            edges.push(Some(*e));
            weights.push(*w);
        }

        let ranked: Vec<Edge> = entries.iter().map(|(_, e, _)| *e).collect();
        StaticSparseGraph {
            num_nodes: self.num_nodes,
            adjacency: Adjacency::build(self.num_nodes, &ranked),
            rank_index,
            edges,
            weights,
        }
    }
}
