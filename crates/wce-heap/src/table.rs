//! Per-rank induced costs.

use crate::cost::{Cost, Dimension};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::kernel::{self, TriangleCost};
use crate::options::{EngineOptions, VERBOSITY_PROGRESS};
use wce_graph::{Edge, NodeId, RankId, SparseGraph};

#[derive(Debug, Clone, Default)]
pub struct CostTable {
    icf: Vec<Cost>,
    icp: Vec<Cost>,
    edges: Vec<Option<Edge>>,
    unprocessed: usize,
}

impl CostTable {
    /// A table for ranks `0..=num_ranks` with every entry removed.
    pub fn empty(num_ranks: usize) -> Self {
        Self {
            icf: vec![Cost::Removed; num_ranks + 1],
            icp: vec![Cost::Removed; num_ranks + 1],
            edges: vec![None; num_ranks + 1],
            unprocessed: 0,
        }
    }

    /// Computes `icf` / `icp` for every ranked edge of `graph`.
    ///
    /// Each edge starts from its own deletion or insertion cost and then collects one kernel
    /// contribution per common non-zero neighbour of its endpoints. Edges whose weight is
    /// already fixed stay removed and are not counted as unprocessed.
    pub fn compute<G: SparseGraph>(
        graph: &G,
        opts: &EngineOptions,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let num_nodes = graph.num_nodes();
        let mut table = Self::empty(graph.num_edges());
        let mut common: Vec<NodeId> = Vec::new();

        for u in 0..num_nodes {
            for &v in graph.non_zero_neighbours(u) {
                if v < u {
                    continue;
                }
                let uv = Edge::new(u, v);
                let rank = graph.find_index(uv);
                if rank == 0 || rank >= table.edges.len() {
                    continue;
                }
                table.edges[rank] = Some(uv);

                let w_uv = graph.weight_by_rank(rank);
                if w_uv.is_zero() || w_uv.is_fixed() {
                    continue;
                }

                let mut cost: TriangleCost = kernel::edge_cost(w_uv);

                common.clear();
                sorted_intersection(
                    graph.non_zero_neighbours(u),
                    graph.non_zero_neighbours(v),
                    &mut common,
                );
                for &w in &common {
                    cost += kernel::triangle_cost(
                        graph.weight(Edge::new(u, w)),
                        graph.weight(Edge::new(v, w)),
                    );
                }

                table.icf[rank] = Cost::Live(cost.forbid);
                table.icp[rank] = Cost::Live(cost.permanent);
                table.unprocessed += 1;
            }

            if opts.logs(VERBOSITY_PROGRESS) {
                tracing::debug!(
                    node = u,
                    num_nodes,
                    tracked = table.unprocessed,
                    "precomputing induced costs"
                );
            }
        }

        table.check_nan(diagnostics);
        table
    }

    /// Reports the first `NaN` per column. Best effort; later offenders in the same column are
    /// not reported.
    fn check_nan(&self, diagnostics: &mut Diagnostics) {
        for dimension in Dimension::ALL {
            let column = self.column(dimension);
            let first = column
                .iter()
                .enumerate()
                .skip(1)
                .find(|(_, c)| c.value().is_some_and(f64::is_nan));
            if let Some((rank, _)) = first {
                diagnostics.report(Diagnostic::NanCost { dimension, rank });
            }
        }
    }

    pub fn num_ranks(&self) -> usize {
        self.icf.len().saturating_sub(1)
    }

    pub fn column(&self, dimension: Dimension) -> &[Cost] {
        match dimension {
            Dimension::Forbid => &self.icf,
            Dimension::Permanent => &self.icp,
        }
    }

    fn column_mut(&mut self, dimension: Dimension) -> &mut [Cost] {
        match dimension {
            Dimension::Forbid => &mut self.icf,
            Dimension::Permanent => &mut self.icp,
        }
    }

    pub fn get(&self, dimension: Dimension, rank: RankId) -> Cost {
        self.column(dimension)
            .get(rank)
            .copied()
            .unwrap_or(Cost::Removed)
    }

    pub fn set(&mut self, dimension: Dimension, rank: RankId, cost: Cost) {
        if let Some(slot) = self.column_mut(dimension).get_mut(rank) {
            *slot = cost;
        }
    }

    pub fn edge(&self, rank: RankId) -> Option<Edge> {
        self.edges.get(rank).copied().flatten()
    }

    pub fn unprocessed(&self) -> usize {
        self.unprocessed
    }

    /// Marks both columns of `rank` removed. Returns `false` if the entry was already removed.
    pub fn mark_removed(&mut self, rank: RankId) -> bool {
        if rank == 0 || !(self.get(Dimension::Forbid, rank).is_live()
            || self.get(Dimension::Permanent, rank).is_live())
        {
            return false;
        }
        self.set(Dimension::Forbid, rank, Cost::Removed);
        self.set(Dimension::Permanent, rank, Cost::Removed);
        self.unprocessed = self.unprocessed.saturating_sub(1);
        true
    }
}

/// Appends the common elements of two ascending slices to `out`.
fn sorted_intersection(a: &[NodeId], b: &[NodeId], out: &mut Vec<NodeId>) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_sorted_lists() {
        let mut out = Vec::new();
        sorted_intersection(&[0, 2, 3, 7, 9], &[1, 2, 7, 8, 9], &mut out);
        assert_eq!(out, vec![2, 7, 9]);

        out.clear();
        sorted_intersection(&[], &[1, 2], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn removal_counts_once() {
        let mut t = CostTable::empty(2);
        t.set(Dimension::Forbid, 1, Cost::Live(1.0));
        t.set(Dimension::Permanent, 1, Cost::ZERO);
        t.unprocessed = 1;

        assert!(t.mark_removed(1));
        assert!(!t.mark_removed(1));
        assert!(!t.mark_removed(0));
        assert_eq!(t.unprocessed(), 0);
        assert_eq!(t.get(Dimension::Permanent, 1), Cost::Removed);
    }
}
