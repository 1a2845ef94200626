//! The induced-cost engine queried by the branch-and-bound search.

use crate::bundle::{Bundles, Union};
use crate::cost::{Cost, Dimension};
use crate::diagnostics::{Diagnostic, Diagnostics, MergeSide};
use crate::error::{Error, Result};
use crate::heap::{HeapViolation, IndexedMaxHeap};
use crate::options::{EngineOptions, VERBOSITY_HEAP_DUMP, VERBOSITY_OPERATIONS};
use crate::table::CostTable;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Write as _;
use wce_graph::{Edge, RankId, SparseGraph};

/// Induced costs of forbidding and of fixing every ranked edge, kept in two max-heaps.
///
/// The engine holds no undo log. A search that backtracks clones the engine before branching
/// and drops the clone afterwards; cloning does not require the graph to be `Clone`.
pub struct EdgeHeap<'g, G: SparseGraph> {
    graph: &'g G,
    options: EngineOptions,
    table: CostTable,
    bundles: Bundles,
    forbid_heap: IndexedMaxHeap,
    perm_heap: IndexedMaxHeap,
    // Lookups take `&self` but still need to report misuse.
    diagnostics: RefCell<Diagnostics>,
    initialized: bool,
}

impl<G: SparseGraph> Clone for EdgeHeap<'_, G> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            options: self.options.clone(),
            table: self.table.clone(),
            bundles: self.bundles.clone(),
            forbid_heap: self.forbid_heap.clone(),
            perm_heap: self.perm_heap.clone(),
            diagnostics: self.diagnostics.clone(),
            initialized: self.initialized,
        }
    }
}

impl<'g, G: SparseGraph> EdgeHeap<'g, G> {
    pub fn new(graph: &'g G, options: EngineOptions) -> Self {
        let diagnostics = Diagnostics::new(options.record_diagnostics);
        Self {
            graph,
            table: CostTable::empty(graph.num_edges()),
            bundles: Bundles::default(),
            forbid_heap: IndexedMaxHeap::default(),
            perm_heap: IndexedMaxHeap::default(),
            diagnostics: RefCell::new(diagnostics),
            initialized: false,
            options,
        }
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Computes all induced costs and builds both heaps. Must be called exactly once.
    pub fn init_induced_costs(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }

        let num_ranks = self.graph.num_edges();
        self.table = CostTable::compute(
            self.graph,
            &self.options,
            self.diagnostics.get_mut(),
        );

        let table = &self.table;
        self.forbid_heap =
            IndexedMaxHeap::build(1..=num_ranks, |r| table.get(Dimension::Forbid, r));
        self.perm_heap =
            IndexedMaxHeap::build(1..=num_ranks, |r| table.get(Dimension::Permanent, r));
        self.bundles = Bundles::singletons(num_ranks);
        self.initialized = true;

        if self.options.logs(VERBOSITY_OPERATIONS) {
            tracing::debug!(
                ranks = num_ranks,
                tracked = self.table.unprocessed(),
                "induced costs initialized"
            );
        }
        Ok(())
    }

    /// Edge whose forbidding is currently most expensive, or `None` when no edge with a positive
    /// cost is left.
    pub fn max_forbid_edge(&self) -> Option<Edge> {
        self.max_edge(Dimension::Forbid)
    }

    /// Edge whose fixing is currently most expensive, or `None` when no edge with a positive
    /// cost is left.
    pub fn max_perm_edge(&self) -> Option<Edge> {
        self.max_edge(Dimension::Permanent)
    }

    fn max_edge(&self, dimension: Dimension) -> Option<Edge> {
        let top = self.heap(dimension).peek_max()?;
        let cost = self.table.get(dimension, top);
        if !cost.is_positive() {
            return None;
        }
        let edge = self.table.edge(top)?;

        if self.options.logs(VERBOSITY_HEAP_DUMP) {
            tracing::trace!(
                %dimension,
                heap = %self.dump_heap(dimension),
                "heap contents"
            );
        } else if self.options.logs(VERBOSITY_OPERATIONS) {
            tracing::debug!(
                %dimension,
                rank = top,
                u = edge.u,
                v = edge.v,
                %cost,
                "max edge"
            );
        }
        Some(edge)
    }

    fn dump_heap(&self, dimension: Dimension) -> String {
        let mut out = String::new();
        for rank in self.heap(dimension).iter() {
            let cost = self.table.get(dimension, rank);
            match self.table.edge(rank) {
                Some(e) => {
                    let _ = write!(out, "({},{})={} ; ", e.u, e.v, cost);
                }
                None => {
                    let _ = write!(out, "#{rank}={cost} ; ");
                }
            }
        }
        out
    }

    /// Current `icf` of the bundle containing `edge`.
    pub fn forbid_cost(&self, edge: Edge) -> Cost {
        self.bundle_cost(Dimension::Forbid, edge, "forbid_cost")
    }

    /// Current `icp` of the bundle containing `edge`.
    pub fn perm_cost(&self, edge: Edge) -> Cost {
        self.bundle_cost(Dimension::Permanent, edge, "perm_cost")
    }

    fn bundle_cost(&self, dimension: Dimension, edge: Edge, operation: &'static str) -> Cost {
        let rank = self.graph.find_index(edge);
        if rank == 0 {
            self.diagnostics
                .borrow_mut()
                .report(Diagnostic::RankZeroAccess { operation });
            return Cost::Removed;
        }
        let bundle = self.bundles.find(rank).unwrap_or(rank);
        self.table.get(dimension, bundle)
    }

    pub fn increase_forbid_cost(&mut self, edge: Edge, delta: f64) {
        self.increase_cost(Dimension::Forbid, edge, delta);
    }

    pub fn increase_perm_cost(&mut self, edge: Edge, delta: f64) {
        self.increase_cost(Dimension::Permanent, edge, delta);
    }

    /// Adds `delta` to the bundle of `edge`, never letting the value drop below zero. Removed
    /// entries and untracked edges are left alone.
    pub fn increase_cost(&mut self, dimension: Dimension, edge: Edge, delta: f64) {
        let rank = self.graph.find_index(edge);
        if rank == 0 || delta == 0.0 {
            return;
        }
        let Some(bundle) = self.bundles.find(rank) else {
            return;
        };
        let current = self.table.get(dimension, bundle);
        if !current.is_live() {
            return;
        }
        self.table.set(dimension, bundle, current.bumped(delta));
        self.reheapify(dimension, bundle, delta);
    }

    /// Joins the bundles of `e1` and `e2` after their endpoints were contracted into one edge.
    ///
    /// The smaller bundle is absorbed: its live costs are added to the survivor and its own entry
    /// is removed from both heaps. A removed entry on either side is reported and left out of
    /// the sum.
    pub fn merge_edges(&mut self, e1: Edge, e2: Edge) {
        let r1 = self.graph.find_index(e1);
        let r2 = self.graph.find_index(e2);
        if r1 == 0 || r2 == 0 {
            return;
        }
        let Some(Union { survivor, absorbed }) = self.bundles.union(r1, r2) else {
            return;
        };

        if self.options.logs(VERBOSITY_OPERATIONS) {
            tracing::debug!(
                survivor,
                absorbed,
                size = self.bundles.size(survivor),
                "merging edge bundles"
            );
        }

        for dimension in Dimension::ALL {
            match (
                self.table.get(dimension, survivor),
                self.table.get(dimension, absorbed),
            ) {
                (Cost::Live(kept), Cost::Live(added)) => {
                    self.table.set(dimension, survivor, Cost::Live(kept + added));
                    self.reheapify(dimension, survivor, added);
                }
                (_, Cost::Removed) => {
                    self.report(Diagnostic::MergeWithRemoved {
                        dimension,
                        survivor,
                        absorbed,
                        removed_side: MergeSide::Absorbed,
                    });
                }
                (Cost::Removed, Cost::Live(_)) => {
                    self.report(Diagnostic::MergeWithRemoved {
                        dimension,
                        survivor,
                        absorbed,
                        removed_side: MergeSide::Survivor,
                    });
                }
            }
        }

        self.remove_entry(absorbed);
    }

    /// Takes the bundle of `edge` out of contention in both heaps. Idempotent.
    pub fn remove_edge(&mut self, edge: Edge) {
        self.remove_rank(self.graph.find_index(edge));
    }

    /// Like [`remove_edge`](Self::remove_edge), addressed by rank. Rank `0` is ignored.
    pub fn remove_rank(&mut self, rank: RankId) {
        if rank == 0 {
            return;
        }
        let bundle = self.bundles.find(rank).unwrap_or(rank);
        self.remove_entry(bundle);
    }

    fn remove_entry(&mut self, rank: RankId) {
        if self.options.logs(VERBOSITY_OPERATIONS) {
            if let Some(e) = self.table.edge(rank) {
                tracing::debug!(rank, u = e.u, v = e.v, "removing edge from heap");
            }
        }
        if self.table.mark_removed(rank) {
            let table = &self.table;
            self.forbid_heap
                .remove(rank, |r| table.get(Dimension::Forbid, r));
            self.perm_heap
                .remove(rank, |r| table.get(Dimension::Permanent, r));
        }
    }

    fn reheapify(&mut self, dimension: Dimension, rank: RankId, delta: f64) {
        let table = &self.table;
        let heap = match dimension {
            Dimension::Forbid => &mut self.forbid_heap,
            Dimension::Permanent => &mut self.perm_heap,
        };
        heap.reheapify(rank, delta, |r| table.get(dimension, r));
    }

    fn report(&mut self, event: Diagnostic) {
        self.diagnostics.get_mut().report(event);
    }

    /// Number of entries that are neither removed nor absorbed.
    pub fn unprocessed_count(&self) -> usize {
        self.table.unprocessed()
    }

    pub fn heap(&self, dimension: Dimension) -> &IndexedMaxHeap {
        match dimension {
            Dimension::Forbid => &self.forbid_heap,
            Dimension::Permanent => &self.perm_heap,
        }
    }

    /// Raw table slot of `rank`, without resolving its bundle.
    pub fn cost_of_rank(&self, dimension: Dimension, rank: RankId) -> Cost {
        self.table.get(dimension, rank)
    }

    /// Representative rank of the bundle holding `edge`.
    pub fn bundle_of(&self, edge: Edge) -> Option<RankId> {
        self.bundles.find(self.graph.find_index(edge))
    }

    pub fn bundle_members(&self, edge: Edge) -> &[RankId] {
        match self.bundle_of(edge) {
            Some(bundle) => self.bundles.members(bundle),
            None => &[],
        }
    }

    pub fn validate_heaps(&self) -> std::result::Result<(), HeapViolation> {
        for dimension in Dimension::ALL {
            self.heap(dimension)
                .validate(|r| self.table.get(dimension, r))?;
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().events().to_vec()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.get_mut().take()
    }

    pub fn snapshot(&self) -> CostSnapshot {
        let entries = (1..=self.table.num_ranks())
            .map(|rank| EntrySnapshot {
                rank,
                edge: self.table.edge(rank),
                bundle: self.bundles.find(rank),
                icf: self.table.get(Dimension::Forbid, rank),
                icp: self.table.get(Dimension::Permanent, rank),
            })
            .collect();
        CostSnapshot {
            unprocessed: self.table.unprocessed(),
            entries,
        }
    }
}

/// Serializable view of the cost table, one entry per rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSnapshot {
    pub unprocessed: usize,
    pub entries: Vec<EntrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    pub rank: RankId,
    pub edge: Option<Edge>,
    pub bundle: Option<RankId>,
    pub icf: Cost,
    pub icp: Cost,
}
