//! Edge bundles: groups of ranks that share one cost entry after node contractions.
//!
//! Every rank starts in its own bundle and is its own representative. A union moves the members
//! of the smaller bundle into the larger one, so each rank is relabelled at most `log2(n)` times
//! and `find` never needs to walk a chain.

use wce_graph::RankId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Union {
    pub survivor: RankId,
    pub absorbed: RankId,
}

#[derive(Debug, Clone, Default)]
pub struct Bundles {
    bundle_of: Vec<RankId>,
    members: Vec<Vec<RankId>>,
}

impl Bundles {
    /// Singleton bundles for ranks `1..=num_ranks`. Rank `0` belongs to no bundle.
    pub fn singletons(num_ranks: usize) -> Self {
        let mut bundle_of: Vec<RankId> = Vec::with_capacity(num_ranks + 1);
        let mut members: Vec<Vec<RankId>> = Vec::with_capacity(num_ranks + 1);
        bundle_of.push(0);
        members.push(Vec::new());
        for rank in 1..=num_ranks {
            bundle_of.push(rank);
            members.push(vec![rank]);
        }
        Self { bundle_of, members }
    }

    pub fn num_ranks(&self) -> usize {
        self.bundle_of.len().saturating_sub(1)
    }

    /// Representative of the bundle holding `rank`, or `None` for rank `0` and unknown ranks.
    pub fn find(&self, rank: RankId) -> Option<RankId> {
        if rank == 0 {
            return None;
        }
        self.bundle_of.get(rank).copied()
    }

    pub fn members(&self, representative: RankId) -> &[RankId] {
        self.members
            .get(representative)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn size(&self, representative: RankId) -> usize {
        self.members(representative).len()
    }

    /// Joins the bundles of `a` and `b`.
    ///
    /// Returns `None` when either rank has no bundle or both already share one. On equal sizes
    /// the bundle of `b` survives.
    pub fn union(&mut self, a: RankId, b: RankId) -> Option<Union> {
        let ba = self.find(a)?;
        let bb = self.find(b)?;
        if ba == bb {
            return None;
        }

        let (survivor, absorbed) = if self.size(ba) > self.size(bb) {
            (ba, bb)
        } else {
            (bb, ba)
        };

        let moved = std::mem::take(&mut self.members[absorbed]);
        for &rank in &moved {
            self.bundle_of[rank] = survivor;
        }
        self.members[survivor].extend(moved);

        Some(Union { survivor, absorbed })
    }
}
