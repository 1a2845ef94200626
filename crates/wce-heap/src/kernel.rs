//! Triangle contributions to induced costs.
//!
//! For an edge `uv` and a common neighbour `w`, the weights of `uw` and `vw` decide how much
//! forbidding or fixing `uv` will cost later:
//!
//! - forbidding `uv` while both `uw` and `vw` are present forces one of them to be deleted,
//!   costing at least `min(w_uw, w_vw)`;
//! - making `uv` permanent while exactly one of `uw`, `vw` is present forces either a deletion
//!   or an insertion, costing at least `min(|w_uw|, |w_vw|)`.
//!
//! Fixed weights take part as `±inf`, so a triangle that can no longer be repaired contributes
//! an infinite cost.

use wce_graph::EdgeWeight;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriangleCost {
    pub forbid: f64,
    pub permanent: f64,
}

pub fn forbid_contribution(uw: EdgeWeight, vw: EdgeWeight) -> f64 {
    let (a, b) = (uw.magnitude(), vw.magnitude());
    if a > 0.0 && b > 0.0 { a.min(b) } else { 0.0 }
}

pub fn permanent_contribution(uw: EdgeWeight, vw: EdgeWeight) -> f64 {
    let (a, b) = (uw.magnitude(), vw.magnitude());
    if (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0) {
        a.abs().min(b.abs())
    } else {
        0.0
    }
}

pub fn triangle_cost(uw: EdgeWeight, vw: EdgeWeight) -> TriangleCost {
    TriangleCost {
        forbid: forbid_contribution(uw, vw),
        permanent: permanent_contribution(uw, vw),
    }
}

/// Direct cost of the edge itself: deleting a present edge feeds `icf`, inserting an absent one
/// feeds `icp`.
pub fn edge_cost(uv: EdgeWeight) -> TriangleCost {
    let w = uv.magnitude();
    if w >= 0.0 {
        TriangleCost {
            forbid: w,
            permanent: 0.0,
        }
    } else {
        TriangleCost {
            forbid: 0.0,
            permanent: -w,
        }
    }
}

impl std::ops::AddAssign for TriangleCost {
    fn add_assign(&mut self, rhs: Self) {
        self.forbid += rhs.forbid;
        self.permanent += rhs.permanent;
    }
}
