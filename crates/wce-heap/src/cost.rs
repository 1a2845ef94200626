//! Induced cost values and the two cost dimensions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// State of one cost entry.
///
/// `Live` values are non-negative. Once an entry is `Removed` it never becomes live again and it
/// orders below every live value, so it sinks to the leaves of a max-heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    Live(f64),
    #[default]
    Removed,
}

impl Cost {
    pub const ZERO: Cost = Cost::Live(0.0);

    pub fn is_live(&self) -> bool {
        matches!(self, Cost::Live(_))
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Cost::Removed)
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            Cost::Live(v) => Some(v),
            Cost::Removed => None,
        }
    }

    /// Adds `delta` to a live value, clamping the result at zero. Removed entries stay removed.
    pub fn bumped(self, delta: f64) -> Cost {
        match self {
            Cost::Live(v) => Cost::Live((v + delta).max(0.0)),
            Cost::Removed => Cost::Removed,
        }
    }

    /// True if this entry is worth branching on.
    pub fn is_positive(&self) -> bool {
        matches!(self, Cost::Live(v) if *v > 0.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Cost::Removed, Cost::Removed) => Some(Ordering::Equal),
            (Cost::Removed, Cost::Live(_)) => Some(Ordering::Less),
            (Cost::Live(_), Cost::Removed) => Some(Ordering::Greater),
            (Cost::Live(a), Cost::Live(b)) => a.partial_cmp(b),
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Live(v) => write!(f, "{v}"),
            Cost::Removed => f.write_str("removed"),
        }
    }
}

/// Which induced cost a table column or heap tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Cost induced by forbidding the edge (`icf`).
    Forbid,
    /// Cost induced by making the edge permanent (`icp`).
    Permanent,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Forbid, Dimension::Permanent];

    pub fn short_name(&self) -> &'static str {
        match self {
            Dimension::Forbid => "icf",
            Dimension::Permanent => "icp",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
