//! Anomalies observed while maintaining the cost table.
//!
//! None of these stop the engine. Each one is emitted as a `tracing` warning and, when enabled,
//! kept in an in-memory log so callers can inspect what happened without parsing text output.

use crate::cost::Dimension;
use serde::Serialize;
use wce_graph::RankId;

/// Which side of a merge was already removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeSide {
    Survivor,
    Absorbed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An operation that needs a live entry was called with an untracked edge.
    RankZeroAccess { operation: &'static str },
    /// The first `NaN` found in a cost column after initialization.
    NanCost { dimension: Dimension, rank: RankId },
    /// A merge touched an entry that was already removed; its cost was left out of the sum.
    MergeWithRemoved {
        dimension: Dimension,
        survivor: RankId,
        absorbed: RankId,
        removed_side: MergeSide,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    record: bool,
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(record: bool) -> Self {
        Self {
            record,
            events: Vec::new(),
        }
    }

    pub fn report(&mut self, event: Diagnostic) {
        match &event {
            Diagnostic::RankZeroAccess { operation } => {
                tracing::warn!(operation, "cost lookup on an edge with rank 0");
            }
            Diagnostic::NanCost { dimension, rank } => {
                tracing::warn!(%dimension, rank, "NaN in induced cost table");
            }
            Diagnostic::MergeWithRemoved {
                dimension,
                survivor,
                absorbed,
                removed_side,
            } => {
                tracing::warn!(
                    %dimension,
                    survivor,
                    absorbed,
                    ?removed_side,
                    "merged edge bundle has a removed cost entry"
                );
            }
        }
        if self.record {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.events)
    }
}
