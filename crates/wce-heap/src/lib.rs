#![forbid(unsafe_code)]

//! Induced-cost edge heaps for weighted cluster editing.
//!
//! A branch-and-bound solver repeatedly asks which edge is the most expensive to forbid and
//! which is the most expensive to make permanent, commits one of those decisions, and feeds the
//! consequences back. [`EdgeHeap`] keeps both answers available in O(1) and absorbs each update
//! in O(log n), including the merging of edges that become one after node contractions.

pub use wce_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bundle;
pub mod cost;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod heap;
pub mod kernel;
pub mod options;
pub mod table;

pub use cost::{Cost, Dimension};
pub use diagnostics::{Diagnostic, MergeSide};
pub use engine::{CostSnapshot, EdgeHeap, EntrySnapshot};
pub use error::{Error, Result};
pub use heap::{HeapViolation, IndexedMaxHeap};
pub use options::EngineOptions;
