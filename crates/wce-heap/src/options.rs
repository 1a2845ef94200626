//! Engine configuration.

use serde::Deserialize;

pub const VERBOSITY_ENV: &str = "WCE_HEAP_VERBOSITY";
pub const DIAGNOSTICS_ENV: &str = "WCE_HEAP_DIAGNOSTICS";

/// Log max-edge queries and removals.
pub const VERBOSITY_OPERATIONS: u8 = 4;
/// Log initialization progress per node row.
pub const VERBOSITY_PROGRESS: u8 = 5;
/// Dump both heaps on every max-edge query.
pub const VERBOSITY_HEAP_DUMP: u8 = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Gates per-operation `tracing` events. Never changes results.
    pub verbosity: u8,
    /// Keep reported anomalies in memory in addition to logging them.
    pub record_diagnostics: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            verbosity: 0,
            record_diagnostics: true,
        }
    }
}

impl EngineOptions {
    /// Defaults overridden by `WCE_HEAP_VERBOSITY` and `WCE_HEAP_DIAGNOSTICS`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(v) = std::env::var(VERBOSITY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u8>().ok())
        {
            opts.verbosity = v;
        }
        if let Ok(v) = std::env::var(DIAGNOSTICS_ENV) {
            opts.record_diagnostics = parse_env_bool(&v);
        }
        opts
    }

    pub(crate) fn logs(&self, level: u8) -> bool {
        self.verbosity >= level
    }
}

fn parse_env_bool(v: &str) -> bool {
    match v.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => false,
        _ => true,
    }
}
