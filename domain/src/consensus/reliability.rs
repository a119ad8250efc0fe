//! Per-source reliability weights

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_RELIABILITY: f64 = 0.5;
pub const DEFAULT_REPLICATION_FACTOR: u32 = 10;

/// How much each source's reading counts in a consensus.
///
/// A reading is replicated `round(reliability × replication_factor)` times
/// (at least once) before averaging, so a source with reliability 0.9
/// outweighs one with 0.8 by 9 copies to 8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityTable {
    weights: BTreeMap<String, f64>,
    default_reliability: f64,
    replication_factor: u32,
}

impl Default for ReliabilityTable {
    fn default() -> Self {
        let weights = [("nws", 0.9), ("wttr", 0.8), ("mcp", 0.85)]
            .into_iter()
            .map(|(source, w)| (source.to_string(), w))
            .collect();
        Self {
            weights,
            default_reliability: DEFAULT_RELIABILITY,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl ReliabilityTable {
    pub fn new(
        weights: BTreeMap<String, f64>,
        default_reliability: f64,
        replication_factor: u32,
    ) -> Self {
        Self {
            weights,
            default_reliability,
            replication_factor,
        }
    }

    pub fn with_weight(mut self, source: impl Into<String>, reliability: f64) -> Self {
        self.weights.insert(source.into(), reliability);
        self
    }

    /// Reliability of a source; unknown sources get the default
    pub fn reliability(&self, source: &str) -> f64 {
        self.weights
            .get(source)
            .copied()
            .unwrap_or(self.default_reliability)
    }

    /// Number of copies a reading from `source` contributes
    pub fn copies(&self, source: &str) -> usize {
        let copies = (self.reliability(source) * f64::from(self.replication_factor)).round();
        if copies.is_finite() && copies >= 1.0 {
            copies as usize
        } else {
            1
        }
    }

    pub fn default_reliability(&self) -> f64 {
        self.default_reliability
    }

    pub fn replication_factor(&self) -> u32 {
        self.replication_factor
    }
}
