//! Consensus source configuration from TOML (`[sources]` section)

use crate::sources::{DEFAULT_NWS_BASE_URL, DEFAULT_WTTR_BASE_URL, KNOWN_SOURCES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weather_domain::ReliabilityTable;

/// Raw sources configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourcesConfig {
    /// Source ids queried for consensus, in order
    pub enabled: Vec<String>,
    pub nws_base_url: String,
    pub wttr_base_url: String,
    /// Reliability in (0, 1] per source id
    pub reliability: BTreeMap<String, f64>,
    /// Reliability of sources missing from the table
    pub default_reliability: f64,
    /// Copies per unit of reliability in the weighted mean
    pub replication_factor: u32,
}

impl Default for FileSourcesConfig {
    fn default() -> Self {
        let table = ReliabilityTable::default();
        Self {
            enabled: KNOWN_SOURCES.iter().map(|s| s.to_string()).collect(),
            nws_base_url: DEFAULT_NWS_BASE_URL.to_string(),
            wttr_base_url: DEFAULT_WTTR_BASE_URL.to_string(),
            reliability: KNOWN_SOURCES
                .iter()
                .map(|s| (s.to_string(), table.reliability(s)))
                .collect(),
            default_reliability: table.default_reliability(),
            replication_factor: table.replication_factor(),
        }
    }
}

impl FileSourcesConfig {
    pub fn to_reliability_table(&self) -> ReliabilityTable {
        ReliabilityTable::new(
            self.reliability.clone(),
            self.default_reliability,
            self.replication_factor.max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_domain() {
        let table = FileSourcesConfig::default().to_reliability_table();
        assert_eq!(table.reliability("nws"), 0.9);
        assert_eq!(table.reliability("wttr"), 0.8);
        assert_eq!(table.reliability("mcp"), 0.85);
        assert_eq!(table.reliability("other"), 0.5);
    }

    #[test]
    fn test_override_single_weight() {
        let toml_str = r#"
[sources.reliability]
wttr = 0.6
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let table = config.sources.to_reliability_table();
        assert_eq!(table.reliability("wttr"), 0.6);
        // A table given in TOML replaces the defaults entirely
        assert_eq!(table.reliability("nws"), 0.5);
    }
}
