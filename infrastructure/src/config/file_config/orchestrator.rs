//! Orchestrator configuration from TOML (`[orchestrator]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use weather_application::{ExtractionMode, OrchestratorConfig};

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// "keyword", "completion" (or "llm"), or "hybrid"
    pub location_extraction: String,
    /// Rewrite responses through the completion service
    pub summarize: bool,
    pub max_locations_per_query: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            location_extraction: ExtractionMode::default().to_string(),
            summarize: false,
            max_locations_per_query: 10,
        }
    }
}

impl FileOrchestratorConfig {
    /// Parse the extraction mode, falling back to keyword on bad input
    pub fn parse_extraction(&self) -> (ExtractionMode, Vec<ConfigIssue>) {
        match self.location_extraction.parse::<ExtractionMode>() {
            Ok(mode) => (mode, Vec::new()),
            Err(message) => (
                ExtractionMode::default(),
                vec![ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "orchestrator.location_extraction".to_string(),
                        value: self.location_extraction.clone(),
                        valid_values: vec![
                            "keyword".to_string(),
                            "completion".to_string(),
                            "hybrid".to_string(),
                        ],
                    },
                    message: format!("orchestrator.location_extraction: {message}"),
                }],
            ),
        }
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            extraction: self.parse_extraction().0,
            summarize: self.summarize,
            max_locations: self.max_locations_per_query.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_falls_back() {
        let config = FileOrchestratorConfig {
            location_extraction: "regex".to_string(),
            ..FileOrchestratorConfig::default()
        };
        let (mode, issues) = config.parse_extraction();
        assert_eq!(mode, ExtractionMode::Keyword);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_to_orchestrator_config() {
        let config = FileOrchestratorConfig {
            location_extraction: "hybrid".to_string(),
            summarize: true,
            max_locations_per_query: 3,
        };
        let out = config.to_orchestrator_config();
        assert_eq!(out.extraction, ExtractionMode::Hybrid);
        assert!(out.summarize);
        assert_eq!(out.max_locations, 3);
    }
}
