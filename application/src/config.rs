//! Application-level configuration.
//!
//! These types control how use cases behave. They are plain values; loading
//! them from files is the infrastructure layer's job.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use weather_domain::Thresholds;

/// How locations are pulled out of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Static gazetteer only
    #[default]
    Keyword,
    /// Ask the completion service, keyword result on failure
    Completion,
    /// Keyword first; completion only when keyword found nothing
    Hybrid,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Keyword => "keyword",
            ExtractionMode::Completion => "completion",
            ExtractionMode::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(ExtractionMode::Keyword),
            "completion" | "llm" => Ok(ExtractionMode::Completion),
            "hybrid" => Ok(ExtractionMode::Hybrid),
            other => Err(format!(
                "unknown location extraction mode '{other}' (expected keyword, completion or hybrid)"
            )),
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Behaviour of the query orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub extraction: ExtractionMode,
    /// Rewrite formatted responses through the completion service
    pub summarize: bool,
    pub max_locations: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionMode::Keyword,
            summarize: false,
            max_locations: 10,
        }
    }
}

/// Defaults and timing for alert subscriptions and monitoring
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    /// Used when a subscription or intelligence query names no location
    pub default_location: String,
    /// Applied to subscriptions that don't set their own
    pub thresholds: Thresholds,
    pub monitor_interval: Duration,
    /// Sleep after a failed monitoring pass
    pub error_backoff: Duration,
    /// Triggered alerts kept in memory
    pub history_limit: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            default_location: "San Francisco".to_string(),
            thresholds: Thresholds {
                temperature_high: Some(85.0),
                temperature_low: Some(35.0),
            },
            monitor_interval: Duration::from_secs(30 * 60),
            error_backoff: Duration::from_secs(60),
            history_limit: 500,
        }
    }
}
