//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts into the application-layer type it configures.

mod alerts;
mod completion;
mod logging;
mod orchestrator;
mod server;
mod sources;

pub use alerts::FileAlertsConfig;
pub use completion::FileCompletionConfig;
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use server::FileServerConfig;
pub use sources::FileSourcesConfig;

use super::validation::{ConfigIssue, ConfigIssueCode, Severity};
use crate::http::normalize_base_url;
use crate::sources::KNOWN_SOURCES;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Weather-tool server connection
    pub server: FileServerConfig,
    /// Consensus sources and their reliability
    pub sources: FileSourcesConfig,
    /// Query orchestration behaviour
    pub orchestrator: FileOrchestratorConfig,
    /// Optional text-completion service
    pub completion: FileCompletionConfig,
    /// Subscription defaults and monitoring cadence
    pub alerts: FileAlertsConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks enum values, reliability ranges, intervals and URLs. Invalid
    /// values never abort loading; callers decide whether to print or fail.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Enum parse validation
        issues.extend(self.orchestrator.parse_extraction().1);

        // 2. URLs
        let mut urls = vec![
            ("server.base_url", &self.server.base_url),
            ("sources.nws_base_url", &self.sources.nws_base_url),
            ("sources.wttr_base_url", &self.sources.wttr_base_url),
        ];
        if self.completion.enabled {
            urls.push(("completion.base_url", &self.completion.base_url));
        }
        for (field, url) in urls {
            if let Err(e) = normalize_base_url(url) {
                issues.push(ConfigIssue::invalid_url(field, url, e));
            }
        }

        // 3. Sources
        for name in &self.sources.enabled {
            if !KNOWN_SOURCES.contains(&name.as_str()) {
                issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::UnknownSource { name: name.clone() },
                    message: format!(
                        "sources.enabled: unknown source '{}' will be ignored (known: {})",
                        name,
                        KNOWN_SOURCES.join(", ")
                    ),
                });
            }
        }
        if self.sources.enabled.is_empty() {
            issues.push(ConfigIssue::out_of_range(
                "sources.enabled",
                "sources.enabled: at least one source is required for consensus".to_string(),
            ));
        }

        // 4. Reliability values
        let weights = self
            .sources
            .reliability
            .iter()
            .map(|(name, value)| (format!("sources.reliability.{name}"), *value))
            .chain(std::iter::once((
                "sources.default_reliability".to_string(),
                self.sources.default_reliability,
            )));
        for (field, value) in weights {
            if !(value > 0.0 && value <= 1.0) {
                issues.push(ConfigIssue::out_of_range(
                    &field,
                    format!("{field}: {value} must be in (0, 1]"),
                ));
            }
        }
        if self.sources.replication_factor == 0 {
            issues.push(ConfigIssue::out_of_range(
                "sources.replication_factor",
                "sources.replication_factor: must be at least 1".to_string(),
            ));
        }

        // 5. Intervals and limits
        if self.alerts.monitor_interval_minutes == 0 {
            issues.push(ConfigIssue::out_of_range(
                "alerts.monitor_interval_minutes",
                "alerts.monitor_interval_minutes: must be at least 1".to_string(),
            ));
        }
        if self.server.timeout_secs == 0 || self.server.forecast_timeout_secs == 0 {
            issues.push(ConfigIssue::out_of_range(
                "server.timeout_secs",
                "server timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.orchestrator.max_locations_per_query == 0 {
            issues.push(ConfigIssue::out_of_range(
                "orchestrator.max_locations_per_query",
                "orchestrator.max_locations_per_query: must be at least 1".to_string(),
            ));
        }
        if let (Some(high), Some(low)) = (self.alerts.temperature_high, self.alerts.temperature_low)
            && low >= high
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::OutOfRange {
                    field: "alerts.temperature_low".to_string(),
                },
                message: format!(
                    "alerts: temperature_low ({low}) is not below temperature_high ({high})"
                ),
            });
        }

        issues
    }
}
