//! Alert monitoring configuration from TOML (`[alerts]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use weather_application::AlertConfig;
use weather_domain::Thresholds;

/// Raw alerts configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAlertsConfig {
    /// Location used when a subscription or intelligence query names none
    pub default_location: String,
    /// Fahrenheit
    pub temperature_high: Option<f64>,
    /// Fahrenheit
    pub temperature_low: Option<f64>,
    pub monitor_interval_minutes: u64,
    pub error_backoff_secs: u64,
    pub history_limit: usize,
}

impl Default for FileAlertsConfig {
    fn default() -> Self {
        let defaults = AlertConfig::default();
        Self {
            default_location: defaults.default_location,
            temperature_high: defaults.thresholds.temperature_high,
            temperature_low: defaults.thresholds.temperature_low,
            monitor_interval_minutes: defaults.monitor_interval.as_secs() / 60,
            error_backoff_secs: defaults.error_backoff.as_secs(),
            history_limit: defaults.history_limit,
        }
    }
}

impl FileAlertsConfig {
    pub fn to_alert_config(&self) -> AlertConfig {
        AlertConfig {
            default_location: self.default_location.clone(),
            thresholds: Thresholds {
                temperature_high: self.temperature_high,
                temperature_low: self.temperature_low,
            },
            monitor_interval: Duration::from_secs(self.monitor_interval_minutes.max(1) * 60),
            error_backoff: Duration::from_secs(self.error_backoff_secs),
            history_limit: self.history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_application_defaults() {
        assert_eq!(
            FileAlertsConfig::default().to_alert_config(),
            AlertConfig::default()
        );
    }
}
