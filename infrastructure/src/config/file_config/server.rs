//! Weather-tool server configuration from TOML (`[server]` section)

use crate::http::{HttpSettings, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL of the weather-tool server
    pub base_url: String,
    /// Per-request timeout for current conditions and alerts
    pub timeout_secs: u64,
    /// Per-request timeout for forecasts
    pub forecast_timeout_secs: u64,
    /// Retries after the first attempt
    pub retry_count: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            forecast_timeout_secs: 60,
            retry_count: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

impl FileServerConfig {
    pub fn to_http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            forecast_timeout: Duration::from_secs(self.forecast_timeout_secs.max(1)),
            retry: RetryPolicy {
                max_retries: self.retry_count,
                initial_delay_ms: self.initial_backoff_ms,
                max_delay_ms: self.max_backoff_ms,
                ..RetryPolicy::default()
            },
        }
    }
}
