//! Shared HTTP plumbing for upstream weather services

mod retry;

pub use retry::{RetryDecision, RetryPolicy, classify_error, classify_status};

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use weather_domain::SourceError;

/// User-Agent sent to every upstream service
pub const USER_AGENT: &str = concat!("weather-agent/", env!("CARGO_PKG_VERSION"));

/// Errors raised while constructing an HTTP adapter
#[derive(Error, Debug)]
pub enum HttpSetupError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Timeouts and retry behaviour for one upstream service
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Forecasts make two upstream hops and get a longer budget
    pub forecast_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            forecast_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, HttpSetupError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Validate a base URL and strip any trailing slash
pub(crate) fn normalize_base_url(url: &str) -> Result<String, HttpSetupError> {
    let parsed = Url::parse(url).map_err(|e| HttpSetupError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HttpSetupError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}

pub(crate) fn transport_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Unavailable("request timed out".to_string())
    } else {
        SourceError::Unavailable(err.to_string())
    }
}

/// Check the status and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Unavailable(format!("HTTP {status}")));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::ParseError(e.to_string()))
}
