//! Current-conditions observations

use crate::core::error::SourceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature, stored in degrees Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    pub fn fahrenheit(value: f64) -> Self {
        Self(value)
    }

    pub fn from_celsius(value: f64) -> Self {
        Self(value * 9.0 / 5.0 + 32.0)
    }

    pub fn as_fahrenheit(&self) -> f64 {
        self.0
    }

    pub fn as_celsius(&self) -> f64 {
        (self.0 - 32.0) * 5.0 / 9.0
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}°F ({:.1}°C)", self.0, self.as_celsius())
    }
}

/// One successful reading from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Source identifier (e.g. "nws", "wttr", "mcp")
    pub source: String,
    pub location: String,
    pub temperature: Temperature,
    /// Relative humidity in percent; not every source reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    pub condition: String,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(
        source: impl Into<String>,
        location: impl Into<String>,
        temperature: Temperature,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            location: location.into(),
            temperature,
            humidity: None,
            condition: condition.into(),
            observed_at: Utc::now(),
        }
    }

    pub fn with_humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }
}

/// Outcome of asking one source: a reading or the reason there isn't one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceReading {
    Observed(Observation),
    Failed { source: String, error: SourceError },
}

impl SourceReading {
    pub fn failed(source: impl Into<String>, error: SourceError) -> Self {
        SourceReading::Failed {
            source: source.into(),
            error,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            SourceReading::Observed(obs) => &obs.source,
            SourceReading::Failed { source, .. } => source,
        }
    }

    pub fn observation(&self) -> Option<&Observation> {
        match self {
            SourceReading::Observed(obs) => Some(obs),
            SourceReading::Failed { .. } => None,
        }
    }

    pub fn is_observed(&self) -> bool {
        matches!(self, SourceReading::Observed(_))
    }
}

impl From<Observation> for SourceReading {
    fn from(obs: Observation) -> Self {
        SourceReading::Observed(obs)
    }
}
