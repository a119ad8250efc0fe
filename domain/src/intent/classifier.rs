//! Fine-grained task classification
//!
//! Maps a query to exactly one [`TaskCategory`] by testing an ordered list of
//! keyword sets. The first matching set wins; the order is the classifier's
//! only tie-break rule (a query mentioning both "forecast" and "compare" is a
//! forecast).

use crate::core::query::Query;
use serde::{Deserialize, Serialize};

/// Kind of work a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Current conditions for one place
    WeatherQuery,
    /// Multi-period forecast for one place
    ForecastAnalysis,
    /// Active alerts for a region
    AlertMonitoring,
    /// Current conditions compared across places
    MultiLocation,
    /// Weather for trip destinations
    TravelPlanning,
    /// Creating an alert subscription
    AlertSetup,
    /// Multi-source consensus for one place
    ConsensusIntelligence,
    /// Anything else; answered without gathering data
    GeneralInquiry,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::WeatherQuery => "weather_query",
            TaskCategory::ForecastAnalysis => "forecast_analysis",
            TaskCategory::AlertMonitoring => "alert_monitoring",
            TaskCategory::MultiLocation => "multi_location",
            TaskCategory::TravelPlanning => "travel_planning",
            TaskCategory::AlertSetup => "alert_setup",
            TaskCategory::ConsensusIntelligence => "consensus_intelligence",
            TaskCategory::GeneralInquiry => "general_inquiry",
        }
    }

    /// Whether this category goes through location extraction and gathering
    pub fn gathers_data(&self) -> bool {
        !matches!(self, TaskCategory::GeneralInquiry)
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const FORECAST_KEYWORDS: &[&str] = &["forecast", "prediction", "future", "tomorrow", "week"];
const ALERT_KEYWORDS: &[&str] = &["alert", "warning", "storm", "emergency"];
const MULTI_LOCATION_KEYWORDS: &[&str] = &["multiple", "compare", "cities", "locations"];
const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "current", "now"];

/// Ordered rules; evaluated top to bottom.
const RULES: &[(&[&str], TaskCategory)] = &[
    (FORECAST_KEYWORDS, TaskCategory::ForecastAnalysis),
    (ALERT_KEYWORDS, TaskCategory::AlertMonitoring),
    (MULTI_LOCATION_KEYWORDS, TaskCategory::MultiLocation),
    (WEATHER_KEYWORDS, TaskCategory::WeatherQuery),
];

/// Classify a query. Total: falls back to [`TaskCategory::GeneralInquiry`].
pub fn classify(query: &Query) -> TaskCategory {
    RULES
        .iter()
        .find(|(keywords, _)| query.mentions_any(keywords))
        .map(|(_, category)| *category)
        .unwrap_or(TaskCategory::GeneralInquiry)
}
