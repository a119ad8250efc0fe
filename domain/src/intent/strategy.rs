//! Coarse coordination strategy
//!
//! Selected before any fine-grained classification and kept separate from
//! [`classify`](super::classifier::classify): the two serve different routing
//! granularities.

use crate::core::query::Query;
use serde::{Deserialize, Serialize};

/// Top-level workflow family for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationStrategy {
    /// Travel planning with destination weather
    Travel,
    /// Alert subscription setup or check
    Alerts,
    /// Multi-source consensus
    Intelligence,
    /// Plain weather orchestration
    Weather,
}

const TRAVEL_TRIGGERS: &[&str] = &["travel", "trip", "vacation", "visit", "itinerary"];
const ALERT_TRIGGERS: &[&str] = &["alert", "monitor", "notify", "warning", "track"];
const INTELLIGENCE_TRIGGERS: &[&str] = &[
    "compare sources",
    "accurate",
    "reliable",
    "consensus",
    "multiple sources",
];
const ALERT_SETUP_TRIGGERS: &[&str] = &["setup", "set up", "monitor"];

impl CoordinationStrategy {
    /// Pick the strategy for a query; first matching trigger set wins.
    pub fn determine(query: &Query) -> Self {
        if query.mentions_any(TRAVEL_TRIGGERS) {
            CoordinationStrategy::Travel
        } else if query.mentions_any(ALERT_TRIGGERS) {
            CoordinationStrategy::Alerts
        } else if query.mentions_any(INTELLIGENCE_TRIGGERS) {
            CoordinationStrategy::Intelligence
        } else {
            CoordinationStrategy::Weather
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinationStrategy::Travel => "travel",
            CoordinationStrategy::Alerts => "alerts",
            CoordinationStrategy::Intelligence => "intelligence",
            CoordinationStrategy::Weather => "weather",
        }
    }
}

impl std::fmt::Display for CoordinationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an alert-family query asks to create a subscription
/// rather than check existing ones.
pub fn wants_alert_setup(query: &Query) -> bool {
    query.mentions_any(ALERT_SETUP_TRIGGERS)
}
