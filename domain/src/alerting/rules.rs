//! Alert rule evaluation
//!
//! Keyword rules over the current-conditions text plus temperature
//! thresholds. Each matched rule adds a condition line; the alert takes the
//! highest severity among them.

use super::subscription::{AlertSubscription, AlertType};
use crate::weather::Temperature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct KeywordRule {
    alert_type: AlertType,
    keywords: &'static [&'static str],
    condition: &'static str,
    severity: AlertSeverity,
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        alert_type: AlertType::SevereWeather,
        keywords: &["storm", "hurricane", "tornado", "severe", "warning"],
        condition: "Severe weather detected",
        severity: AlertSeverity::High,
    },
    KeywordRule {
        alert_type: AlertType::TemperatureExtreme,
        keywords: &["extreme", "record"],
        condition: "Extreme temperature conditions",
        severity: AlertSeverity::Medium,
    },
    KeywordRule {
        alert_type: AlertType::TravelDisruption,
        keywords: &["flight", "delay", "cancel", "closure"],
        condition: "Potential travel disruptions",
        severity: AlertSeverity::Medium,
    },
];

/// One alert raised for one location of one subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub id: String,
    pub subscription_id: String,
    pub location: String,
    pub severity: AlertSeverity,
    pub conditions: Vec<String>,
    pub weather_summary: String,
    pub triggered_at: DateTime<Utc>,
}

/// What the monitor observed for a location
#[derive(Debug, Clone, Copy)]
pub struct ConditionsSnapshot<'a> {
    pub location: &'a str,
    pub summary: &'a str,
    pub temperature: Option<Temperature>,
}

/// Evaluate a subscription's rules against one location's conditions.
///
/// Returns `None` when nothing matched.
pub fn evaluate(
    subscription: &AlertSubscription,
    snapshot: ConditionsSnapshot<'_>,
    now: DateTime<Utc>,
) -> Option<TriggeredAlert> {
    let text = snapshot.summary.to_lowercase();
    let mut conditions: Vec<String> = Vec::new();
    let mut severity: Option<AlertSeverity> = None;
    let mut raise = |condition: String, level: AlertSeverity| {
        conditions.push(condition);
        severity = Some(severity.map_or(level, |s| s.max(level)));
    };

    for rule in KEYWORD_RULES {
        if subscription.watches(rule.alert_type) && rule.keywords.iter().any(|k| text.contains(k)) {
            raise(rule.condition.to_string(), rule.severity);
        }
    }

    if subscription.watches(AlertType::TemperatureExtreme)
        && let Some(temp) = snapshot.temperature
    {
        let f = temp.as_fahrenheit();
        if let Some(high) = subscription.thresholds.temperature_high
            && f > high
        {
            raise(
                format!("Temperature {f:.0}°F above {high:.0}°F threshold"),
                AlertSeverity::Medium,
            );
        }
        if let Some(low) = subscription.thresholds.temperature_low
            && f < low
        {
            raise(
                format!("Temperature {f:.0}°F below {low:.0}°F threshold"),
                AlertSeverity::Medium,
            );
        }
    }

    let severity = severity?;
    Some(TriggeredAlert {
        id: format!(
            "{}_{}_{}",
            subscription.id,
            snapshot.location.to_lowercase().replace(' ', "_"),
            now.format("%H%M%S")
        ),
        subscription_id: subscription.id.clone(),
        location: snapshot.location.to_string(),
        severity,
        conditions,
        weather_summary: snapshot.summary.to_string(),
        triggered_at: now,
    })
}
