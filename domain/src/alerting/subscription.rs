//! Alert subscriptions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Family of conditions a subscription watches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    SevereWeather,
    TemperatureExtreme,
    TravelDisruption,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::SevereWeather => "severe_weather",
            AlertType::TemperatureExtreme => "temperature_extreme",
            AlertType::TravelDisruption => "travel_disruption",
        }
    }

    pub fn default_set() -> Vec<AlertType> {
        vec![AlertType::SevereWeather, AlertType::TemperatureExtreme]
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "severe_weather" | "severe" => Ok(AlertType::SevereWeather),
            "temperature_extreme" | "temperature" => Ok(AlertType::TemperatureExtreme),
            "travel_disruption" | "travel" => Ok(AlertType::TravelDisruption),
            other => Err(format!("unknown alert type: {other}")),
        }
    }
}

/// Temperature limits in °F; `None` disables that side
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    pub temperature_high: Option<f64>,
    pub temperature_low: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub console: bool,
    pub email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            console: true,
            email: false,
        }
    }
}

/// What a caller asks for when creating a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    pub locations: Vec<String>,
    pub alert_types: Vec<AlertType>,
    pub thresholds: Thresholds,
    pub notifications: NotificationPreferences,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            alert_types: AlertType::default_set(),
            thresholds: Thresholds::default(),
            notifications: NotificationPreferences::default(),
        }
    }
}

impl SubscriptionConfig {
    pub fn for_locations(locations: Vec<String>) -> Self {
        Self {
            locations,
            ..Default::default()
        }
    }

    pub fn with_alert_types(mut self, alert_types: Vec<AlertType>) -> Self {
        self.alert_types = alert_types;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// A stored subscription (Entity)
///
/// Never expires; the only state change after creation is the active flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSubscription {
    pub id: String,
    pub locations: Vec<String>,
    pub alert_types: Vec<AlertType>,
    pub thresholds: Thresholds,
    pub notifications: NotificationPreferences,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl AlertSubscription {
    pub fn new(id: impl Into<String>, config: SubscriptionConfig, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            locations: config.locations,
            alert_types: config.alert_types,
            thresholds: config.thresholds,
            notifications: config.notifications,
            created_at,
            active: true,
        }
    }

    pub fn watches(&self, alert_type: AlertType) -> bool {
        self.alert_types.contains(&alert_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_type_parse() {
        assert_eq!("severe-weather".parse::<AlertType>(), Ok(AlertType::SevereWeather));
        assert_eq!("Travel".parse::<AlertType>(), Ok(AlertType::TravelDisruption));
        assert!("hail".parse::<AlertType>().is_err());
    }

    #[test]
    fn test_new_subscription_is_active() {
        let sub = AlertSubscription::new(
            "alert_1",
            SubscriptionConfig::for_locations(vec!["Miami".into()]),
            Utc::now(),
        );
        assert!(sub.active);
        assert!(sub.watches(AlertType::SevereWeather));
        assert!(!sub.watches(AlertType::TravelDisruption));
    }
}
