//! JSON output formatter

use super::formatter::OutputFormatter;
use serde::Serialize;
use weather_application::{ConsensusOutcome, RoutedResult};
use weather_domain::{AlertSubscription, TriggeredAlert};

/// Pretty-printed JSON, one document per call
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_routed(&self, result: &RoutedResult) -> String {
        Self::render(result)
    }

    fn format_consensus(&self, outcome: &ConsensusOutcome) -> String {
        Self::render(outcome)
    }

    fn format_alerts(&self, alerts: &[TriggeredAlert]) -> String {
        Self::render(alerts)
    }

    fn format_subscription(&self, subscription: &AlertSubscription) -> String {
        Self::render(subscription)
    }
}
