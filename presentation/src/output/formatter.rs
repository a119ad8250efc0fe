//! Output formatter trait

use weather_application::{ConsensusOutcome, RoutedResult};
use weather_domain::{AlertSubscription, TriggeredAlert};

/// Trait for rendering use-case results
pub trait OutputFormatter: Send + Sync {
    /// A query answered by the coordination router
    fn format_routed(&self, result: &RoutedResult) -> String;

    /// A direct consensus request
    fn format_consensus(&self, outcome: &ConsensusOutcome) -> String;

    /// Alerts raised by one monitoring pass
    fn format_alerts(&self, alerts: &[TriggeredAlert]) -> String;

    /// A newly created subscription
    fn format_subscription(&self, subscription: &AlertSubscription) -> String;
}
