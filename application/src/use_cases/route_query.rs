//! Route Query use case
//!
//! Top-level dispatcher. Picks a coarse [`CoordinationStrategy`] and hands
//! the query to the matching workflow. Every result is tagged with the
//! workflow used; failures come back as `success: false`, never as errors.

use super::alert_monitor::AlertMonitorUseCase;
use super::get_consensus::{ConsensusOutcome, GetConsensusUseCase};
use super::process_query::{ProcessQueryUseCase, QueryOutcome};
use crate::ports::progress::{NoProgress, QueryProgressNotifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use weather_domain::{
    AlertType, CoordinationStrategy, Query, SubscriptionConfig, TaskCategory, TriggeredAlert,
    wants_alert_setup,
};

/// Workflow actually executed for a routed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    TravelWeather,
    AlertSetup,
    AlertCheck,
    MultiSourceIntelligence,
    Weather,
}

impl Workflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::TravelWeather => "travel_weather",
            Workflow::AlertSetup => "alert_setup",
            Workflow::AlertCheck => "alert_check",
            Workflow::MultiSourceIntelligence => "multi_source_intelligence",
            Workflow::Weather => "weather",
        }
    }
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow-specific part of a routed result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutedPayload {
    Query(QueryOutcome),
    Consensus(ConsensusOutcome),
    SubscriptionCreated {
        subscription_id: String,
        locations: Vec<String>,
        alert_types: Vec<AlertType>,
    },
    AlertCheck {
        alerts: Vec<TriggeredAlert>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedResult {
    pub success: bool,
    pub strategy: CoordinationStrategy,
    pub workflow: Workflow,
    pub task_type: TaskCategory,
    /// Human-readable answer
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub payload: RoutedPayload,
    pub timestamp: DateTime<Utc>,
}

pub struct CoordinationRouter {
    process: Arc<ProcessQueryUseCase>,
    consensus: Arc<GetConsensusUseCase>,
    alerts: Arc<AlertMonitorUseCase>,
}

impl CoordinationRouter {
    pub fn new(
        process: Arc<ProcessQueryUseCase>,
        consensus: Arc<GetConsensusUseCase>,
        alerts: Arc<AlertMonitorUseCase>,
    ) -> Self {
        Self {
            process,
            consensus,
            alerts,
        }
    }

    pub async fn route(&self, query: &Query) -> RoutedResult {
        self.route_with_progress(query, &NoProgress).await
    }

    pub async fn route_with_progress(
        &self,
        query: &Query,
        progress: &dyn QueryProgressNotifier,
    ) -> RoutedResult {
        let strategy = CoordinationStrategy::determine(query);
        info!("Using coordination strategy: {}", strategy);

        let result = match strategy {
            CoordinationStrategy::Travel => {
                let outcome = self
                    .process
                    .execute_as(query, TaskCategory::TravelPlanning, progress)
                    .await;
                Self::from_query(strategy, Workflow::TravelWeather, outcome)
            }
            CoordinationStrategy::Alerts if wants_alert_setup(query) => {
                self.setup_alerts(strategy, query).await
            }
            CoordinationStrategy::Alerts => self.check_alerts(strategy).await,
            CoordinationStrategy::Intelligence => self.intelligence(strategy, query, progress).await,
            CoordinationStrategy::Weather => {
                let outcome = self.process.execute_with_progress(query, progress).await;
                Self::from_query(strategy, Workflow::Weather, outcome)
            }
        };

        info!(
            "Routed via {} (success: {})",
            result.workflow, result.success
        );
        result
    }

    fn from_query(
        strategy: CoordinationStrategy,
        workflow: Workflow,
        outcome: QueryOutcome,
    ) -> RoutedResult {
        RoutedResult {
            success: outcome.success,
            strategy,
            workflow,
            task_type: outcome.task_type,
            message: outcome.response.clone(),
            error: outcome.error.clone(),
            timestamp: outcome.timestamp,
            payload: RoutedPayload::Query(outcome),
        }
    }

    fn location_names(&self, query: &Query) -> Vec<String> {
        self.process
            .gazetteer()
            .extract_locations(query)
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    async fn setup_alerts(&self, strategy: CoordinationStrategy, query: &Query) -> RoutedResult {
        let config = SubscriptionConfig::for_locations(self.location_names(query));
        let alert_types = config.alert_types.clone();
        let subscription_id = self.alerts.setup_subscription(config).await;

        let locations = self
            .alerts
            .subscriptions()
            .await
            .into_iter()
            .find(|s| s.id == subscription_id)
            .map(|s| s.locations)
            .unwrap_or_default();

        RoutedResult {
            success: true,
            strategy,
            workflow: Workflow::AlertSetup,
            task_type: TaskCategory::AlertSetup,
            message: format!(
                "Smart alerts configured for {} ({}), watching {}. Subscription id: {}",
                locations.join(", "),
                locations.len(),
                alert_types
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                subscription_id
            ),
            error: None,
            payload: RoutedPayload::SubscriptionCreated {
                subscription_id,
                locations,
                alert_types,
            },
            timestamp: Utc::now(),
        }
    }

    async fn check_alerts(&self, strategy: CoordinationStrategy) -> RoutedResult {
        let alerts = self.alerts.check_all_subscriptions().await;
        let mut lines = vec![format!("Found {} active alerts", alerts.len())];
        lines.extend(alerts.iter().map(|a| {
            format!(
                "  {}: {} - {}",
                a.location,
                a.severity.as_str().to_uppercase(),
                a.conditions.join(", ")
            )
        }));

        RoutedResult {
            success: true,
            strategy,
            workflow: Workflow::AlertCheck,
            task_type: TaskCategory::AlertMonitoring,
            message: lines.join("\n"),
            error: None,
            payload: RoutedPayload::AlertCheck { alerts },
            timestamp: Utc::now(),
        }
    }

    async fn intelligence(
        &self,
        strategy: CoordinationStrategy,
        query: &Query,
        progress: &dyn QueryProgressNotifier,
    ) -> RoutedResult {
        let location = self
            .location_names(query)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.alerts.config().default_location.clone());
        let outcome = self.consensus.execute_with_progress(&location, progress).await;

        RoutedResult {
            success: outcome.success,
            strategy,
            workflow: Workflow::MultiSourceIntelligence,
            task_type: TaskCategory::ConsensusIntelligence,
            message: if outcome.success {
                outcome.report.clone()
            } else {
                format!(
                    "Could not build a consensus for {}: {}",
                    outcome.location,
                    outcome.error.as_deref().unwrap_or("no data")
                )
            },
            error: outcome.error.clone(),
            timestamp: outcome.timestamp,
            payload: RoutedPayload::Consensus(outcome),
        }
    }
}
