//! Alert Monitor use case
//!
//! Holds alert subscriptions in memory, evaluates them against fresh current
//! conditions, and can run the evaluation as a long-lived loop.

use crate::config::AlertConfig;
use crate::ports::source_gateway::SourceGateway;
use chrono::Utc;
use futures::FutureExt;
use futures::future::join_all;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use weather_domain::alerting::{self, ConditionsSnapshot};
use weather_domain::response::formatter::format_single_location;
use weather_domain::{
    AlertSubscription, LocationWeather, SubscriptionConfig, Thresholds, TriggeredAlert,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertMonitorError {
    #[error("Subscription not found: {0}")]
    NotFound(String),
}

/// Use case for alert subscriptions and monitoring
pub struct AlertMonitorUseCase {
    gateway: Arc<dyn SourceGateway>,
    config: AlertConfig,
    subscriptions: RwLock<Vec<AlertSubscription>>,
    history: RwLock<VecDeque<TriggeredAlert>>,
    sequence: AtomicU64,
}

impl AlertMonitorUseCase {
    pub fn new(gateway: Arc<dyn SourceGateway>, config: AlertConfig) -> Self {
        Self {
            gateway,
            config,
            subscriptions: RwLock::new(Vec::new()),
            history: RwLock::new(VecDeque::new()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Store a new active subscription and return its id.
    ///
    /// No locations means the configured default location; unset thresholds
    /// take the configured defaults.
    pub async fn setup_subscription(&self, mut config: SubscriptionConfig) -> String {
        if config.locations.is_empty() {
            config.locations = vec![self.config.default_location.clone()];
        }
        config.thresholds = Thresholds {
            temperature_high: config
                .thresholds
                .temperature_high
                .or(self.config.thresholds.temperature_high),
            temperature_low: config
                .thresholds
                .temperature_low
                .or(self.config.thresholds.temperature_low),
        };

        let now = Utc::now();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("alert_{}_{}", now.format("%Y%m%d_%H%M%S"), seq);
        info!(
            "Alert subscription {} created for {:?} ({})",
            id,
            config.locations,
            config
                .alert_types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let subscription = AlertSubscription::new(id.clone(), config, now);
        self.subscriptions.write().await.push(subscription);
        id
    }

    pub async fn set_subscription_active(
        &self,
        id: &str,
        active: bool,
    ) -> Result<(), AlertMonitorError> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AlertMonitorError::NotFound(id.to_string()))?;
        subscription.active = active;
        info!(
            "Alert subscription {} {}",
            id,
            if active { "activated" } else { "deactivated" }
        );
        Ok(())
    }

    pub async fn subscriptions(&self) -> Vec<AlertSubscription> {
        self.subscriptions.read().await.clone()
    }

    /// Alerts triggered so far, oldest first
    pub async fn history(&self) -> Vec<TriggeredAlert> {
        self.history.read().await.iter().cloned().collect()
    }

    /// Evaluate every active subscription once.
    ///
    /// Locations whose conditions can't be fetched are logged and skipped.
    pub async fn check_all_subscriptions(&self) -> Vec<TriggeredAlert> {
        let active: Vec<AlertSubscription> = self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect();
        debug!("Checking {} active subscriptions", active.len());

        let checks = active.iter().flat_map(|subscription| {
            subscription
                .locations
                .iter()
                .map(move |location| self.check_location(subscription, location))
        });
        let triggered: Vec<TriggeredAlert> = join_all(checks).await.into_iter().flatten().collect();

        if !triggered.is_empty() {
            let mut history = self.history.write().await;
            for alert in &triggered {
                info!(
                    "Alert triggered for {}: {} - {}",
                    alert.location,
                    alert.severity,
                    alert.conditions.join(", ")
                );
                history.push_back(alert.clone());
            }
            while history.len() > self.config.history_limit {
                history.pop_front();
            }
        }
        triggered
    }

    async fn check_location(
        &self,
        subscription: &AlertSubscription,
        location: &str,
    ) -> Option<TriggeredAlert> {
        let observation = match self.gateway.current_conditions(location).await {
            Ok(obs) => obs,
            Err(e) => {
                warn!(
                    "Skipping {} for subscription {}: {}",
                    location, subscription.id, e
                );
                return None;
            }
        };
        let temperature = observation.temperature;
        let summary = format_single_location(&LocationWeather::new(location, Ok(observation)));
        alerting::evaluate(
            subscription,
            ConditionsSnapshot {
                location,
                summary: &summary,
                temperature: Some(temperature),
            },
            Utc::now(),
        )
    }

    /// Check subscriptions every `interval` until `token` is cancelled.
    ///
    /// A pass that panics is logged and followed by the shorter error
    /// backoff; it never ends the loop. Returns the number of completed
    /// passes.
    pub async fn run_monitor<F>(
        &self,
        interval: Duration,
        token: CancellationToken,
        on_pass: F,
    ) -> usize
    where
        F: Fn(&[TriggeredAlert]) + Send + Sync,
    {
        info!(
            "Starting continuous alert monitoring (every {} seconds)",
            interval.as_secs()
        );
        let mut passes = 0;

        while !token.is_cancelled() {
            let pass = AssertUnwindSafe(self.check_all_subscriptions())
                .catch_unwind()
                .await;
            let delay = match pass {
                Ok(alerts) => {
                    passes += 1;
                    on_pass(&alerts);
                    interval
                }
                Err(panic) => {
                    error!("Alert monitoring pass failed: {}", panic_message(&*panic));
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Alert monitoring stopped after {} passes", passes);
        passes
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
