//! End-to-end flows through the public use-case API with scripted upstreams

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use weather_application::{
    AlertConfig, AlertMonitorUseCase, CoordinationRouter, GetConsensusUseCase, ObservationSource,
    ProcessQueryUseCase, RoutedPayload, SourceGateway, Workflow,
};
use weather_domain::{
    AlertRecord, AlertType, Coordinates, ForecastPeriod, Observation, Place, Query, RegionCode,
    ReliabilityTable, SourceError, SourceReading, SubscriptionConfig, TaskCategory, Temperature,
    Thresholds,
};

/// Answers current conditions from a fixed table; unknown places are unavailable
#[derive(Default)]
struct ScriptedGateway {
    conditions: HashMap<String, (f64, &'static str)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn with(mut self, location: &str, temp_f: f64, condition: &'static str) -> Self {
        self.conditions
            .insert(location.to_string(), (temp_f, condition));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceGateway for ScriptedGateway {
    async fn current_conditions(&self, location: &str) -> Result<Observation, SourceError> {
        self.calls.lock().unwrap().push(format!("current:{location}"));
        match self.conditions.get(location) {
            Some((temp, condition)) => Ok(Observation::new(
                "mcp",
                location,
                Temperature::fahrenheit(*temp),
                *condition,
            )),
            None => Err(SourceError::Unavailable("connection refused".to_string())),
        }
    }

    async fn forecast(&self, _: Coordinates) -> Result<Vec<ForecastPeriod>, SourceError> {
        self.calls.lock().unwrap().push("forecast".to_string());
        Ok(vec![])
    }

    async fn alerts(&self, region: &RegionCode) -> Result<Vec<AlertRecord>, SourceError> {
        self.calls.lock().unwrap().push(format!("alerts:{region}"));
        Ok(vec![])
    }
}

/// A consensus source with a fixed answer
struct FixedSource {
    id: &'static str,
    reading: Option<(f64, &'static str)>,
}

#[async_trait]
impl ObservationSource for FixedSource {
    fn id(&self) -> &str {
        self.id
    }

    async fn observe(&self, place: &Place) -> Result<Observation, SourceError> {
        match self.reading {
            Some((temp, condition)) => Ok(Observation::new(
                self.id,
                &place.name,
                Temperature::fahrenheit(temp),
                condition,
            )),
            None => Err(SourceError::InvalidInput(format!(
                "no coordinates known for {}",
                place.name
            ))),
        }
    }
}

fn sources() -> Vec<Arc<dyn ObservationSource>> {
    vec![
        Arc::new(FixedSource {
            id: "nws",
            reading: None,
        }),
        Arc::new(FixedSource {
            id: "wttr",
            reading: Some((72.0, "Clear")),
        }),
        Arc::new(FixedSource {
            id: "mcp",
            reading: Some((74.0, "Clear")),
        }),
    ]
}

fn router(gateway: Arc<ScriptedGateway>) -> (CoordinationRouter, Arc<AlertMonitorUseCase>) {
    let alerts = Arc::new(AlertMonitorUseCase::new(
        gateway.clone(),
        AlertConfig::default(),
    ));
    let router = CoordinationRouter::new(
        Arc::new(ProcessQueryUseCase::new(gateway)),
        Arc::new(GetConsensusUseCase::new(sources())),
        alerts.clone(),
    );
    (router, alerts)
}

#[tokio::test]
async fn comparison_survives_one_failed_location() {
    let gateway = Arc::new(ScriptedGateway::default().with("Paris", 64.0, "Cloudy"));
    let (router, _) = router(gateway.clone());

    let result = router
        .route(&Query::new("Compare the weather in Paris and New York"))
        .await;

    assert!(result.success);
    assert_eq!(result.workflow, Workflow::Weather);
    assert_eq!(result.task_type, TaskCategory::MultiLocation);
    assert!(result.message.contains("Paris"));
    assert!(result.message.contains("New York"));
    match &result.payload {
        RoutedPayload::Query(outcome) => {
            assert_eq!(outcome.locations, vec!["Paris", "New York"]);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn consensus_skips_the_failed_source() {
    let consensus = GetConsensusUseCase::new(sources())
        .with_reliability(ReliabilityTable::default().with_weight("wttr", 0.7).with_weight("mcp", 0.7));

    let outcome = consensus.execute("Chicago").await;

    assert!(outcome.success);
    assert_eq!(outcome.readings.len(), 3);
    assert!(matches!(outcome.readings[0], SourceReading::Failed { .. }));

    let result = outcome.consensus.expect("consensus result");
    assert_eq!(result.source_count, 2);
    assert_eq!(result.condition, "Clear");
    assert!((result.temperature.as_fahrenheit() - 73.0).abs() < 0.01);
    assert!(result.confidence > 0.9);
}

#[tokio::test]
async fn subscription_lifecycle() {
    let gateway = Arc::new(ScriptedGateway::default().with("Phoenix", 95.0, "Sunny"));
    let (_, alerts) = router(gateway);

    let mut request = SubscriptionConfig::for_locations(vec!["Phoenix".to_string()]);
    request.alert_types = vec![AlertType::TemperatureExtreme];
    request.thresholds = Thresholds {
        temperature_high: Some(80.0),
        temperature_low: None,
    };
    let id = alerts.setup_subscription(request).await;

    let triggered = alerts.check_all_subscriptions().await;
    assert_eq!(triggered.len(), 1);
    assert_eq!(triggered[0].subscription_id, id);
    assert!(triggered[0].conditions[0].contains("above 80°F"));

    alerts.set_subscription_active(&id, false).await.unwrap();
    assert!(alerts.check_all_subscriptions().await.is_empty());
    assert_eq!(alerts.history().await.len(), 1);

    assert!(alerts.set_subscription_active("alert_missing", true).await.is_err());
}

#[tokio::test]
async fn monitor_stops_when_cancelled() {
    let gateway = Arc::new(ScriptedGateway::default().with("Miami", 88.0, "Severe storm warning"));
    let (_, alerts) = router(gateway);
    alerts
        .setup_subscription(SubscriptionConfig::for_locations(vec!["Miami".to_string()]))
        .await;

    let token = CancellationToken::new();
    let stop = token.clone();
    let seen = Mutex::new(0usize);

    let passes = alerts
        .run_monitor(Duration::from_secs(3600), token, |triggered| {
            *seen.lock().unwrap() += triggered.len();
            stop.cancel();
        })
        .await;

    assert_eq!(passes, 1);
    assert_eq!(*seen.lock().unwrap(), 1);
}
