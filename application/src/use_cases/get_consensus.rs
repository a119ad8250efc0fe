//! Get Consensus use case
//!
//! Asks every configured observation source for the same place concurrently
//! and blends whatever comes back.

use crate::ports::progress::{NoProgress, QueryProgressNotifier};
use crate::ports::source_gateway::ObservationSource;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use weather_domain::consensus::{self, intelligence_report};
use weather_domain::{ConsensusResult, Gazetteer, ReliabilityTable, SourceReading};

/// Result of a consensus request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    pub success: bool,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusResult>,
    /// Intelligence report; empty on failure
    pub report: String,
    /// Every source's reading, failed ones included
    pub readings: Vec<SourceReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct GetConsensusUseCase {
    sources: Vec<Arc<dyn ObservationSource>>,
    reliability: ReliabilityTable,
    gazetteer: Gazetteer,
}

impl GetConsensusUseCase {
    pub fn new(sources: Vec<Arc<dyn ObservationSource>>) -> Self {
        Self {
            sources,
            reliability: ReliabilityTable::default(),
            gazetteer: Gazetteer::builtin(),
        }
    }

    pub fn with_reliability(mut self, reliability: ReliabilityTable) -> Self {
        self.reliability = reliability;
        self
    }

    pub fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id().to_string()).collect()
    }

    pub async fn execute(&self, location: &str) -> ConsensusOutcome {
        self.execute_with_progress(location, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        location: &str,
        progress: &dyn QueryProgressNotifier,
    ) -> ConsensusOutcome {
        let place = self.gazetteer.resolve(location);
        info!(
            "Gathering consensus for {} from {} sources",
            place.name,
            self.sources.len()
        );
        progress.on_gather_start(self.sources.len());

        let calls = self.sources.iter().map(|source| {
            let place = &place;
            async move {
                let reading = match source.observe(place).await {
                    Ok(obs) => SourceReading::Observed(obs),
                    Err(e) => {
                        warn!("Source {} failed for {}: {}", source.id(), place.name, e);
                        SourceReading::failed(source.id(), e)
                    }
                };
                progress.on_call_complete(source.id(), reading.is_observed());
                reading
            }
        });
        let readings = join_all(calls).await;
        progress.on_finished();

        match consensus::compute(&place.name, &readings, &self.reliability) {
            Ok(result) => {
                info!(
                    "Consensus for {}: {:.1}°F, confidence {:.2} from {} sources",
                    place.name,
                    result.temperature.as_fahrenheit(),
                    result.confidence,
                    result.source_count
                );
                ConsensusOutcome {
                    success: true,
                    location: place.name,
                    report: intelligence_report(&result),
                    consensus: Some(result),
                    readings,
                    error: None,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                warn!("No consensus for {}: {}", place.name, e);
                ConsensusOutcome {
                    success: false,
                    location: place.name,
                    consensus: None,
                    report: String::new(),
                    readings,
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use weather_domain::{Observation, Place, SourceError, Temperature};

    struct FixedSource {
        id: &'static str,
        reading: Result<(f64, &'static str), SourceError>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedSource {
        fn ok(id: &'static str, temp: f64, condition: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reading: Ok((temp, condition)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reading: Err(SourceError::Unavailable("503".into())),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    fn sources(list: Vec<Arc<FixedSource>>) -> Vec<Arc<dyn ObservationSource>> {
        list.into_iter()
            .map(|s| s as Arc<dyn ObservationSource>)
            .collect()
    }

    #[async_trait]
    impl ObservationSource for FixedSource {
        fn id(&self) -> &str {
            self.id
        }

        async fn observe(&self, place: &Place) -> Result<Observation, SourceError> {
            self.seen.lock().unwrap().push(place.name.clone());
            let (temp, condition) = self.reading.clone()?;
            Ok(Observation::new(
                self.id,
                &place.name,
                Temperature::fahrenheit(temp),
                condition,
            ))
        }
    }

    #[tokio::test]
    async fn test_consensus_from_agreeing_sources() {
        let nws = FixedSource::ok("nws", 72.0, "Clear");
        let wttr = FixedSource::ok("wttr", 73.0, "Clear");
        let use_case = GetConsensusUseCase::new(sources(vec![nws.clone(), wttr]));

        let outcome = use_case.execute("boston").await;

        assert!(outcome.success);
        assert_eq!(outcome.location, "Boston");
        let consensus = outcome.consensus.unwrap();
        assert_eq!(consensus.sources, vec!["nws", "wttr"]);
        assert!(consensus.confidence > 0.9);
        assert!(outcome.report.contains("Conditions: Clear"));
        assert_eq!(*nws.seen.lock().unwrap(), vec!["Boston".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_source_is_recorded_not_counted() {
        let use_case = GetConsensusUseCase::new(sources(vec![
            FixedSource::failing("nws"),
            FixedSource::ok("wttr", 50.0, "Rain"),
        ]));

        let outcome = use_case.execute("Seattle").await;

        assert!(outcome.success);
        assert_eq!(outcome.readings.len(), 2);
        assert_eq!(outcome.consensus.as_ref().unwrap().source_count, 1);
        assert!(outcome.report.contains("umbrella"));
    }

    #[tokio::test]
    async fn test_all_sources_failed() {
        let use_case = GetConsensusUseCase::new(sources(vec![
            FixedSource::failing("nws"),
            FixedSource::failing("wttr"),
        ]));

        let outcome = use_case.execute("Atlantis").await;

        assert!(!outcome.success);
        assert!(outcome.consensus.is_none());
        assert!(outcome.error.unwrap().contains("Atlantis"));
    }
}
