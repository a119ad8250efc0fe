//! Process Query use case
//!
//! Drives the orchestration state machine for one query: classify, resolve
//! locations, gather upstream data with a join barrier, format a response.

use crate::config::{ExtractionMode, OrchestratorConfig};
use crate::ports::progress::{NoProgress, QueryProgressNotifier};
use crate::ports::source_gateway::SourceGateway;
use crate::ports::text_completion::{CompletionError, TextCompletion};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use weather_domain::location::parse_location_list;
use weather_domain::{
    DomainError, Event, GatherPlan, GatheredData, Gazetteer, LocationWeather, NextAction,
    OrchestrationState, Place, Query, TaskCategory, classify, format_response, step,
};

/// Result of processing one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub success: bool,
    pub response: String,
    pub task_type: TaskCategory,
    pub locations: Vec<String>,
    pub execution_log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl QueryOutcome {
    fn completed(mut state: OrchestrationState) -> Self {
        Self {
            success: true,
            locations: state.location_names(),
            task_type: state.category.unwrap_or(TaskCategory::GeneralInquiry),
            response: state.response.take().unwrap_or_default(),
            execution_log: state.execution_log().to_vec(),
            error: None,
            timestamp: Utc::now(),
        }
    }

    fn failed(
        task_type: TaskCategory,
        locations: Vec<String>,
        execution_log: Vec<String>,
        error: DomainError,
    ) -> Self {
        Self {
            success: false,
            response: String::new(),
            task_type,
            locations,
            execution_log,
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }
}

/// Use case for answering a single weather question
pub struct ProcessQueryUseCase {
    gateway: Arc<dyn SourceGateway>,
    completion: Option<Arc<dyn TextCompletion>>,
    gazetteer: Gazetteer,
    config: OrchestratorConfig,
}

impl ProcessQueryUseCase {
    pub fn new(gateway: Arc<dyn SourceGateway>) -> Self {
        Self {
            gateway,
            completion: None,
            gazetteer: Gazetteer::builtin(),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, query: &Query) -> QueryOutcome {
        self.execute_with_progress(query, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        query: &Query,
        progress: &dyn QueryProgressNotifier,
    ) -> QueryOutcome {
        self.run(query, None, progress).await
    }

    /// Execute with a category chosen by the caller instead of [`classify`]
    pub async fn execute_as(
        &self,
        query: &Query,
        category: TaskCategory,
        progress: &dyn QueryProgressNotifier,
    ) -> QueryOutcome {
        self.run(query, Some(category), progress).await
    }

    async fn run(
        &self,
        query: &Query,
        category: Option<TaskCategory>,
        progress: &dyn QueryProgressNotifier,
    ) -> QueryOutcome {
        info!("Processing query: {}", query);
        let mut state = OrchestrationState::new(query.clone());

        loop {
            let event = match state.next_action() {
                NextAction::Classify => {
                    Event::Classified(category.unwrap_or_else(|| classify(query)))
                }
                NextAction::ExtractLocations => {
                    Event::LocationsExtracted(self.extract_locations(query).await)
                }
                NextAction::Gather => {
                    let category = state.category.unwrap_or(TaskCategory::GeneralInquiry);
                    let plan = GatherPlan::for_category(category, &state.locations, query);
                    Event::DataGathered(self.gather(plan, progress).await)
                }
                NextAction::Respond => Event::Responded(self.respond(&state).await),
                NextAction::Finish => Event::Finished,
                NextAction::Stop => break,
            };

            let task_type = state.category.unwrap_or(TaskCategory::GeneralInquiry);
            let locations = state.location_names();
            let log = state.execution_log().to_vec();
            state = match step(state, event) {
                Ok(next) => next,
                Err(e) => {
                    warn!("Orchestration aborted: {}", e);
                    return QueryOutcome::failed(task_type, locations, log, e);
                }
            };
            debug!("Entered stage {}", state.stage);
            progress.on_stage(state.stage);
        }

        progress.on_finished();
        QueryOutcome::completed(state)
    }

    async fn extract_locations(&self, query: &Query) -> Vec<Place> {
        let keyword = self.gazetteer.extract_locations(query);

        let mut places = match (self.config.extraction, &self.completion) {
            (ExtractionMode::Keyword, _) | (_, None) => keyword,
            (ExtractionMode::Hybrid, Some(_)) if !keyword.is_empty() => keyword,
            (_, Some(completion)) => match self.completion_locations(completion.as_ref(), query).await
            {
                Ok(places) => places,
                Err(e) => {
                    warn!("Completion location extraction failed, using keywords: {}", e);
                    keyword
                }
            },
        };

        if places.len() > self.config.max_locations {
            debug!(
                "Capping {} locations to {}",
                places.len(),
                self.config.max_locations
            );
            places.truncate(self.config.max_locations);
        }
        places
    }

    async fn completion_locations(
        &self,
        completion: &dyn TextCompletion,
        query: &Query,
    ) -> Result<Vec<Place>, CompletionError> {
        let prompt = format!(
            "Extract every city, state or country named in this weather question.\n\
             Answer with a comma-separated list of place names only, or the single word \
             'none' if there are no places.\n\nQuestion: {query}\nPlaces:"
        );
        let answer = completion.complete(&prompt).await?;
        let names = parse_location_list(&answer);
        debug!("Completion extracted locations: {:?}", names);
        Ok(names.iter().map(|n| self.gazetteer.resolve(n)).collect())
    }

    async fn gather(&self, plan: GatherPlan, progress: &dyn QueryProgressNotifier) -> GatheredData {
        match plan {
            GatherPlan::CurrentConditions(places) => {
                let names: Vec<String> = places.into_iter().map(|p| p.name).collect();
                GatheredData::Current {
                    readings: self.current_for(&names, progress).await,
                }
            }
            GatherPlan::Forecast { place, coordinates } => {
                progress.on_gather_start(1);
                let result = self.gateway.forecast(coordinates).await;
                if let Err(e) = &result {
                    warn!("Forecast for {} failed: {}", place.name, e);
                }
                progress.on_call_complete(&place.name, result.is_ok());
                GatheredData::Forecast {
                    location: place.name,
                    result,
                }
            }
            GatherPlan::Alerts { place, region } => {
                progress.on_gather_start(1);
                let result = self.gateway.alerts(&region).await;
                if let Err(e) = &result {
                    warn!("Alerts for {} failed: {}", region, e);
                }
                progress.on_call_complete(region.as_str(), result.is_ok());
                GatheredData::Alerts {
                    location: place.name,
                    region,
                    result,
                }
            }
            GatherPlan::Travel(mut context) => {
                context.destinations.truncate(self.config.max_locations);
                let readings = self.current_for(&context.destinations, progress).await;
                GatheredData::Travel { context, readings }
            }
            GatherPlan::Skip(data) => data,
        }
    }

    /// Fan out current-conditions calls; results come back in input order
    /// once every call has finished.
    async fn current_for(
        &self,
        names: &[String],
        progress: &dyn QueryProgressNotifier,
    ) -> Vec<LocationWeather> {
        progress.on_gather_start(names.len());
        let calls = names.iter().map(|name| async move {
            let result = self.gateway.current_conditions(name).await;
            if let Err(e) = &result {
                warn!("Current conditions for {} failed: {}", name, e);
            }
            progress.on_call_complete(name, result.is_ok());
            LocationWeather::new(name.clone(), result)
        });
        join_all(calls).await
    }

    async fn respond(&self, state: &OrchestrationState) -> String {
        let category = state.category.unwrap_or(TaskCategory::GeneralInquiry);
        let formatted = format_response(category, state.gathered.as_ref());

        if !self.config.summarize || !category.gathers_data() {
            return formatted;
        }
        let Some(completion) = &self.completion else {
            return formatted;
        };

        let gathered = serde_json::to_string_pretty(&state.gathered).unwrap_or_default();
        let prompt = format!(
            "You are a weather assistant. Answer the user's question conversationally and \
             concisely using only the data below.\n\n\
             Question: {}\nTask type: {}\nLocations: {}\n\n\
             Formatted data:\n{}\n\nRaw data:\n{}\n\nAnswer:",
            state.query,
            category,
            state.location_names().join(", "),
            formatted,
            gathered
        );
        match completion.complete(&prompt).await {
            Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
            Ok(_) => {
                warn!("Summarization returned nothing, keeping formatted response");
                formatted
            }
            Err(e) => {
                warn!("Summarization failed, keeping formatted response: {}", e);
                formatted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use weather_domain::{
        AlertRecord, Coordinates, ForecastPeriod, Observation, RegionCode, SourceError,
        Temperature,
    };

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        calls: Mutex<Vec<String>>,
        failing: HashSet<String>,
    }

    impl MockGateway {
        fn failing(locations: &[&str]) -> Self {
            Self {
                failing: locations.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SourceGateway for MockGateway {
        async fn current_conditions(&self, location: &str) -> Result<Observation, SourceError> {
            self.calls.lock().unwrap().push(format!("current:{location}"));
            if self.failing.contains(location) {
                return Err(SourceError::Unavailable("connection refused".into()));
            }
            Ok(Observation::new(
                "mcp",
                location,
                Temperature::fahrenheit(68.0),
                "Partly cloudy",
            ))
        }

        async fn forecast(
            &self,
            coordinates: Coordinates,
        ) -> Result<Vec<ForecastPeriod>, SourceError> {
            self.calls.lock().unwrap().push(format!("forecast:{coordinates}"));
            Ok(vec![ForecastPeriod {
                name: Some("Tonight".into()),
                temperature: Some(52.0),
                ..Default::default()
            }])
        }

        async fn alerts(&self, region: &RegionCode) -> Result<Vec<AlertRecord>, SourceError> {
            self.calls.lock().unwrap().push(format!("alerts:{region}"));
            Ok(vec![])
        }
    }

    struct MockCompletion {
        answer: Result<String, CompletionError>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockCompletion {
        fn new(answer: Result<String, CompletionError>) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextCompletion for MockCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer.clone()
        }
    }

    fn use_case(gateway: Arc<MockGateway>) -> ProcessQueryUseCase {
        ProcessQueryUseCase::new(gateway)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_partial_failure_still_succeeds() {
        let gateway = Arc::new(MockGateway::failing(&["New York"]));
        let outcome = use_case(gateway.clone())
            .execute(&Query::new("Compare weather in Paris and New York"))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.task_type, TaskCategory::MultiLocation);
        assert_eq!(outcome.locations, vec!["Paris", "New York"]);
        let error_lines = outcome
            .response
            .lines()
            .filter(|l| l.contains("Error getting weather"))
            .count();
        assert_eq!(error_lines, 1);
        assert!(outcome.response.contains("Paris: "));
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_alert_monitoring_calls_alerts_once() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .execute(&Query::new("Any weather alerts for Texas and California?"))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.task_type, TaskCategory::AlertMonitoring);
        assert_eq!(gateway.calls(), vec!["alerts:TX"]);
        assert!(outcome
            .execution_log
            .contains(&"Gathered alert data for Texas".to_string()));
    }

    #[tokio::test]
    async fn test_general_inquiry_makes_no_calls() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .execute(&Query::new("Tell me a joke"))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.task_type, TaskCategory::GeneralInquiry);
        assert!(gateway.calls().is_empty());
        assert!(outcome.locations.is_empty());
        // Response and log both survive into the outcome
        assert!(!outcome.response.is_empty());
        assert_eq!(
            outcome.execution_log,
            vec!["Task classified as: general_inquiry", "Generated response"]
        );
    }

    #[tokio::test]
    async fn test_forecast_without_coordinates_is_placeholder() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .execute(&Query::new("Forecast for Rome tomorrow"))
            .await;

        assert!(outcome.success);
        assert!(gateway.calls().is_empty());
        assert!(outcome
            .execution_log
            .contains(&"Could not get coordinates for forecast".to_string()));
        assert!(outcome.response.contains("Could not get coordinates"));
    }

    #[tokio::test]
    async fn test_forecast_uses_first_location() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .execute(&Query::new("Forecast for London and Paris"))
            .await;

        assert_eq!(gateway.calls(), vec!["forecast:51.5074,-0.1278"]);
        assert!(outcome.response.contains("Tonight"));
        assert!(outcome.execution_log.contains(&"Gathered forecast data".to_string()));
    }

    #[tokio::test]
    async fn test_forced_travel_category() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .execute_as(
                &Query::new("Plan a trip to Lisbon for 4 days"),
                TaskCategory::TravelPlanning,
                &NoProgress,
            )
            .await;

        assert_eq!(outcome.task_type, TaskCategory::TravelPlanning);
        assert_eq!(gateway.calls(), vec!["current:Lisbon"]);
        assert!(outcome.response.contains("Duration: 4 days"));
    }

    #[tokio::test]
    async fn test_completion_extraction_degrades_to_keywords() {
        let gateway = Arc::new(MockGateway::default());
        let completion = Arc::new(MockCompletion::new(Err(CompletionError::Timeout)));
        let outcome = use_case(gateway.clone())
            .with_completion(completion.clone())
            .with_config(OrchestratorConfig {
                extraction: ExtractionMode::Completion,
                ..Default::default()
            })
            .execute(&Query::new("Weather in Berlin"))
            .await;

        assert_eq!(completion.prompts.lock().unwrap().len(), 1);
        assert_eq!(outcome.locations, vec!["Berlin"]);
    }

    #[tokio::test]
    async fn test_completion_none_means_no_locations() {
        let gateway = Arc::new(MockGateway::default());
        let completion = Arc::new(MockCompletion::new(Ok("None".into())));
        let outcome = use_case(gateway.clone())
            .with_completion(completion)
            .with_config(OrchestratorConfig {
                extraction: ExtractionMode::Completion,
                ..Default::default()
            })
            .execute(&Query::new("What's the weather right now?"))
            .await;

        assert!(outcome.locations.is_empty());
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_hybrid_skips_completion_when_keywords_match() {
        let gateway = Arc::new(MockGateway::default());
        let completion = Arc::new(MockCompletion::new(Ok("Oslo".into())));
        let outcome = use_case(gateway)
            .with_completion(completion.clone())
            .with_config(OrchestratorConfig {
                extraction: ExtractionMode::Hybrid,
                ..Default::default()
            })
            .execute(&Query::new("Weather in Tokyo"))
            .await;

        assert!(completion.prompts.lock().unwrap().is_empty());
        assert_eq!(outcome.locations, vec!["Tokyo"]);
    }

    #[tokio::test]
    async fn test_summarization_failure_keeps_formatted_text() {
        let gateway = Arc::new(MockGateway::default());
        let completion = Arc::new(MockCompletion::new(Err(CompletionError::Unavailable(
            "refused".into(),
        ))));
        let outcome = use_case(gateway)
            .with_completion(completion)
            .with_config(OrchestratorConfig {
                summarize: true,
                ..Default::default()
            })
            .execute(&Query::new("Weather in Tokyo"))
            .await;

        assert!(outcome.success);
        assert!(outcome.response.starts_with("Current weather in Tokyo"));
    }

    #[tokio::test]
    async fn test_summarization_replaces_response() {
        let gateway = Arc::new(MockGateway::default());
        let completion = Arc::new(MockCompletion::new(Ok("  Mild and cloudy in Tokyo. ".into())));
        let outcome = use_case(gateway)
            .with_completion(completion)
            .with_config(OrchestratorConfig {
                summarize: true,
                ..Default::default()
            })
            .execute(&Query::new("Weather in Tokyo"))
            .await;

        assert_eq!(outcome.response, "Mild and cloudy in Tokyo.");
    }

    #[tokio::test]
    async fn test_location_cap() {
        let gateway = Arc::new(MockGateway::default());
        let outcome = use_case(gateway.clone())
            .with_config(OrchestratorConfig {
                max_locations: 2,
                ..Default::default()
            })
            .execute(&Query::new("Compare London, Paris, Tokyo and Berlin"))
            .await;

        assert_eq!(outcome.locations, vec!["London", "Paris"]);
        assert_eq!(gateway.calls().len(), 2);
    }
}
