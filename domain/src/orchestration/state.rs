//! Orchestration state machine
//!
//! A query moves through named stages:
//!
//! ```text
//! Start → Classified → LocationsExtracted → DataGathered → Responded → Done
//!                   └────────────── (general inquiry) ──────┘
//! ```
//!
//! [`step`] is pure: it consumes the state and an [`Event`] and returns the
//! next state, or [`DomainError::InvalidTransition`] when the event doesn't
//! apply to the current stage.

use super::plan::GatheredData;
use crate::core::error::DomainError;
use crate::core::query::Query;
use crate::intent::TaskCategory;
use crate::location::Place;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Classified,
    LocationsExtracted,
    DataGathered,
    Responded,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Classified => "classified",
            Stage::LocationsExtracted => "locations_extracted",
            Stage::DataGathered => "data_gathered",
            Stage::Responded => "responded",
            Stage::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Classified(TaskCategory),
    LocationsExtracted(Vec<Place>),
    DataGathered(GatheredData),
    Responded(String),
    Finished,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Classified(_) => "classified",
            Event::LocationsExtracted(_) => "locations_extracted",
            Event::DataGathered(_) => "data_gathered",
            Event::Responded(_) => "responded",
            Event::Finished => "finished",
        }
    }
}

/// What the driver should do next for a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Classify,
    ExtractLocations,
    Gather,
    Respond,
    Finish,
    Stop,
}

/// Everything known about one in-flight query
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationState {
    pub query: Query,
    pub stage: Stage,
    pub category: Option<TaskCategory>,
    pub locations: Vec<Place>,
    pub gathered: Option<GatheredData>,
    pub response: Option<String>,
    execution_log: Vec<String>,
}

impl OrchestrationState {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            stage: Stage::Start,
            category: None,
            locations: Vec::new(),
            gathered: None,
            response: None,
            execution_log: Vec::new(),
        }
    }

    pub fn execution_log(&self) -> &[String] {
        &self.execution_log
    }

    pub fn location_names(&self) -> Vec<String> {
        self.locations.iter().map(|p| p.name.clone()).collect()
    }

    /// Next step for the driver; [`NextAction::Stop`] once done
    pub fn next_action(&self) -> NextAction {
        match self.stage {
            Stage::Start => NextAction::Classify,
            Stage::Classified => match self.category {
                Some(c) if c.gathers_data() => NextAction::ExtractLocations,
                _ => NextAction::Respond,
            },
            Stage::LocationsExtracted => NextAction::Gather,
            Stage::DataGathered => NextAction::Respond,
            Stage::Responded => NextAction::Finish,
            Stage::Done => NextAction::Stop,
        }
    }

    fn log(&mut self, entry: impl Into<String>) {
        self.execution_log.push(entry.into());
    }
}

/// Advance the state machine by one event.
pub fn step(mut state: OrchestrationState, event: Event) -> Result<OrchestrationState, DomainError> {
    let gathers = state.category.is_some_and(|c| c.gathers_data());
    match (state.stage, event) {
        (Stage::Start, Event::Classified(category)) => {
            state.log(format!("Task classified as: {category}"));
            state.category = Some(category);
            state.stage = Stage::Classified;
        }
        (Stage::Classified, Event::LocationsExtracted(places)) if gathers => {
            let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
            state.log(format!("Extracted locations: {names:?}"));
            state.locations = places;
            state.stage = Stage::LocationsExtracted;
        }
        (Stage::LocationsExtracted, Event::DataGathered(data)) => {
            state.log(data.log_line());
            state.gathered = Some(data);
            state.stage = Stage::DataGathered;
        }
        (Stage::Classified, Event::Responded(text)) if !gathers => {
            state.log("Generated response");
            state.response = Some(text);
            state.stage = Stage::Responded;
        }
        (Stage::DataGathered, Event::Responded(text)) => {
            state.log("Generated response");
            state.response = Some(text);
            state.stage = Stage::Responded;
        }
        (Stage::Responded, Event::Finished) => {
            state.stage = Stage::Done;
        }
        (stage, event) => {
            return Err(DomainError::InvalidTransition {
                from: stage.to_string(),
                event: event.name().to_string(),
            });
        }
    }
    Ok(state)
}
