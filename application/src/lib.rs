//! Application layer for weather-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AlertConfig, ExtractionMode, OrchestratorConfig};
pub use ports::{
    progress::{NoProgress, QueryProgressNotifier},
    source_gateway::{ObservationSource, SourceGateway},
    text_completion::{CompletionError, TextCompletion},
};
pub use use_cases::alert_monitor::{AlertMonitorError, AlertMonitorUseCase};
pub use use_cases::get_consensus::{ConsensusOutcome, GetConsensusUseCase};
pub use use_cases::process_query::{ProcessQueryUseCase, QueryOutcome};
pub use use_cases::route_query::{CoordinationRouter, RoutedPayload, RoutedResult, Workflow};
