//! Domain layer for weather-agent
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Orchestration
//!
//! A query is classified into a [`TaskCategory`], its places are resolved
//! against a static [`Gazetteer`], and a [`GatherPlan`] decides which
//! upstream calls to make. The pure [`step`] function moves an
//! [`OrchestrationState`] through its stages.
//!
//! ## Consensus
//!
//! Readings of the same place from several sources are weighted by a
//! [`ReliabilityTable`] and merged into a [`ConsensusResult`] with a
//! confidence score.
//!
//! ## Alerting
//!
//! [`AlertSubscription`]s are evaluated against current conditions to derive
//! [`TriggeredAlert`]s.

pub mod alerting;
pub mod consensus;
pub mod core;
pub mod intent;
pub mod location;
pub mod orchestration;
pub mod response;
pub mod weather;

// Re-export commonly used types
pub use alerting::{
    AlertSeverity, AlertSubscription, AlertType, ConditionsSnapshot, NotificationPreferences,
    SubscriptionConfig, Thresholds, TriggeredAlert,
};
pub use consensus::{ConsensusResult, ReliabilityTable};
pub use core::{
    error::{DomainError, SourceError},
    query::Query,
};
pub use intent::{CoordinationStrategy, TaskCategory, classify, wants_alert_setup};
pub use location::{Coordinates, Gazetteer, Place, RegionCode, TravelContext, TravelType};
pub use orchestration::{
    Event, GatherPlan, GatheredData, LocationWeather, NextAction, OrchestrationState, Stage, step,
};
pub use response::format_response;
pub use weather::{AlertRecord, ForecastPeriod, Observation, SourceReading, Temperature};
