//! Query orchestration
//!
//! A pure state machine ([`state`]) plus the per-category gather plans
//! ([`plan`]). The async driver that performs the calls lives in the
//! application layer.

pub mod plan;
pub mod state;

pub use plan::{GatherPlan, GatheredData, LocationWeather};
pub use state::{Event, NextAction, OrchestrationState, Stage, step};
