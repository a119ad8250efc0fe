//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is processed.

use weather_domain::Stage;

/// Callback for progress updates during query processing
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, log lines, etc.)
pub trait QueryProgressNotifier: Send + Sync {
    /// Called when the state machine enters a stage
    fn on_stage(&self, stage: Stage);

    /// Called before a fan-out of `total` upstream calls
    fn on_gather_start(&self, _total: usize) {}

    /// Called when one upstream call of a fan-out finishes
    fn on_call_complete(&self, _label: &str, _success: bool) {}

    /// Called once the query has a response
    fn on_finished(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl QueryProgressNotifier for NoProgress {
    fn on_stage(&self, _stage: Stage) {}
}
