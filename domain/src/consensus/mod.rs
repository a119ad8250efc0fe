//! Multi-source consensus
//!
//! Readings from independent sources are replicated by reliability, averaged
//! and scored for agreement. See [`engine::compute`].

pub mod engine;
pub mod reliability;
pub mod report;

pub use engine::{ConsensusResult, DISCREPANCY_THRESHOLD_F, compute};
pub use reliability::ReliabilityTable;
pub use report::{ConfidenceTier, intelligence_report, recommendations};
