//! Intent detection
//!
//! Two deliberately separate keyword classifiers:
//!
//! - [`classifier`]: fine-grained [`TaskCategory`](classifier::TaskCategory)
//!   used by the orchestration state machine
//! - [`strategy`]: coarse [`CoordinationStrategy`](strategy::CoordinationStrategy)
//!   used by the top-level router

pub mod classifier;
pub mod strategy;

pub use classifier::{TaskCategory, classify};
pub use strategy::{CoordinationStrategy, wants_alert_setup};
