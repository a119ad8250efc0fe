//! Use cases
//!
//! Each use case wires domain logic to the ports it needs.

pub mod alert_monitor;
pub mod get_consensus;
pub mod process_query;
pub mod route_query;
