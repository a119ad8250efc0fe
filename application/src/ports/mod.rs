//! Port definitions
//!
//! Traits the use cases depend on; adapters implement them in the
//! infrastructure and presentation layers.

pub mod progress;
pub mod source_gateway;
pub mod text_completion;
