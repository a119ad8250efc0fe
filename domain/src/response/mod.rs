//! Response formatting

pub mod formatter;

pub use formatter::{format_response, general_help, packing_advice};
