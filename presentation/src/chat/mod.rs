//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for weather queries.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
