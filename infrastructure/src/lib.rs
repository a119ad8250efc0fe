//! Infrastructure layer for weather-agent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP gateways and observation sources for the
//! upstream weather services, the completion client, the server directory,
//! and configuration file loading.

pub mod completion;
pub mod config;
pub mod directory;
pub mod gateway;
pub mod http;
pub mod sources;

// Re-export commonly used types
pub use completion::OllamaCompletion;
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use directory::{ServerEntry, ServerStatus, SourceDirectory, WEATHER_SERVER};
pub use gateway::ToolServerGateway;
pub use http::{HttpSettings, HttpSetupError, RetryPolicy};
pub use sources::{GatewaySource, NwsSource, WttrSource, build_sources};
