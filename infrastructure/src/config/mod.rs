//! Configuration file support
//!
//! Layered TOML configuration (defaults, global, project, explicit path,
//! environment) and its conversion into application settings.

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileAlertsConfig, FileCompletionConfig, FileConfig, FileLoggingConfig,
    FileOrchestratorConfig, FileServerConfig, FileSourcesConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
