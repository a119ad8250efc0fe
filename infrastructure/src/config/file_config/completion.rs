//! Text-completion service configuration from TOML (`[completion]` section)

use serde::{Deserialize, Serialize};

/// Raw completion configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompletionConfig {
    /// Without this the keyword paths are used everywhere
    pub enabled: bool,
    /// Ollama-compatible endpoint
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for FileCompletionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 30,
        }
    }
}
