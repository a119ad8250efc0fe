//! Text completion port
//!
//! Optional collaborator used for location extraction and response
//! summarization. Its absence or failure always degrades to the keyword
//! paths; it is never required.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    #[error("Completion request timed out")]
    Timeout,

    #[error("Completion service returned an empty answer")]
    EmptyResponse,

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Send a prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
