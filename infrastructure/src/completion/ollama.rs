//! Ollama-style completion client (`POST /api/generate`, non-streaming)

use crate::http::{HttpSetupError, build_client, normalize_base_url};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use weather_application::ports::text_completion::{CompletionError, TextCompletion};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaCompletion {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaCompletion {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpSetupError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url)?,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextCompletion for OllamaCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("Completion request to {} ({} chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Unavailable(format!("HTTP {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        let text = body.response.trim();
        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> OllamaCompletion {
        OllamaCompletion::new(&server.uri(), "llama3", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({ "model": "llama3", "stream": false })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "  London, Paris\n", "done": true })),
            )
            .mount(&server)
            .await;

        let text = client(&server).await.complete("Extract places").await.unwrap();
        assert_eq!(text, "London, Paris");
    }

    #[tokio::test]
    async fn test_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": " " })))
            .mount(&server)
            .await;

        let err = client(&server).await.complete("x").await.unwrap_err();
        assert_eq!(err, CompletionError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_http_failure_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).await.complete("x").await.unwrap_err();
        assert!(matches!(err, CompletionError::Unavailable(_)));
    }
}
