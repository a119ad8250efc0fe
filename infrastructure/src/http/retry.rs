//! Retry with exponential backoff for upstream HTTP calls
//!
//! Retries timeouts, connection failures, 5xx and 429 responses. Other 4xx
//! responses are returned to the caller immediately.

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff parameters for one class of upstream calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt + 1`, capped at `max_delay_ms`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped = if base.is_finite() {
            (base as u64).min(self.max_delay_ms)
        } else {
            self.max_delay_ms
        };
        Duration::from_millis(capped)
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out.
    ///
    /// A retryable status on the final attempt is returned as `Ok` so the
    /// caller can report the status it saw.
    pub async fn send<F, Fut>(&self, operation: F) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(response) => {
                    let status = response.status();
                    if classify_status(status) == RetryDecision::NoRetry
                        || attempt >= self.max_retries
                    {
                        if attempt > 0 {
                            debug!("Request finished with {} after {} retries", status, attempt);
                        }
                        return Ok(response);
                    }
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        status = %status,
                        "Retrying upstream request"
                    );
                }
                Err(e) => {
                    if classify_error(&e) == RetryDecision::NoRetry || attempt >= self.max_retries {
                        return Err(e);
                    }
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        error = %e,
                        "Retrying upstream request"
                    );
                }
            }

            tokio::time::sleep(self.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

/// Whether a response status is worth another attempt
pub fn classify_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Whether a transport error is worth another attempt
pub fn classify_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    match error.status() {
        Some(status) => classify_status(status),
        None => RetryDecision::NoRetry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_delay_ms: 2000,
            backoff_multiplier: 10.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(400), Duration::from_millis(2000));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            RetryDecision::Retry
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            RetryDecision::Retry
        );
        assert_eq!(classify_status(StatusCode::NOT_FOUND), RetryDecision::NoRetry);
        assert_eq!(classify_status(StatusCode::BAD_REQUEST), RetryDecision::NoRetry);
        assert_eq!(classify_status(StatusCode::OK), RetryDecision::NoRetry);
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/flaky", server.uri());
        let calls = Arc::new(AtomicU32::new(0));
        let response = fast_policy(3)
            .send(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                client.get(&url).send()
            })
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/missing", server.uri());
        let response = fast_policy(3)
            .send(|| client.get(&url).send())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/down", server.uri());
        let response = fast_policy(2)
            .send(|| client.get(&url).send())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
