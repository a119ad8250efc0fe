//! Domain error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No weather data available for {location}: every source failed")]
    NoDataAvailable { location: String },

    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
}

impl DomainError {
    /// Check if this error means no source produced usable data
    pub fn is_no_data(&self) -> bool {
        matches!(self, DomainError::NoDataAvailable { .. })
    }
}

/// Failure of a single upstream source call.
///
/// Recorded per location / per source; never aborts sibling work.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SourceError {
    /// Network failure, timeout or non-2xx response
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Response body could not be decoded
    #[error("could not parse source response: {0}")]
    ParseError(String),

    /// The request was rejected before reaching the source
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SourceError {
    /// Machine-readable status string
    pub fn status(&self) -> &'static str {
        match self {
            SourceError::Unavailable(_) => "unavailable",
            SourceError::ParseError(_) => "parse_error",
            SourceError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Human-readable detail without the status prefix
    pub fn message(&self) -> &str {
        match self {
            SourceError::Unavailable(m)
            | SourceError::ParseError(m)
            | SourceError::InvalidInput(m) => m,
        }
    }

    /// Build from a status string reported by an upstream service.
    ///
    /// Unknown statuses are treated as unavailability.
    pub fn from_status(status: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            "parse_error" => SourceError::ParseError(message),
            "invalid_input" | "bad_request" => SourceError::InvalidInput(message),
            _ => SourceError::Unavailable(message),
        }
    }
}

impl From<DomainError> for SourceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(m) => SourceError::InvalidInput(m),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_display() {
        let error = DomainError::NoDataAvailable {
            location: "Paris".to_string(),
        };
        assert!(error.to_string().contains("Paris"));
        assert!(error.is_no_data());
        assert!(!DomainError::InvalidInput("x".into()).is_no_data());
    }

    #[test]
    fn test_source_error_status() {
        assert_eq!(SourceError::Unavailable("x".into()).status(), "unavailable");
        assert_eq!(SourceError::ParseError("x".into()).status(), "parse_error");
        assert_eq!(SourceError::InvalidInput("x".into()).status(), "invalid_input");
    }

    #[test]
    fn test_from_status() {
        assert_eq!(
            SourceError::from_status("parse_error", "bad body"),
            SourceError::ParseError("bad body".into())
        );
        assert_eq!(
            SourceError::from_status("bad_request", "missing city"),
            SourceError::InvalidInput("missing city".into())
        );
        assert_eq!(
            SourceError::from_status("server_error", "boom"),
            SourceError::Unavailable("boom".into())
        );
    }

    #[test]
    fn test_domain_error_into_source_error() {
        let err: SourceError = DomainError::InvalidInput("latitude".into()).into();
        assert_eq!(err.status(), "invalid_input");
        assert_eq!(err.message(), "latitude");
    }
}
