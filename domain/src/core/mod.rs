//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: an immutable natural-language weather question
//! - [`error::DomainError`] / [`error::SourceError`]: domain-level errors

pub mod error;
pub mod query;
