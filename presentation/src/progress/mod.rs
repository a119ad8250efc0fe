//! Progress display while a query runs

pub mod reporter;
