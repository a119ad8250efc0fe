//! Weather data as returned by upstream sources

pub mod alert;
pub mod forecast;
mod lenient;
pub mod observation;

pub use alert::AlertRecord;
pub use forecast::ForecastPeriod;
pub use observation::{Observation, SourceReading, Temperature};
