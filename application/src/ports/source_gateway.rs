//! Source gateway ports
//!
//! Define how the application layer reaches upstream weather data.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use weather_domain::{
    AlertRecord, Coordinates, ForecastPeriod, Observation, Place, RegionCode, SourceError,
};

/// Uniform access to the weather-tool server's three services
///
/// Every method returns a typed [`SourceError`] rather than panicking or
/// retrying forever; retries and timeouts are the adapter's business.
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// Current conditions for a named location
    async fn current_conditions(&self, location: &str) -> Result<Observation, SourceError>;

    /// Forecast periods for a coordinate pair
    async fn forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastPeriod>, SourceError>;

    /// Active alerts for a US state
    async fn alerts(&self, region: &RegionCode) -> Result<Vec<AlertRecord>, SourceError>;
}

/// One independent provider of current conditions, used for consensus
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Stable identifier used for reliability lookup (e.g. "nws")
    fn id(&self) -> &str;

    async fn observe(&self, place: &Place) -> Result<Observation, SourceError>;
}
