//! Adapts a [`SourceGateway`] into an [`ObservationSource`] for consensus

use async_trait::async_trait;
use std::sync::Arc;
use weather_application::ports::source_gateway::{ObservationSource, SourceGateway};
use weather_domain::{Observation, Place, SourceError};

/// Reads current conditions through a gateway and stamps them with `id`
pub struct GatewaySource {
    id: String,
    gateway: Arc<dyn SourceGateway>,
}

impl GatewaySource {
    pub fn new(id: impl Into<String>, gateway: Arc<dyn SourceGateway>) -> Self {
        Self {
            id: id.into(),
            gateway,
        }
    }
}

#[async_trait]
impl ObservationSource for GatewaySource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn observe(&self, place: &Place) -> Result<Observation, SourceError> {
        let mut observation = self.gateway.current_conditions(&place.name).await?;
        observation.source = self.id.clone();
        Ok(observation)
    }
}
