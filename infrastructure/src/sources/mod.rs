//! [`ObservationSource`] adapters used by the consensus workflow

mod gateway_source;
mod nws;
mod wttr;

pub use gateway_source::GatewaySource;
pub use nws::{DEFAULT_NWS_BASE_URL, NWS_SOURCE, NwsSource};
pub use wttr::{DEFAULT_WTTR_BASE_URL, WTTR_SOURCE, WttrSource};

use crate::config::FileSourcesConfig;
use crate::gateway::TOOL_SERVER_SOURCE;
use crate::http::{HttpSettings, HttpSetupError};
use std::sync::Arc;
use tracing::warn;
use weather_application::ports::source_gateway::{ObservationSource, SourceGateway};

/// Source ids that [`build_sources`] knows how to construct
pub const KNOWN_SOURCES: &[&str] = &[NWS_SOURCE, WTTR_SOURCE, TOOL_SERVER_SOURCE];

/// Construct the enabled consensus sources, in configured order.
///
/// The tool-server source reuses `gateway`. Unknown ids are skipped with a
/// warning.
pub fn build_sources(
    config: &FileSourcesConfig,
    settings: &HttpSettings,
    gateway: Arc<dyn SourceGateway>,
) -> Result<Vec<Arc<dyn ObservationSource>>, HttpSetupError> {
    let mut sources: Vec<Arc<dyn ObservationSource>> = Vec::new();
    for id in &config.enabled {
        match id.as_str() {
            NWS_SOURCE => sources.push(Arc::new(NwsSource::new(
                &config.nws_base_url,
                settings.clone(),
            )?)),
            WTTR_SOURCE => sources.push(Arc::new(WttrSource::new(
                &config.wttr_base_url,
                settings.clone(),
            )?)),
            TOOL_SERVER_SOURCE => sources.push(Arc::new(GatewaySource::new(
                TOOL_SERVER_SOURCE,
                gateway.clone(),
            ))),
            other => warn!("Ignoring unknown consensus source '{}'", other),
        }
    }
    Ok(sources)
}
