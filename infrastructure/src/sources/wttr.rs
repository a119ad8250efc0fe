//! wttr.in observation source (`/{location}?format=j1`)

use crate::gateway::loose_number;
use crate::http::{
    HttpSettings, HttpSetupError, build_client, normalize_base_url, read_json, transport_error,
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use weather_application::ports::source_gateway::ObservationSource;
use weather_domain::{Observation, Place, SourceError, Temperature};

pub const WTTR_SOURCE: &str = "wttr";
pub const DEFAULT_WTTR_BASE_URL: &str = "https://wttr.in";

#[derive(Debug, Deserialize)]
struct J1Response {
    #[serde(default)]
    current_condition: Vec<J1Current>,
}

#[derive(Debug, Deserialize)]
struct J1Current {
    #[serde(rename = "temp_F", default)]
    temp_f: Option<Value>,
    #[serde(rename = "temp_C", default)]
    temp_c: Option<Value>,
    #[serde(default)]
    humidity: Option<Value>,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<J1Text>,
}

#[derive(Debug, Deserialize)]
struct J1Text {
    value: String,
}

pub struct WttrSource {
    client: Client,
    base_url: String,
    settings: HttpSettings,
}

impl WttrSource {
    pub fn new(base_url: &str, settings: HttpSettings) -> Result<Self, HttpSetupError> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            base_url: normalize_base_url(base_url)?,
            settings,
        })
    }

    fn url_for(&self, location: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::InvalidInput(format!("bad wttr base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidInput("wttr base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(location.trim());
        url.query_pairs_mut().append_pair("format", "j1");
        Ok(url)
    }
}

#[async_trait]
impl ObservationSource for WttrSource {
    fn id(&self) -> &str {
        WTTR_SOURCE
    }

    async fn observe(&self, place: &Place) -> Result<Observation, SourceError> {
        if place.name.trim().is_empty() {
            return Err(SourceError::InvalidInput("location is empty".into()));
        }
        let url = self.url_for(&place.name)?;
        debug!("GET {}", url);

        let response = self
            .settings
            .retry
            .send(|| self.client.get(url.clone()).send())
            .await
            .map_err(transport_error)?;
        let body: J1Response = read_json(response).await?;

        let current = body
            .current_condition
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::ParseError("no current_condition block".into()))?;

        let temperature = current
            .temp_f
            .as_ref()
            .and_then(loose_number)
            .map(Temperature::fahrenheit)
            .or_else(|| {
                current
                    .temp_c
                    .as_ref()
                    .and_then(loose_number)
                    .map(Temperature::from_celsius)
            })
            .ok_or_else(|| SourceError::ParseError("no usable temperature".into()))?;
        let condition = current
            .weather_desc
            .into_iter()
            .next()
            .map(|d| d.value)
            .unwrap_or_else(|| "Unknown".to_string());

        let mut observation =
            Observation::new(WTTR_SOURCE, place.name.clone(), temperature, condition);
        if let Some(humidity) = current.humidity.as_ref().and_then(loose_number) {
            observation = observation.with_humidity(humidity);
        }
        Ok(observation)
    }
}
