//! HTTP adapter for the weather-tool server
//!
//! The server exposes three JSON endpoints:
//!
//! - `POST /tools/get_weather {"city"}`: current conditions
//! - `POST /tools/get_forecast {"latitude", "longitude"}`: `{"periods": [...]}`
//! - `POST /tools/get_alerts {"state"}`: `{"features": [{"properties": ...}]}`
//!
//! Any endpoint may answer with `{"error", "status"}` instead.

use crate::http::{
    HttpSettings, HttpSetupError, build_client, normalize_base_url, transport_error,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use weather_application::ports::source_gateway::SourceGateway;
use weather_domain::{
    AlertRecord, Coordinates, ForecastPeriod, Observation, RegionCode, SourceError, Temperature,
};

/// Source id stamped on observations fetched through the tool server
pub const TOOL_SERVER_SOURCE: &str = "mcp";

const MAX_CITY_LEN: usize = 100;

#[derive(Debug, Deserialize)]
struct ToolFailure {
    error: String,
    #[serde(default)]
    status: Option<String>,
}

impl From<ToolFailure> for SourceError {
    fn from(failure: ToolFailure) -> Self {
        SourceError::from_status(failure.status.as_deref().unwrap_or("unavailable"), failure.error)
    }
}

/// A tool response is either the payload or an error object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ToolResponse<T> {
    Failure(ToolFailure),
    Payload(T),
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    temperature_f: Option<Value>,
    #[serde(default)]
    temperature_c: Option<Value>,
    #[serde(default)]
    humidity: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    periods: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct AlertsPayload {
    features: Vec<Value>,
}

/// Convert entries one by one; an entry that doesn't convert is skipped
fn convert_each<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    let total = items.len();
    let converted: Vec<T> = items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item)
                .inspect_err(|e| debug!("Skipping unreadable {}: {}", what, e))
                .ok()
        })
        .collect();
    if converted.len() < total {
        warn!("Skipped {} of {} {} entries", total - converted.len(), total, what);
    }
    converted
}

/// Upstream values arrive as numbers or as numeric strings ("Unknown" otherwise)
pub(crate) fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// [`SourceGateway`] backed by the weather-tool server
pub struct ToolServerGateway {
    client: Client,
    base_url: String,
    settings: HttpSettings,
}

impl ToolServerGateway {
    pub fn new(base_url: &str, settings: HttpSettings) -> Result<Self, HttpSetupError> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            base_url: normalize_base_url(base_url)?,
            settings,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        tool: &str,
        body: Value,
        timeout: Duration,
    ) -> Result<T, SourceError> {
        let url = format!("{}/tools/{}", self.base_url, tool);
        debug!("POST {} {}", url, body);

        let response = self
            .settings
            .retry
            .send(|| self.client.post(&url).timeout(timeout).json(&body).send())
            .await
            .map_err(transport_error)?;

        decode_tool_response(response).await
    }
}

async fn decode_tool_response<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;

    if !status.is_success() {
        // The server reports its own failures as JSON when it can
        if let Ok(failure) = serde_json::from_slice::<ToolFailure>(&bytes) {
            return Err(failure.into());
        }
        return Err(SourceError::Unavailable(format!("HTTP {status}")));
    }

    match serde_json::from_slice::<ToolResponse<T>>(&bytes) {
        Ok(ToolResponse::Payload(payload)) => Ok(payload),
        Ok(ToolResponse::Failure(failure)) => Err(failure.into()),
        Err(e) => Err(SourceError::ParseError(e.to_string())),
    }
}

fn sanitize_city(city: &str) -> Result<String, SourceError> {
    let cleaned: String = city
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';'))
        .collect();
    if cleaned.is_empty() {
        return Err(SourceError::InvalidInput("city name is empty".to_string()));
    }
    if cleaned.chars().count() > MAX_CITY_LEN {
        return Err(SourceError::InvalidInput("city name too long".to_string()));
    }
    Ok(cleaned)
}

fn observation_from(location: &str, current: CurrentBlock) -> Result<Observation, SourceError> {
    let temperature = current
        .temperature_f
        .as_ref()
        .and_then(loose_number)
        .map(Temperature::fahrenheit)
        .or_else(|| {
            current
                .temperature_c
                .as_ref()
                .and_then(loose_number)
                .map(Temperature::from_celsius)
        })
        .ok_or_else(|| SourceError::ParseError("response carries no usable temperature".into()))?;

    let condition = current
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut observation = Observation::new(TOOL_SERVER_SOURCE, location, temperature, condition);
    if let Some(humidity) = current.humidity.as_ref().and_then(loose_number) {
        observation = observation.with_humidity(humidity);
    }
    Ok(observation)
}

#[async_trait]
impl SourceGateway for ToolServerGateway {
    async fn current_conditions(&self, location: &str) -> Result<Observation, SourceError> {
        let city = sanitize_city(location)?;
        let payload: WeatherPayload = self
            .call("get_weather", json!({ "city": city }), self.settings.timeout)
            .await
            .inspect_err(|e| warn!("get_weather failed for {}: {}", location, e))?;
        observation_from(location, payload.current)
    }

    async fn forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastPeriod>, SourceError> {
        let payload: ForecastPayload = self
            .call(
                "get_forecast",
                json!({
                    "latitude": coordinates.latitude(),
                    "longitude": coordinates.longitude(),
                }),
                self.settings.forecast_timeout,
            )
            .await
            .inspect_err(|e| warn!("get_forecast failed for {}: {}", coordinates, e))?;
        Ok(convert_each(payload.periods, "forecast period"))
    }

    async fn alerts(&self, region: &RegionCode) -> Result<Vec<AlertRecord>, SourceError> {
        let payload: AlertsPayload = self
            .call("get_alerts", json!({ "state": region.as_str() }), self.settings.timeout)
            .await
            .inspect_err(|e| warn!("get_alerts failed for {}: {}", region, e))?;
        let properties = payload
            .features
            .into_iter()
            .map(|mut feature| feature.get_mut("properties").map(Value::take).unwrap_or_default())
            .collect();
        Ok(convert_each(properties, "alert"))
    }
}
