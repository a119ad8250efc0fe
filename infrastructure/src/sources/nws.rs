//! National Weather Service observation source
//!
//! NWS has no "current conditions by name" call: the place's coordinates are
//! resolved to a forecast grid via `/points/{lat},{lon}` and the first
//! forecast period stands in for current conditions.

use crate::http::{HttpSettings, HttpSetupError, build_client, normalize_base_url, read_json, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use weather_application::ports::source_gateway::ObservationSource;
use weather_domain::{Coordinates, Gazetteer, Observation, Place, SourceError, Temperature};

pub const NWS_SOURCE: &str = "nws";
pub const DEFAULT_NWS_BASE_URL: &str = "https://api.weather.gov";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    #[serde(default)]
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    temperature: Option<f64>,
    #[serde(default)]
    temperature_unit: Option<String>,
    #[serde(default)]
    short_forecast: Option<String>,
    #[serde(default)]
    relative_humidity: Option<UnitValue>,
}

#[derive(Debug, Deserialize)]
struct UnitValue {
    value: Option<f64>,
}

pub struct NwsSource {
    client: Client,
    base_url: String,
    settings: HttpSettings,
    gazetteer: Gazetteer,
}

impl NwsSource {
    pub fn new(base_url: &str, settings: HttpSettings) -> Result<Self, HttpSetupError> {
        Ok(Self {
            client: build_client(settings.forecast_timeout)?,
            base_url: normalize_base_url(base_url)?,
            settings,
            gazetteer: Gazetteer::builtin(),
        })
    }

    fn coordinates_for(&self, place: &Place) -> Result<Coordinates, SourceError> {
        place
            .coordinates
            .or_else(|| self.gazetteer.coordinates_for(&place.name))
            .ok_or_else(|| {
                SourceError::InvalidInput(format!("no coordinates known for {}", place.name))
            })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        debug!("GET {}", url);
        let response = self
            .settings
            .retry
            .send(|| {
                self.client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "application/geo+json")
                    .send()
            })
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl ObservationSource for NwsSource {
    fn id(&self) -> &str {
        NWS_SOURCE
    }

    async fn observe(&self, place: &Place) -> Result<Observation, SourceError> {
        let coordinates = self.coordinates_for(place)?;

        let points: PointsResponse = self
            .get_json(&format!("{}/points/{}", self.base_url, coordinates))
            .await?;
        let forecast_url = points.properties.forecast.ok_or_else(|| {
            SourceError::Unavailable(format!(
                "forecast not available for {coordinates}; location may be outside US coverage"
            ))
        })?;

        let forecast: ForecastResponse = self.get_json(&forecast_url).await?;
        let period = forecast
            .properties
            .periods
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Unavailable("no forecast periods returned".into()))?;

        let value = period
            .temperature
            .ok_or_else(|| SourceError::ParseError("forecast period has no temperature".into()))?;
        let temperature = match period.temperature_unit.as_deref() {
            Some("C") => Temperature::from_celsius(value),
            _ => Temperature::fahrenheit(value),
        };

        let mut observation = Observation::new(
            NWS_SOURCE,
            place.name.clone(),
            temperature,
            period.short_forecast.unwrap_or_else(|| "Unknown".to_string()),
        );
        if let Some(humidity) = period.relative_humidity.and_then(|h| h.value) {
            observation = observation.with_humidity(humidity);
        }
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> NwsSource {
        let settings = HttpSettings {
            retry: RetryPolicy::none(),
            ..HttpSettings::default()
        };
        NwsSource::new(&server.uri(), settings).unwrap()
    }

    #[tokio::test]
    async fn test_observe_uses_first_period() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/37.7749,-122.4194"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {
                    "forecast": format!("{}/gridpoints/MTR/85,105/forecast", server.uri())
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gridpoints/MTR/85,105/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "periods": [
                    {
                        "temperature": 61,
                        "temperatureUnit": "F",
                        "shortForecast": "Patchy Fog",
                        "relativeHumidity": { "unitCode": "wmoUnit:percent", "value": 88 }
                    },
                    { "temperature": 52, "temperatureUnit": "F", "shortForecast": "Clear" }
                ] }
            })))
            .mount(&server)
            .await;

        let obs = source(&server)
            .observe(&Place::named("San Francisco"))
            .await
            .unwrap();
        assert_eq!(obs.source, "nws");
        assert_eq!(obs.temperature.as_fahrenheit(), 61.0);
        assert_eq!(obs.condition, "Patchy Fog");
        assert_eq!(obs.humidity, Some(88.0));
    }

    #[tokio::test]
    async fn test_unmapped_place_is_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = source(&server)
            .observe(&Place::named("Springfield"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), "invalid_input");
    }

    #[tokio::test]
    async fn test_missing_forecast_url_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/51.5074,-0.1278"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": {} })))
            .mount(&server)
            .await;

        let err = source(&server)
            .observe(&Place::named("London"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), "unavailable");
    }

    #[tokio::test]
    async fn test_not_found_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source(&server)
            .observe(&Place::named("Chicago"))
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::Unavailable("HTTP 404 Not Found".into()));
    }
}
