//! Forecast periods
//!
//! Field names follow the NWS period objects so upstream payloads
//! deserialize directly. Every field is optional and read on its own;
//! missing or mistyped ones render as "Unknown" instead of failing the
//! whole forecast.

use super::lenient::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastPeriod {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub temperature_unit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub wind_speed: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub wind_direction: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub short_forecast: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub detailed_forecast: Option<String>,
}

impl ForecastPeriod {
    /// Short condition text, falling back to the detailed text
    pub fn condition(&self) -> Option<&str> {
        self.short_forecast
            .as_deref()
            .or(self.detailed_forecast.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_period() {
        let period: ForecastPeriod = serde_json::from_str(
            r#"{"name": "Tonight", "temperature": 55, "windSpeed": "5 mph", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(period.name.as_deref(), Some("Tonight"));
        assert_eq!(period.temperature, Some(55.0));
        assert!(period.wind_direction.is_none());
        assert!(period.condition().is_none());
    }

    #[test]
    fn test_mistyped_fields_default_independently() {
        let period: ForecastPeriod = serde_json::from_str(
            r#"{"name": "Tomorrow", "temperature": "Unknown", "windSpeed": 12, "shortForecast": "Sunny"}"#,
        )
        .unwrap();
        assert_eq!(period.name.as_deref(), Some("Tomorrow"));
        assert!(period.temperature.is_none());
        assert!(period.wind_speed.is_none());
        assert_eq!(period.condition(), Some("Sunny"));
    }
}
