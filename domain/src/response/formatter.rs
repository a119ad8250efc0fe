//! Plain-text responses for orchestrated queries

use crate::core::error::SourceError;
use crate::intent::TaskCategory;
use crate::location::TravelContext;
use crate::orchestration::{GatheredData, LocationWeather};
use crate::weather::{AlertRecord, ForecastPeriod, Observation};

/// Periods shown in a forecast response
pub const MAX_FORECAST_PERIODS: usize = 5;
/// Alert blocks shown in an alerts response
pub const MAX_ALERTS: usize = 10;
const MAX_FIELD_CHARS: usize = 500;
const UNKNOWN: &str = "Unknown";

/// Render the response for a category and whatever was gathered for it.
///
/// Combinations without a dedicated layout fall back to the gathered data
/// as pretty-printed JSON.
pub fn format_response(category: TaskCategory, gathered: Option<&GatheredData>) -> String {
    match (category, gathered) {
        (TaskCategory::GeneralInquiry, _) => general_help(),
        (_, Some(GatheredData::Unavailable { reason })) => {
            format!("{reason}. Try a location from the supported list, e.g. London or New York.")
        }
        (TaskCategory::MultiLocation, Some(GatheredData::Current { readings }))
            if !readings.is_empty() =>
        {
            format_multi_location(readings)
        }
        (_, Some(GatheredData::Current { readings })) => match readings.as_slice() {
            [] => no_locations(),
            [single] => format_single_location(single),
            many => format_multi_location(many),
        },
        (_, Some(GatheredData::Forecast { location, result })) => match result {
            Ok(periods) => format_forecast(location, periods),
            Err(e) => format!("Error getting forecast for {location}: {}", e.message()),
        },
        (_, Some(GatheredData::Alerts { location, region, result })) => match result {
            Ok(records) => format_alerts(&format!("{location} ({region})"), records),
            Err(e) => format!("Error getting alerts for {location}: {}", e.message()),
        },
        (_, Some(GatheredData::Travel { context, readings })) => format_travel(context, readings),
        (_, other) => fallback(other),
    }
}

fn fallback(gathered: Option<&GatheredData>) -> String {
    let raw = serde_json::to_string_pretty(&gathered).unwrap_or_else(|_| "null".to_string());
    format!("I processed your query but couldn't format a proper response. Raw data:\n{raw}")
}

fn no_locations() -> String {
    "I couldn't find a supported location in your question. \
     Try asking about a city such as London, Paris or New York."
        .to_string()
}

fn describe(obs: &Observation) -> String {
    let mut text = format!("{}, {}", obs.temperature, obs.condition);
    if let Some(h) = obs.humidity {
        text.push_str(&format!(", humidity {h:.0}%"));
    }
    text
}

pub fn format_single_location(reading: &LocationWeather) -> String {
    match &reading.result {
        Ok(obs) => format!(
            "Current weather in {}:\n  Temperature: {}\n  Conditions: {}",
            reading.location, obs.temperature, obs.condition
        ),
        Err(e) => error_line(&reading.location, e),
    }
}

pub fn format_multi_location(readings: &[LocationWeather]) -> String {
    let lines: Vec<String> = readings
        .iter()
        .map(|r| match &r.result {
            Ok(obs) => format!("  {}: {}", r.location, describe(obs)),
            Err(e) => format!("  {}", error_line(&r.location, e)),
        })
        .collect();
    format!("Weather comparison:\n{}", lines.join("\n"))
}

fn error_line(location: &str, error: &SourceError) -> String {
    format!("Error getting weather for {location}: {}", error.message())
}

/// Strip markup-ish characters and cap length of upstream free text
fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';'))
        .take(MAX_FIELD_CHARS)
        .collect()
}

fn field(value: Option<&str>) -> String {
    value
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn format_forecast(location: &str, periods: &[ForecastPeriod]) -> String {
    if periods.is_empty() {
        return format!("No forecast periods available for {location}.");
    }
    let blocks: Vec<String> = periods
        .iter()
        .take(MAX_FORECAST_PERIODS)
        .map(|p| {
            let temperature = match p.temperature {
                Some(t) => format!(
                    "{t}°{}",
                    p.temperature_unit.as_deref().unwrap_or("F")
                ),
                None => UNKNOWN.to_string(),
            };
            format!(
                "{}:\n  Temperature: {}\n  Wind: {} {}\n  Forecast: {}",
                field(p.name.as_deref()),
                temperature,
                field(p.wind_speed.as_deref()),
                field(p.wind_direction.as_deref()),
                field(p.detailed_forecast.as_deref()),
            )
        })
        .collect();
    format!("Forecast for {location}:\n\n{}", blocks.join("\n\n"))
}

pub fn format_alerts(area: &str, records: &[AlertRecord]) -> String {
    if records.is_empty() {
        return format!("No active weather alerts for {area}.");
    }
    let blocks: Vec<String> = records
        .iter()
        .take(MAX_ALERTS)
        .map(|r| {
            format!(
                "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
                field(r.event.as_deref()),
                field(r.area_desc.as_deref()),
                field(r.severity.as_deref()),
                field(r.description.as_deref()),
                field(r.instruction.as_deref()),
            )
        })
        .collect();
    let divider = "=".repeat(50);
    format!(
        "Weather alerts for {area}:\n{divider}\n{}",
        blocks.join(&format!("\n{divider}\n"))
    )
}

/// Packing advice keyed off the condition text
pub fn packing_advice(condition: &str) -> Option<&'static str> {
    let condition = condition.to_lowercase();
    if condition.contains("rain") {
        Some("Pack rain gear and waterproof clothing")
    } else if condition.contains("snow") {
        Some("Pack warm winter clothing")
    } else if condition.contains("sun") || condition.contains("clear") {
        Some("Pack sun protection and light clothing")
    } else {
        None
    }
}

pub fn format_travel(context: &TravelContext, readings: &[LocationWeather]) -> String {
    if context.destinations.is_empty() {
        return "I couldn't find a destination in your travel question. \
                Capitalise place names, e.g. \"Plan a trip to Tokyo\"."
            .to_string();
    }

    let mut lines = vec![
        format!("Travel planning for {}", context.destinations.join(", ")),
        format!(
            "Duration: {} days ({})",
            context.duration_days,
            context.travel_type.as_str()
        ),
        String::new(),
    ];
    for reading in readings {
        match &reading.result {
            Ok(obs) => {
                lines.push(format!("{}: current conditions", reading.location));
                lines.push(format!("  Temperature: {}", obs.temperature));
                lines.push(format!("  Conditions: {}", obs.condition));
                if let Some(h) = obs.humidity {
                    lines.push(format!("  Humidity: {h:.0}%"));
                }
                if let Some(advice) = packing_advice(&obs.condition) {
                    lines.push(format!("  {advice}"));
                }
                lines.push(format!(
                    "  Consider the weather for your {}-day trip",
                    context.duration_days
                ));
            }
            Err(e) => lines.push(format!(
                "{}: could not get weather data - {}",
                reading.location,
                e.message()
            )),
        }
    }
    lines.push(String::new());
    lines.push("Travel tips:".to_string());
    for tip in [
        "Check weather updates before departure",
        "Pack layers for temperature changes",
        "Consider weather-appropriate activities",
        "Monitor weather alerts for your travel dates",
    ] {
        lines.push(format!("  - {tip}"));
    }
    lines.join("\n")
}

pub fn general_help() -> String {
    [
        "I can help with weather questions such as:",
        "  - Current conditions: \"What's the weather in London?\"",
        "  - Comparisons: \"Compare weather in Paris and New York\"",
        "  - Forecasts: \"Forecast for Chicago this week\"",
        "  - Alerts: \"Any weather alerts in California?\"",
        "  - Travel: \"Plan a trip to Tokyo this weekend\"",
        "  - Consensus: \"Most accurate weather for Boston from multiple sources\"",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::RegionCode;
    use crate::weather::Temperature;

    fn ok(location: &str, temp: f64, condition: &str) -> LocationWeather {
        LocationWeather::new(
            location,
            Ok(Observation::new("mcp", location, Temperature::fahrenheit(temp), condition)),
        )
    }

    fn failed(location: &str) -> LocationWeather {
        LocationWeather::new(location, Err(SourceError::Unavailable("timed out".into())))
    }

    #[test]
    fn test_multi_location_tags_errors_per_line() {
        let data = GatheredData::Current {
            readings: vec![ok("Paris", 60.0, "Cloudy"), failed("New York")],
        };
        let text = format_response(TaskCategory::MultiLocation, Some(&data));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Paris") && lines[1].contains("Cloudy"));
        assert!(lines[2].contains("Error getting weather for New York: timed out"));
    }

    #[test]
    fn test_single_location() {
        let data = GatheredData::Current {
            readings: vec![ok("London", 55.0, "Light rain")],
        };
        let text = format_response(TaskCategory::WeatherQuery, Some(&data));
        assert!(text.starts_with("Current weather in London"));
        assert!(text.contains("Light rain"));
    }

    #[test]
    fn test_forecast_caps_periods_and_defaults_fields() {
        let periods: Vec<ForecastPeriod> = (0..7)
            .map(|i| ForecastPeriod {
                name: Some(format!("Period {i}")),
                ..Default::default()
            })
            .collect();
        let text = format_forecast("Tokyo", &periods);
        assert!(text.contains("Period 4"));
        assert!(!text.contains("Period 5"));
        assert!(text.contains("Temperature: Unknown"));
        assert!(text.contains("Wind: Unknown Unknown"));
    }

    #[test]
    fn test_alerts_render_missing_fields_as_unknown() {
        let records = vec![
            AlertRecord::default(),
            AlertRecord {
                event: Some("Heat <Advisory>".into()),
                ..Default::default()
            },
        ];
        let text = format_alerts("Texas (TX)", &records);
        assert!(text.contains("Event: Heat Advisory"));
        assert!(text.contains("Event: Unknown"));
        assert_eq!(text.matches("Event:").count(), 2);
        assert!(text.contains("Severity: Unknown"));
    }

    #[test]
    fn test_alerts_empty() {
        assert!(format_alerts("CA", &[]).contains("No active weather alerts"));
    }

    #[test]
    fn test_alert_response_uses_region() {
        let data = GatheredData::Alerts {
            location: "California".into(),
            region: RegionCode::new("CA").unwrap(),
            result: Ok(vec![]),
        };
        let text = format_response(TaskCategory::AlertMonitoring, Some(&data));
        assert_eq!(text, "No active weather alerts for California (CA).");
    }

    #[test]
    fn test_unavailable_placeholder() {
        let data = GatheredData::unavailable("Could not get coordinates for forecast");
        let text = format_response(TaskCategory::ForecastAnalysis, Some(&data));
        assert!(text.starts_with("Could not get coordinates for forecast."));
    }

    #[test]
    fn test_general_inquiry_help() {
        let text = format_response(TaskCategory::GeneralInquiry, None);
        assert!(text.contains("Forecasts"));
    }

    #[test]
    fn test_fallback_renders_json() {
        let text = format_response(TaskCategory::AlertSetup, Some(&GatheredData::Nothing));
        assert!(text.contains("\"kind\": \"nothing\""));
    }

    #[test]
    fn test_travel_packing_advice() {
        let context = TravelContext {
            destinations: vec!["Tokyo".into(), "Oslo".into()],
            duration_days: 3,
            travel_type: Default::default(),
        };
        let text = format_travel(&context, &[ok("Tokyo", 80.0, "Sunny"), failed("Oslo")]);
        assert!(text.contains("Pack sun protection"));
        assert!(text.contains("3-day trip"));
        assert!(text.contains("Oslo: could not get weather data - timed out"));
    }
}
