//! Gather plans and gathered data
//!
//! [`GatherPlan::for_category`] is the single place where a task category is
//! mapped to upstream calls. The match is exhaustive, so adding a category
//! without deciding how it gathers data fails to compile.

use crate::core::error::SourceError;
use crate::core::query::Query;
use crate::intent::TaskCategory;
use crate::location::{Coordinates, Place, RegionCode, TravelContext};
use crate::weather::{AlertRecord, ForecastPeriod, Observation};
use serde::{Deserialize, Serialize};

/// Upstream calls needed for one query
#[derive(Debug, Clone, PartialEq)]
pub enum GatherPlan {
    /// One current-conditions call per place, run concurrently
    CurrentConditions(Vec<Place>),
    /// One forecast call for the first place
    Forecast { place: Place, coordinates: Coordinates },
    /// One alerts call for the first place that has a region code
    Alerts { place: Place, region: RegionCode },
    /// Current conditions for each parsed travel destination
    Travel(TravelContext),
    /// Nothing to fetch; the reason is recorded as the gathered result
    Skip(GatheredData),
}

impl GatherPlan {
    pub fn for_category(category: TaskCategory, places: &[Place], query: &Query) -> Self {
        match category {
            TaskCategory::WeatherQuery
            | TaskCategory::MultiLocation
            | TaskCategory::ConsensusIntelligence => {
                GatherPlan::CurrentConditions(places.to_vec())
            }
            TaskCategory::ForecastAnalysis => match places.first() {
                Some(place) => match place.coordinates {
                    Some(coordinates) => GatherPlan::Forecast {
                        place: place.clone(),
                        coordinates,
                    },
                    None => GatherPlan::Skip(GatheredData::unavailable(
                        "Could not get coordinates for forecast",
                    )),
                },
                None => GatherPlan::Skip(GatheredData::unavailable(
                    "Could not get coordinates for forecast",
                )),
            },
            TaskCategory::AlertMonitoring => places
                .iter()
                .find_map(|p| {
                    p.region.clone().map(|region| GatherPlan::Alerts {
                        place: p.clone(),
                        region,
                    })
                })
                .unwrap_or_else(|| {
                    GatherPlan::Skip(GatheredData::unavailable(
                        "No alert region found for locations",
                    ))
                }),
            TaskCategory::TravelPlanning => GatherPlan::Travel(TravelContext::extract(query)),
            TaskCategory::AlertSetup | TaskCategory::GeneralInquiry => {
                GatherPlan::Skip(GatheredData::Nothing)
            }
        }
    }
}

/// Current conditions for one location, or why there are none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeather {
    pub location: String,
    pub result: Result<Observation, SourceError>,
}

impl LocationWeather {
    pub fn new(location: impl Into<String>, result: Result<Observation, SourceError>) -> Self {
        Self {
            location: location.into(),
            result,
        }
    }
}

/// Everything one gather step produced, applied in a single transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatheredData {
    Nothing,
    Current {
        readings: Vec<LocationWeather>,
    },
    Forecast {
        location: String,
        result: Result<Vec<ForecastPeriod>, SourceError>,
    },
    Alerts {
        location: String,
        region: RegionCode,
        result: Result<Vec<AlertRecord>, SourceError>,
    },
    Travel {
        context: TravelContext,
        readings: Vec<LocationWeather>,
    },
    /// Gathering could not start; carries the placeholder text
    Unavailable {
        reason: String,
    },
}

impl GatheredData {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        GatheredData::Unavailable {
            reason: reason.into(),
        }
    }

    /// Execution-log line recorded when this data is applied
    pub fn log_line(&self) -> String {
        match self {
            GatheredData::Nothing => "No data gathered".to_string(),
            GatheredData::Current { readings } => {
                format!("Gathered weather data for {} locations", readings.len())
            }
            GatheredData::Forecast { result: Ok(_), .. } => "Gathered forecast data".to_string(),
            GatheredData::Forecast {
                result: Err(e), ..
            } => format!("Forecast request failed: {e}"),
            GatheredData::Alerts { location, .. } => format!("Gathered alert data for {location}"),
            GatheredData::Travel { readings, .. } => {
                format!("Gathered travel weather for {} destinations", readings.len())
            }
            GatheredData::Unavailable { reason } => reason.clone(),
        }
    }
}
