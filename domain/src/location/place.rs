//! Place value objects: resolved names, coordinates and region codes

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidInput(format!(
                "latitude {latitude} must be between -90 and 90 degrees"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidInput(format!(
                "longitude {longitude} must be between -180 and 180 degrees"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Two-letter US state code used for alert lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let upper = code.trim().to_ascii_uppercase();
        if upper.len() != 2 || !upper.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidInput(format!(
                "region code '{code}' must be a 2-letter code"
            )));
        }
        if !US_STATE_CODES.contains(&upper.as_str()) {
            return Err(DomainError::InvalidInput(format!(
                "'{upper}' is not a known US state code"
            )));
        }
        Ok(Self(upper))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RegionCode::new(&value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical place name with whatever lookups the gazetteer knows for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Canonical, title-cased name (e.g. "New York")
    pub name: String,
    /// Coordinates for forecast lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Region code for alert lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionCode>,
}

impl Place {
    /// A place with no lookups attached
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
            region: None,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_region(mut self, region: RegionCode) -> Self {
        self.region = Some(region);
        self
    }
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(51.5074, -0.1278).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_region_code_normalizes_case() {
        let code = RegionCode::new("ca").unwrap();
        assert_eq!(code.as_str(), "CA");
    }

    #[test]
    fn test_region_code_rejects_malformed() {
        assert!(RegionCode::new("CAL").is_err());
        assert!(RegionCode::new("C1").is_err());
        assert!(RegionCode::new("ZZ").is_err());
        assert!(RegionCode::new("").is_err());
    }

    #[test]
    fn test_region_code_serde_validates() {
        let ok: RegionCode = serde_json::from_str("\"tx\"").unwrap();
        assert_eq!(ok.as_str(), "TX");
        assert!(serde_json::from_str::<RegionCode>("\"XX\"").is_err());
    }
}
