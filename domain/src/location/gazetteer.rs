//! Static gazetteer and keyword-based location extraction
//!
//! There is no geocoding: names are matched by case-insensitive substring
//! containment against fixed tables, and only a subset of names carry
//! coordinates (forecast lookups) or region codes (alert lookups).

use super::place::{Coordinates, Place, RegionCode};
use crate::core::query::Query;

const CITIES: &[&str] = &[
    "london",
    "paris",
    "new york",
    "tokyo",
    "sydney",
    "berlin",
    "rome",
    "madrid",
    "amsterdam",
    "barcelona",
    "vienna",
    "prague",
    "moscow",
    "beijing",
    "mumbai",
    "delhi",
    "bangkok",
    "singapore",
    "los angeles",
    "chicago",
    "houston",
    "phoenix",
    "philadelphia",
    "san francisco",
    "seattle",
    "boston",
    "atlanta",
    "miami",
];

const US_STATES: &[&str] = &[
    "california",
    "texas",
    "florida",
    "new york",
    "pennsylvania",
    "illinois",
    "ohio",
    "georgia",
    "north carolina",
    "michigan",
];

const COORDINATES: &[(&str, f64, f64)] = &[
    ("london", 51.5074, -0.1278),
    ("paris", 48.8566, 2.3522),
    ("new york", 40.7128, -74.0060),
    ("tokyo", 35.6762, 139.6503),
    ("sydney", -33.8688, 151.2093),
    ("berlin", 52.5200, 13.4050),
    ("los angeles", 34.0522, -118.2437),
    ("chicago", 41.8781, -87.6298),
    ("san francisco", 37.7749, -122.4194),
];

const REGION_CODES: &[(&str, &str)] = &[
    ("california", "CA"),
    ("texas", "TX"),
    ("florida", "FL"),
    ("new york", "NY"),
    ("pennsylvania", "PA"),
    ("illinois", "IL"),
    ("ohio", "OH"),
    ("georgia", "GA"),
    ("north carolina", "NC"),
    ("michigan", "MI"),
];

/// Lookup tables for recognised place names
#[derive(Debug, Clone)]
pub struct Gazetteer {
    names: Vec<&'static str>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Gazetteer {
    /// The built-in city and US-state tables
    pub fn builtin() -> Self {
        let names = CITIES
            .iter()
            .chain(US_STATES.iter())
            .copied()
            .collect();
        Self { names }
    }

    /// Extract recognised places from a query.
    ///
    /// Results are ordered by the position of each name's first occurrence
    /// in the text; a name mentioned several times (or listed in more than
    /// one table) appears once.
    pub fn extract_locations(&self, query: &Query) -> Vec<Place> {
        let text = query.normalized();

        let mut hits: Vec<(usize, usize, &'static str)> = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| text.find(name).map(|pos| (pos, idx, *name)))
            .collect();
        hits.sort_by_key(|(pos, idx, _)| (*pos, *idx));

        let mut seen: Vec<&'static str> = Vec::new();
        let mut places = Vec::new();
        for (_, _, name) in hits {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            places.push(self.resolve(name));
        }
        places
    }

    /// Resolve a single name (from any source) to a [`Place`].
    ///
    /// Unknown names keep their trimmed spelling and carry no lookups.
    pub fn resolve(&self, name: &str) -> Place {
        let key = name.trim().to_lowercase();
        let canonical = if self.is_known(&key) {
            title_case(&key)
        } else {
            name.trim().to_string()
        };

        let mut place = Place::named(canonical);
        if let Some(coords) = self.coordinates_for(&key) {
            place = place.with_coordinates(coords);
        }
        if let Some(region) = self.region_for(&key) {
            place = place.with_region(region);
        }
        place
    }

    pub fn is_known(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.names.iter().any(|n| *n == key)
    }

    /// Coordinates for a name, if mapped
    pub fn coordinates_for(&self, name: &str) -> Option<Coordinates> {
        let key = name.trim().to_lowercase();
        COORDINATES
            .iter()
            .find(|(n, _, _)| *n == key)
            .and_then(|(_, lat, lon)| Coordinates::new(*lat, *lon).ok())
    }

    /// Region code for a name, if mapped
    pub fn region_for(&self, name: &str) -> Option<RegionCode> {
        let key = name.trim().to_lowercase();
        REGION_CODES
            .iter()
            .find(|(n, _)| *n == key)
            .and_then(|(_, code)| RegionCode::new(code).ok())
    }
}

/// Parse a completion answer of the form `"London, Paris"` or `"none"`.
///
/// Returns trimmed, de-duplicated names in answer order.
pub fn parse_location_list(answer: &str) -> Vec<String> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let mut names: Vec<String> = Vec::new();
    for raw in answer.split(',') {
        let name = raw.trim().trim_matches(|c| c == '"' || c == '.');
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            continue;
        }
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }
    names
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(query: &str) -> Vec<String> {
        Gazetteer::builtin()
            .extract_locations(&Query::new(query))
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_extracts_in_mention_order() {
        assert_eq!(
            names("Compare weather in Paris and New York"),
            vec!["Paris", "New York"]
        );
        assert_eq!(
            names("Compare weather in New York and Paris"),
            vec!["New York", "Paris"]
        );
    }

    #[test]
    fn test_duplicates_collapse_to_first_position() {
        assert_eq!(
            names("london, tokyo and London again"),
            vec!["London", "Tokyo"]
        );
        // "new york" is both a city and a state
        assert_eq!(names("alerts for new york"), vec!["New York"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let gazetteer = Gazetteer::builtin();
        let query = Query::new("Weather in Berlin, Rome and berlin");
        let first = gazetteer.extract_locations(&query);
        let second = gazetteer.extract_locations(&query);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_locations() {
        assert!(names("What's the temperature?").is_empty());
    }

    #[test]
    fn test_lookups_attached() {
        let gazetteer = Gazetteer::builtin();
        let places = gazetteer.extract_locations(&Query::new("London or California"));
        assert!(places[0].coordinates.is_some());
        assert!(places[0].region.is_none());
        assert!(places[1].coordinates.is_none());
        assert_eq!(places[1].region.as_ref().unwrap().as_str(), "CA");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let place = Gazetteer::builtin().resolve("  Springfield ");
        assert_eq!(place.name, "Springfield");
        assert!(place.coordinates.is_none());
        assert!(place.region.is_none());
    }

    #[test]
    fn test_parse_location_list() {
        assert_eq!(parse_location_list("New York, Paris"), vec!["New York", "Paris"]);
        assert!(parse_location_list("NONE").is_empty());
        assert!(parse_location_list("  none \n").is_empty());
        assert_eq!(parse_location_list("Rome, rome, ,Oslo."), vec!["Rome", "Oslo"]);
    }
}
