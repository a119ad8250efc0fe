//! Travel request parsing
//!
//! Works on the raw (case-preserving) query text and is independent of the
//! gazetteer: any capitalised word run that isn't a stop word is taken as a
//! destination.

use crate::core::query::Query;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CAPITALISED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b").expect("valid destination pattern")
});

static DAY_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*days?").expect("valid day-count pattern"));

const STOP_WORDS: &[&str] = &[
    "Plan", "Planning", "Travel", "Traveling", "Weather", "For", "This", "Next", "Weekend", "Week",
    "Days", "Day", "Trip", "Visit", "Visiting", "Vacation", "Itinerary", "What", "How", "Will",
    "Is", "The", "My", "Our", "Going", "Heading", "Flying", "To", "From", "In", "At", "Business",
    "Conference", "Meeting", "Can", "Could", "Should", "Would", "Please", "Help", "Tell", "Me",
    "We", "Let", "Do", "Are", "Any",
];

/// Default trip length when the query doesn't say
pub const DEFAULT_DURATION_DAYS: u32 = 7;
const WEEKEND_DAYS: u32 = 3;

/// Purpose of the trip; only used to flavour the recommendation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    #[default]
    Tourism,
    Business,
}

impl TravelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Tourism => "tourism",
            TravelType::Business => "business",
        }
    }
}

/// What a travel query asks about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelContext {
    /// Destinations in order of mention, de-duplicated
    pub destinations: Vec<String>,
    pub duration_days: u32,
    pub travel_type: TravelType,
}

impl TravelContext {
    pub fn extract(query: &Query) -> Self {
        Self {
            destinations: extract_destinations(query.text()),
            duration_days: parse_duration(query.normalized()),
            travel_type: if query.mentions_any(&["business", "conference", "meeting"]) {
                TravelType::Business
            } else {
                TravelType::Tourism
            },
        }
    }
}

fn extract_destinations(text: &str) -> Vec<String> {
    let mut destinations: Vec<String> = Vec::new();
    for run in CAPITALISED_RUN.find_iter(text) {
        // Drop leading stop words so "Trip Paris" still yields "Paris".
        let words: Vec<&str> = run
            .as_str()
            .split_whitespace()
            .skip_while(|w| STOP_WORDS.contains(w))
            .collect();
        if words.is_empty() || words.iter().all(|w| STOP_WORDS.contains(w)) {
            continue;
        }
        let name = words.join(" ");
        if !destinations.contains(&name) {
            destinations.push(name);
        }
    }
    destinations
}

/// Trip length in days: 3 for a weekend, 7 for a week, else the number
/// before "day(s)", else [`DEFAULT_DURATION_DAYS`].
pub fn parse_duration(normalized: &str) -> u32 {
    if normalized.contains("weekend") {
        return WEEKEND_DAYS;
    }
    if normalized.contains("week") {
        return 7;
    }
    DAY_COUNT
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_DURATION_DAYS)
}
