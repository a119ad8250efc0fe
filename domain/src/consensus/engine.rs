//! Reliability-weighted consensus over independent source readings

use super::reliability::ReliabilityTable;
use crate::core::error::DomainError;
use crate::weather::{Observation, SourceReading, Temperature};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw spread above which sources are said to disagree
pub const DISCREPANCY_THRESHOLD_F: f64 = 10.0;
const MIN_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 1.0;

/// Blended estimate for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub location: String,
    pub temperature: Temperature,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    pub condition: String,
    /// Agreement score in [0.5, 1.0]
    pub confidence: f64,
    pub source_count: usize,
    /// Ids of the sources that contributed, in reading order
    pub sources: Vec<String>,
    /// `max - min` of the raw (unweighted) temperatures, °F
    pub temperature_spread: f64,
    pub computed_at: DateTime<Utc>,
}

impl ConsensusResult {
    pub fn has_discrepancy(&self) -> bool {
        self.temperature_spread > DISCREPANCY_THRESHOLD_F
    }
}

/// Merge readings into a [`ConsensusResult`].
///
/// Failed readings are ignored. Returns [`DomainError::NoDataAvailable`]
/// when nothing succeeded.
pub fn compute(
    location: &str,
    readings: &[SourceReading],
    table: &ReliabilityTable,
) -> Result<ConsensusResult, DomainError> {
    let observed: Vec<&Observation> = readings.iter().filter_map(|r| r.observation()).collect();
    if observed.is_empty() {
        return Err(DomainError::NoDataAvailable {
            location: location.to_string(),
        });
    }

    let mut temperatures: Vec<f64> = Vec::new();
    let mut humidities: Vec<f64> = Vec::new();
    for obs in &observed {
        let copies = table.copies(&obs.source);
        temperatures.extend(std::iter::repeat_n(obs.temperature.as_fahrenheit(), copies));
        if let Some(h) = obs.humidity {
            humidities.extend(std::iter::repeat_n(h, copies));
        }
    }

    let raw: Vec<f64> = observed
        .iter()
        .map(|o| o.temperature.as_fahrenheit())
        .collect();
    let spread = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - raw.iter().copied().fold(f64::INFINITY, f64::min);

    let confidence =
        (1.0 - sample_variance(&temperatures) / 100.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    Ok(ConsensusResult {
        location: location.to_string(),
        temperature: Temperature::fahrenheit(mean(&temperatures)),
        humidity: (!humidities.is_empty()).then(|| mean(&humidities)),
        condition: majority_condition(&observed),
        confidence,
        source_count: observed.len(),
        sources: observed.iter().map(|o| o.source.clone()).collect(),
        temperature_spread: spread,
        computed_at: Utc::now(),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n - 1) variance; zero for fewer than two values
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Most common raw condition text; ties go to the earliest reading
fn majority_condition(observed: &[&Observation]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for obs in observed {
        match counts.iter_mut().find(|(c, _)| *c == obs.condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((&obs.condition, 1)),
        }
    }
    // max_by_key keeps the last maximum, so scan in reverse
    counts
        .iter()
        .rev()
        .max_by_key(|(_, n)| *n)
        .map(|(c, _)| c.to_string())
        .unwrap_or_default()
}
