//! Human-readable intelligence report for a consensus result

use super::engine::ConsensusResult;

const HOT_F: f64 = 80.0;
const COLD_F: f64 = 40.0;
const ADVISORY_CONFIDENCE: f64 = 0.7;

/// Qualitative reading of a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_score(confidence: f64) -> Self {
        if confidence > 0.8 {
            ConfidenceTier::High
        } else if confidence > 0.6 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High confidence - sources in good agreement",
            ConfidenceTier::Medium => "Medium confidence - some variation between sources",
            ConfidenceTier::Low => "Lower confidence - significant variation detected",
        }
    }
}

/// Multi-line report: sources, confidence, blended values, agreement notes
pub fn intelligence_report(result: &ConsensusResult) -> String {
    let mut lines = vec![
        format!("Weather Intelligence Analysis for {}", result.location),
        format!(
            "Data Sources: {} ({})",
            result.source_count,
            result.sources.join(", ")
        ),
        format!("Confidence: {:.0}%", result.confidence * 100.0),
        format!(
            "Consensus Temperature: {:.1}°F",
            result.temperature.as_fahrenheit()
        ),
    ];
    match result.humidity {
        Some(h) => lines.push(format!("Humidity: {h:.1}%")),
        None => lines.push("Humidity: not reported".to_string()),
    }
    lines.push(format!("Conditions: {}", result.condition));
    lines.push(ConfidenceTier::from_score(result.confidence).describe().to_string());
    if result.has_discrepancy() {
        lines.push(format!(
            "Temperature variation: {:.1}°F across sources",
            result.temperature_spread
        ));
    }

    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    lines.extend(recommendations(result).into_iter().map(|r| format!("  - {r}")));
    lines.join("\n")
}

/// Actionable advice derived from the blended values
pub fn recommendations(result: &ConsensusResult) -> Vec<String> {
    let mut recs = Vec::new();
    let temp = result.temperature.as_fahrenheit();
    if temp > HOT_F {
        recs.push("Hot weather expected - stay hydrated and seek shade".to_string());
    } else if temp < COLD_F {
        recs.push("Cold weather - dress warmly and check for ice".to_string());
    }

    if result.confidence < ADVISORY_CONFIDENCE {
        recs.push(
            "Weather prediction confidence is lower - check again closer to your plans"
                .to_string(),
        );
    } else {
        recs.push("High confidence forecast - good for planning outdoor activities".to_string());
    }

    let condition = result.condition.to_lowercase();
    if condition.contains("rain") {
        recs.push("Rain expected - carry an umbrella".to_string());
    } else if condition.contains("snow") {
        recs.push("Snow conditions - allow extra travel time".to_string());
    }

    if recs.is_empty() {
        recs.push("Standard weather precautions recommended".to_string());
    }
    recs
}
