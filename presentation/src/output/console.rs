//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use weather_application::{ConsensusOutcome, RoutedPayload, RoutedResult};
use weather_domain::{AlertSeverity, AlertSubscription, SourceReading, TriggeredAlert};

/// Formats results for console display
#[derive(Debug, Clone, Default)]
pub struct ConsoleFormatter {
    show_log: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the orchestration execution log to query results
    pub fn with_log(mut self, show: bool) -> Self {
        self.show_log = show;
        self
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn severity_label(severity: AlertSeverity) -> ColoredString {
        let label = severity.as_str().to_uppercase();
        match severity {
            AlertSeverity::Critical => label.red().bold(),
            AlertSeverity::High => label.red(),
            AlertSeverity::Medium => label.yellow(),
            AlertSeverity::Low => label.normal(),
        }
    }

    fn readings(readings: &[SourceReading]) -> String {
        let mut output = Self::section_header("Sources");
        for reading in readings {
            match reading {
                SourceReading::Observed(obs) => {
                    output.push_str(&format!(
                        "  {} {:<6} {}  {}\n",
                        "v".green(),
                        obs.source,
                        obs.temperature,
                        obs.condition
                    ));
                }
                SourceReading::Failed { source, error } => {
                    output.push_str(&format!(
                        "  {} {:<6} {}\n",
                        "x".red(),
                        source,
                        error.to_string().dimmed()
                    ));
                }
            }
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_routed(&self, result: &RoutedResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}  {} {}\n\n",
            "Workflow:".dimmed(),
            result.workflow,
            "Task:".dimmed(),
            result.task_type
        ));

        if result.success {
            output.push_str(&result.message);
            output.push('\n');
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Error:".red().bold(),
                result.error.as_deref().unwrap_or(&result.message)
            ));
        }

        match &result.payload {
            RoutedPayload::Query(outcome) if self.show_log => {
                output.push_str(&Self::section_header("Execution Log"));
                for (i, entry) in outcome.execution_log.iter().enumerate() {
                    output.push_str(&format!("  {}. {}\n", i + 1, entry));
                }
            }
            RoutedPayload::Consensus(outcome) if self.show_log => {
                output.push_str(&Self::readings(&outcome.readings));
            }
            _ => {}
        }

        output
    }

    fn format_consensus(&self, outcome: &ConsensusOutcome) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Weather Intelligence: {}", outcome.location)));
        output.push('\n');

        if outcome.success {
            output.push('\n');
            output.push_str(&outcome.report);
            output.push('\n');
        } else {
            output.push_str(&format!(
                "\n{} {}\n",
                "Error:".red().bold(),
                outcome.error.as_deref().unwrap_or("Unknown")
            ));
        }

        output.push_str(&Self::readings(&outcome.readings));
        output
    }

    fn format_alerts(&self, alerts: &[TriggeredAlert]) -> String {
        if alerts.is_empty() {
            return format!("{} No alerts triggered\n", "v".green());
        }

        let mut output = format!("{}\n", format!("{} alert(s) triggered", alerts.len()).bold());
        for alert in alerts {
            output.push_str(&format!(
                "\n[{}] {} {}\n",
                Self::severity_label(alert.severity),
                alert.location.bold(),
                alert.triggered_at.format("%H:%M:%S").to_string().dimmed()
            ));
            for condition in &alert.conditions {
                output.push_str(&format!("  * {}\n", condition));
            }
            output.push_str(&Self::indent(&alert.weather_summary, "    "));
            output.push('\n');
        }
        output
    }

    fn format_subscription(&self, subscription: &AlertSubscription) -> String {
        let types = subscription
            .alert_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} Subscription {} created\n  Locations: {}\n  Alert types: {}\n",
            "v".green(),
            subscription.id.bold(),
            subscription.locations.join(", "),
            types
        )
    }
}
