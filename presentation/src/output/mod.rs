//! Output formatting for routed results, consensus reports and alerts

pub mod console;
pub mod formatter;
pub mod json;

use crate::cli::commands::OutputFormat;
use formatter::OutputFormatter;

/// Formatter for the selected `--output` format
pub fn formatter_for(format: OutputFormat, show_log: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(console::ConsoleFormatter::new().with_log(show_log)),
        OutputFormat::Json => Box::new(json::JsonFormatter),
    }
}
