//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use weather_application::ExtractionMode;
use weather_domain::AlertType;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for weather-agent
#[derive(Parser, Debug)]
#[command(name = "weather-agent")]
#[command(author, version, about = "Weather assistant - multi-source forecasts, alerts and travel weather")]
#[command(long_about = r#"
weather-agent answers natural-language weather questions.

A query is routed to one of four workflows:
1. Travel weather: "Plan a trip to Tokyo next week"
2. Alerts: "Set up alerts for Miami" / "Any alerts for Texas?"
3. Multi-source intelligence: "Most accurate weather for Chicago"
4. Plain weather: "Compare weather in London and Paris"

Configuration files are loaded from (in priority order):
1. WEATHER_AGENT_SECTION__KEY environment variables
2. --config <path>       Explicit config file
3. ./weather-agent.toml  Project-level config
4. ~/.config/weather-agent/config.toml   Global config

Example:
  weather-agent "What's the weather in London?"
  weather-agent --consensus "San Francisco" -o json
  weather-agent --subscribe Miami --subscribe Boston --monitor
  weather-agent --chat
"#)]
pub struct Cli {
    /// The weather question (not required in chat, consensus or alert modes)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Blend every configured source into one estimate for LOCATION
    #[arg(long, value_name = "LOCATION", conflicts_with = "chat")]
    pub consensus: Option<String>,

    /// Subscribe to alerts for a location (can be specified multiple times)
    #[arg(long, value_name = "LOCATION")]
    pub subscribe: Vec<String>,

    /// Alert types for --subscribe (severe_weather, temperature_extreme, travel_disruption)
    #[arg(long = "alert-type", value_name = "TYPE")]
    pub alert_types: Vec<AlertType>,

    /// Keep checking subscriptions until Ctrl-C
    #[arg(long)]
    pub monitor: bool,

    /// Minutes between monitoring passes (overrides config)
    #[arg(long, value_name = "MINUTES", requires = "monitor")]
    pub interval: Option<u64>,

    /// Check subscriptions once and print triggered alerts
    #[arg(long)]
    pub check_alerts: bool,

    /// Location extraction mode (keyword, completion, hybrid)
    #[arg(long, value_name = "MODE")]
    pub extraction: Option<ExtractionMode>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether alert subscription or monitoring was requested
    pub fn wants_alerts(&self) -> bool {
        !self.subscribe.is_empty() || self.monitor || self.check_alerts
    }
}
