//! REPL (Read-Eval-Print Loop) for interactive queries

use crate::ProgressReporter;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use weather_application::{AlertMonitorUseCase, CoordinationRouter, NoProgress};
use weather_domain::Query;
use weather_infrastructure::{ServerEntry, ServerStatus, SourceDirectory};

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Servers,
    Server(String),
    Status,
    Quit,
    Ask(String),
    Empty,
}

impl ReplCommand {
    /// Commands work with or without a leading `/`
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let bare = line.strip_prefix('/').unwrap_or(line);
        let lower = bare.to_lowercase();
        match lower.as_str() {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "servers" => ReplCommand::Servers,
            "status" => ReplCommand::Status,
            _ => match lower.strip_prefix("server ") {
                Some(_) => ReplCommand::Server(bare["server ".len()..].trim().to_string()),
                None => ReplCommand::Ask(line.to_string()),
            },
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    router: Arc<CoordinationRouter>,
    alerts: Arc<AlertMonitorUseCase>,
    directory: Arc<SourceDirectory>,
    formatter: Box<dyn OutputFormatter>,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(
        router: Arc<CoordinationRouter>,
        alerts: Arc<AlertMonitorUseCase>,
        directory: Arc<SourceDirectory>,
        formatter: Box<dyn OutputFormatter>,
    ) -> Self {
        Self {
            router,
            alerts,
            directory,
            formatter,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("weather-agent").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("weather> ") {
                Ok(line) => match ReplCommand::parse(&line) {
                    ReplCommand::Empty => {
                        println!("Please enter a query or command");
                    }
                    ReplCommand::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    ReplCommand::Help => Self::print_help(),
                    ReplCommand::Servers => self.list_servers().await,
                    ReplCommand::Server(name) => self.server_details(&name).await,
                    ReplCommand::Status => self.show_status().await,
                    ReplCommand::Ask(text) => {
                        let _ = rl.add_history_entry(text.as_str());
                        self.process_query(&text).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Weather Agent - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Type 'help' for commands, 'quit' to exit");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  help          - Show this help");
        println!("  servers       - Health-check and list registered servers");
        println!("  server <name> - Show details for one server");
        println!("  status        - Show system status");
        println!("  quit/exit/q   - Exit chat");
        println!();
        println!("Or ask a weather question:");
        println!("  What's the weather in London?");
        println!("  Compare weather in New York and Paris");
        println!("  Any alerts in California?");
        println!("  Plan a trip to Tokyo next week");
        println!("  Most accurate weather for Chicago");
        println!();
    }

    fn status_label(status: ServerStatus) -> colored::ColoredString {
        match status {
            ServerStatus::Online => status.as_str().green(),
            ServerStatus::Offline => status.as_str().red(),
            ServerStatus::Error => status.as_str().yellow(),
            ServerStatus::Unknown => status.as_str().dimmed(),
        }
    }

    fn print_entry(entry: &ServerEntry) {
        println!("  {} ({})", entry.name.bold(), entry.base_url);
        println!("    Tools:  {}", entry.tools.join(", "));
        println!("    Tags:   {}", entry.tags.join(", "));
        println!("    Status: {}", Self::status_label(entry.status));
    }

    async fn list_servers(&self) {
        self.directory.health_check_all().await;
        let servers = self.directory.list(None).await;
        println!();
        println!("Registered servers: {}", servers.len());
        for entry in &servers {
            Self::print_entry(entry);
        }
        println!();
    }

    async fn server_details(&self, name: &str) {
        println!();
        match self.directory.get(name).await {
            Some(entry) => {
                Self::print_entry(&entry);
                println!("    About:  {}", entry.description);
                match entry.last_check {
                    Some(at) => println!("    Checked: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
                    None => println!("    Checked: never"),
                }
            }
            None => println!("Server '{}' not found", name),
        }
        println!();
    }

    async fn show_status(&self) {
        let summary = self.directory.summary().await;
        let subscriptions = self.alerts.subscriptions().await;
        let active = subscriptions.iter().filter(|s| s.active).count();
        let triggered = self.alerts.history().await.len();

        println!();
        println!("{}", "System Status".cyan().bold());
        println!(
            "  Servers:       {} total ({} online, {} offline, {} error, {} unknown)",
            summary.total, summary.online, summary.offline, summary.error, summary.unknown
        );
        println!(
            "  Subscriptions: {} active of {}",
            active,
            subscriptions.len()
        );
        println!("  Alerts raised: {}", triggered);
        println!(
            "  Default alert location: {}",
            self.alerts.config().default_location
        );
        println!();
        println!("Capabilities: weather queries, forecasts, alerts, multi-location comparison,");
        println!("              travel weather, multi-source consensus");
        println!();
    }

    async fn process_query(&self, text: &str) {
        println!();
        let query = Query::new(text);

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.router.route_with_progress(&query, &progress).await
        } else {
            self.router.route_with_progress(&query, &NoProgress).await
        };

        println!("{}", self.formatter.format_routed(&result));
    }
}
