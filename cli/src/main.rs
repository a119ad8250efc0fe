//! CLI entrypoint for weather-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use weather_application::{
    AlertMonitorUseCase, CoordinationRouter, GetConsensusUseCase, NoProgress,
    ProcessQueryUseCase, QueryProgressNotifier, SourceGateway,
};
use weather_domain::{Query, SubscriptionConfig};
use weather_infrastructure::{
    ConfigLoader, FileConfig, OllamaCompletion, Severity, SourceDirectory, ToolServerGateway,
    build_sources,
};
use weather_presentation::{ChatRepl, Cli, OutputFormatter, ProgressReporter, formatter_for};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.as_ref().map(PathBuf::from));
    let guard = init_logging(cli.verbose, log_file.as_deref())?;

    info!("Starting weather-agent");
    check_config(&config)?;

    // === Dependency Injection ===
    let settings = config.server.to_http_settings();
    let gateway: Arc<dyn SourceGateway> =
        Arc::new(ToolServerGateway::new(&config.server.base_url, settings.clone())?);

    let sources = build_sources(&config.sources, &settings, gateway.clone())?;
    let consensus = Arc::new(
        GetConsensusUseCase::new(sources).with_reliability(config.sources.to_reliability_table()),
    );

    let mut orchestrator = config.orchestrator.to_orchestrator_config();
    if let Some(mode) = cli.extraction {
        orchestrator.extraction = mode;
    }
    let mut process = ProcessQueryUseCase::new(gateway.clone()).with_config(orchestrator);
    if config.completion.enabled {
        let completion = OllamaCompletion::new(
            &config.completion.base_url,
            config.completion.model.clone(),
            Duration::from_secs(config.completion.timeout_secs),
        )?;
        info!("Text completion enabled ({})", completion.model());
        process = process.with_completion(Arc::new(completion));
    }
    let process = Arc::new(process);

    let mut alert_config = config.alerts.to_alert_config();
    if let Some(minutes) = cli.interval {
        alert_config.monitor_interval = Duration::from_secs(minutes.max(1) * 60);
    }
    let alerts = Arc::new(AlertMonitorUseCase::new(gateway, alert_config));

    let router = Arc::new(CoordinationRouter::new(
        process,
        consensus.clone(),
        alerts.clone(),
    ));

    let formatter = formatter_for(cli.output, cli.verbose > 0);

    // Chat mode
    if cli.chat {
        let directory = Arc::new(SourceDirectory::with_weather_server(&config.server.base_url).await?);
        let repl = ChatRepl::new(router, alerts, directory, formatter).with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(());
    }

    // Multi-source consensus for one location
    if let Some(location) = &cli.consensus {
        let outcome = if cli.quiet {
            consensus.execute(location).await
        } else {
            let progress = ProgressReporter::new();
            consensus.execute_with_progress(location, &progress).await
        };
        println!("{}", formatter.format_consensus(&outcome));
        if !outcome.success {
            drop(guard);
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.wants_alerts() {
        return run_alerts(&cli, &alerts, formatter.as_ref()).await;
    }

    // Single query mode - query is required
    let text = match cli.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => bail!("A query is required. Use --chat for interactive mode."),
    };

    let query = Query::new(text);
    let progress: Box<dyn QueryProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let result = router.route_with_progress(&query, progress.as_ref()).await;

    println!("{}", formatter.format_routed(&result));
    if !result.success {
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}

/// Subscribe, check once, or monitor until Ctrl-C
async fn run_alerts(
    cli: &Cli,
    alerts: &AlertMonitorUseCase,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    if !cli.subscribe.is_empty() {
        let mut request = SubscriptionConfig::for_locations(cli.subscribe.clone());
        if !cli.alert_types.is_empty() {
            request.alert_types = cli.alert_types.clone();
        }
        let id = alerts.setup_subscription(request).await;
        if let Some(subscription) = alerts.subscriptions().await.iter().find(|s| s.id == id) {
            println!("{}", formatter.format_subscription(subscription));
        }
    } else if alerts.subscriptions().await.is_empty() {
        // Nothing to watch yet: cover the default location
        let id = alerts.setup_subscription(SubscriptionConfig::default()).await;
        info!("No locations given; subscribed {} to the default location", id);
    }

    if cli.check_alerts {
        let triggered = alerts.check_all_subscriptions().await;
        println!("{}", formatter.format_alerts(&triggered));
    }

    if cli.monitor {
        let token = CancellationToken::new();
        let on_signal = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_signal.cancel();
            }
        });

        let interval = alerts.config().monitor_interval;
        eprintln!(
            "Monitoring every {} minute(s). Press Ctrl-C to stop.",
            interval.as_secs() / 60
        );
        alerts
            .run_monitor(interval, token, |triggered| {
                if !triggered.is_empty() {
                    println!("{}", formatter.format_alerts(triggered));
                }
            })
            .await;
    }

    Ok(())
}

/// Print configuration issues; any error-level issue aborts startup
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("Config error: {}", issue),
            Severity::Warning => warn!("{}", issue),
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("{} configuration error(s)", errors);
    }
    Ok(())
}

/// Console logging on stderr, plus an optional plain-text log file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
