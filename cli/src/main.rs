//! CLI entrypoint for casematch
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use casematch_application::{ExchangeLogger, RunTwoStageInput, RunTwoStageUseCase};
use casematch_domain::Query;
use casematch_infrastructure::{ConfigLoader, FileConfig, HttpChatBackend, JsonlExchangeLogger};
use casematch_presentation::{Cli, ConsoleFormatter, StreamingReporter};
use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Conventional exit status for a run interrupted by SIGINT
const EXIT_ABORTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting casematch");

    let config = load_config(&cli)?;
    config.validate().context("Invalid configuration")?;
    let two_stage = config.to_two_stage_config()?;

    let query = Query::try_new(read_query(cli.query.clone())?)?;

    // === Dependency Injection ===
    let backend = match config.backend.connect_timeout() {
        Some(timeout) => HttpChatBackend::with_connect_timeout(&config.backend.base_url, timeout)?,
        None => HttpChatBackend::new(&config.backend.base_url)?,
    };

    let mut use_case = RunTwoStageUseCase::new(Arc::new(backend)).with_config(two_stage);

    let transcript = cli.transcript.clone().or(config.logging.transcript.clone());
    if let Some(path) = transcript {
        let logger = JsonlExchangeLogger::open(&path)
            .with_context(|| format!("Could not open transcript {}", path.display()))?;
        info!("Writing transcript to {}", logger.path().display());
        use_case = use_case.with_exchange_logger(Arc::new(logger) as Arc<dyn ExchangeLogger>);
    }

    // Ctrl-C cancels both stages through the shared token
    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting run");
            watcher.cancel();
        }
    });

    let input = RunTwoStageInput::new(query).with_cancellation(cancel);
    let reporter = StreamingReporter::new(!cli.quiet);

    match use_case.execute(input, &reporter).await {
        Ok(outcome) => {
            info!(
                "Run complete (detailed stage ran: {})",
                outcome.detailed.is_some()
            );
            Ok(())
        }
        Err(e) if e.is_aborted() => {
            drop(reporter);
            eprintln!("\n{}", ConsoleFormatter::aborted());
            std::process::exit(EXIT_ABORTED);
        }
        Err(e) => Err(e.into()),
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

fn read_query(arg: Option<String>) -> Result<String> {
    if let Some(query) = arg {
        return Ok(query);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Could not read query from stdin")?;
    if buffer.trim().is_empty() {
        bail!("A query is required, either as an argument or on stdin.");
    }
    Ok(buffer)
}
