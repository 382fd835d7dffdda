use vs_server::{Cli, ServerError, build_dispatcher, logger, tool_loop};

use std::error::Error;
use std::str::FromStr;

use clap::Parser;
use log::{error, info, warn};
use tokio::io::BufReader;
use vs_config::{Config, LogLevel};
use vs_stream::StopSignal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::config_dir()?,
    };
    let mut config = Config::load_from(&config_dir)?;
    if let Some(level) = cli.log_level.as_deref() {
        config.logging.level = LogLevel::from_str(level)?;
    }
    config.validate()?;

    // Construct log file path if configured
    let log_file_path = config.log_file_path(&config_dir);
    if let Some(parent) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting vs-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Config directory: {}", config_dir.display());
    config.log_summary();

    let dispatcher = build_dispatcher(&config, &config_dir)?;

    // Spawn signal handler for graceful shutdown
    let shutdown = StopSignal::new();
    let stop_guard = shutdown.guard();
    let mut idle_guard = shutdown.guard();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.trigger();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Ready for tool requests on stdin");
    let served = tool_loop::serve(
        &dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        stop_guard,
    )
    .await;

    // Detached stdin: keep broadcasting until Ctrl+C
    if served.is_ok() && dispatcher.orchestrator().is_active() {
        info!("Streaming continues without tool input, press Ctrl+C to stop");
        idle_guard.wait().await;
    }

    dispatcher.orchestrator().shutdown().await;

    match served {
        Ok(count) => {
            info!("Shutdown complete after {} tool requests", count);
            Ok(())
        }
        Err(e) => {
            warn!("Tool loop ended with error: {}", e);
            Err(ServerError::from(e).into())
        }
    }
}
