//! fitgraph server - main entry point

mod app;

use anyhow::Result;
use clap::Parser;
use fitgraph_common::LoggingConfig;
use fitgraph_config::ConfigLoader;
use std::sync::Arc;
use tracing::{error, info};

use crate::app::{build_router, AppState};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level override (takes precedence over the config file)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    // Initialize logging
    let logging = LoggingConfig {
        level: args
            .log_level
            .unwrap_or_else(|| config.logging.level.clone()),
        pretty_format: config.logging.pretty,
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    };
    fitgraph_common::init_logging(logging)?;

    info!("Starting fitgraph server");
    info!("Configuration loaded successfully");

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(Arc::new(config))?;
    info!(metrics = state.registry.len(), "Metric registry initialized");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fitgraph server has shut down");
    Ok(())
}

/// Resolve when a shutdown signal arrives
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }
    info!("Received shutdown signal, starting graceful shutdown");
}
