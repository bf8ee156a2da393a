//! Credit Scoring Server - HTTP front end for the credit classifier
//!
//! Loads the XGBoost model once at startup, then serves `/predict`, `/health`
//! and `/metrics`. A missing or invalid model aborts startup.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=model/xgboost_credit_scoring_final.json cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Path to the XGBoost JSON artifact
//! - `SERVER_BIND_ADDRESS` - Listen address (default: 0.0.0.0)
//! - `SERVER_PORT` - Listen port (default: 5000)
//! - `METRICS_ENABLED` - Expose `/metrics` (default: true)

use anyhow::{Context, Result};
use clap::Parser;
use credit_scoring::application::ml::XgboostPredictor;
use credit_scoring::application::scoring::ScoringService;
use credit_scoring::config::Config;
use credit_scoring::infrastructure::observability::Metrics;
use credit_scoring::interfaces::http;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the XGBoost JSON model (overrides MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Listen address (overrides SERVER_BIND_ADDRESS)
    #[arg(long)]
    bind: Option<String>,

    /// Listen port (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Credit Scoring Server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(model_path) = args.model_path {
        config.model_path = model_path;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    info!(
        "Configuration loaded: model={}, listen={}:{}, metrics={}",
        config.model_path.display(),
        config.bind_address,
        config.port,
        config.metrics_enabled
    );

    // The server cannot do anything useful without a model: fail fast
    let predictor = XgboostPredictor::load(&config.model_path)
        .context("Failed to load credit scoring model")?;

    let num_trees = predictor.num_trees();

    let mut service = ScoringService::new(Arc::new(predictor));
    if config.metrics_enabled {
        let metrics = Metrics::new()?;
        metrics.model_trees.set(num_trees as f64);
        service = service.with_metrics(metrics);
    }
    let app = http::router(service);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received. Exiting...");
}
