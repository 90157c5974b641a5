//! Serves house price predictions over HTTP.

use anyhow::Context;
use clap::Parser;
use housing_price::config::AppConfig;
use housing_price::service::{self, ModelStore};
use housing_price::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "housing-serve", version, about = "Housing price prediction API")]
struct Args {
    /// Configuration file (TOML or YAML).
    #[arg(short, long, env = "HOUSING_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000.
    #[arg(short, long)]
    bind: Option<String>,

    /// Model artifact (.bin or .zst).
    #[arg(short, long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.service.bind_addr = bind;
    }
    if let Some(model) = args.model {
        config.service.model_path = model;
    }

    telemetry::init(&config.logging);

    let store = Arc::new(ModelStore::new(config.service.model_path.clone()));
    if !store.load() {
        warn!("Starting without a model; requests will retry loading it");
    }

    let listener = TcpListener::bind(&config.service.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.service.bind_addr))?;
    info!(addr = %config.service.bind_addr, "Prediction service listening");

    axum::serve(listener, service::router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Prediction service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
