use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};

mod api;
mod config;
mod database;
mod difficulty;
mod generator;
mod global;
mod listing;
mod logging;
mod metrics;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::AppConfig::parse()?;

    logging::init(&config.logging.level, config.logging.json)?;

    tracing::debug!("config: {:#?}", config);

    let global = Arc::new(match global::Global::new(config).await {
        Ok(global) => global,
        Err(err) => {
            tracing::error!("error setting up global: {err}");
            std::process::exit(1);
        }
    });

    tracing::info!(
        stripe = global.config().stripe.is_configured(),
        grants_gov = global.config().grants_gov_api_key.is_some(),
        "integrations"
    );

    let api_future = tokio::spawn(api::run(global.clone()));

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    select! {
        r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
        _ = interrupt.recv() => tracing::info!("received interrupt, shutting down"),
        _ = terminate.recv() => tracing::info!("received terminate, shutting down"),
    }

    Ok(())
}
