// Engine main entry point: one screening pass over the configured watchlist
use anyhow::Context;
use screener_engine::config::EngineSettings;
use screener_engine::data::SeriesStore;
use screener_engine::report;
use screener_engine::services::ScreeningEngine;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting stock screener engine...");

    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::load_from_path(&path)
            .with_context(|| format!("Failed to load settings from '{}'", path))?,
        None => EngineSettings::load_default().context("Failed to load bundled settings")?,
    };
    info!(
        data_dir = %settings.data.data_dir.display(),
        watchlist = settings.screener.watchlist.len(),
        "Settings loaded"
    );

    let engine = ScreeningEngine::new(Arc::new(RwLock::new(SeriesStore::new())), settings);

    for symbol in engine.settings().screener.watchlist.clone() {
        let path = engine.settings().data.csv_path(&symbol);
        if !path.exists() {
            warn!(symbol = %symbol, path = %path.display(), "No CSV file for symbol");
            continue;
        }
        if let Err(e) = engine.load_csv_data(&symbol, &path).await {
            warn!(symbol = %symbol, error = %e, "Failed to load CSV data");
        }
    }

    let screening = engine.screen_watchlist().await;
    println!("{}", report::summary_text(&screening));
    println!("{}", report::to_json(&screening)?);

    Ok(())
}
