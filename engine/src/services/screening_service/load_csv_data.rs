// Handler for loading a daily CSV export into the series store
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::{DailyCsvParser, SeriesStore};
use crate::error::{EngineError, Result};

/// Parses the file off the async runtime and merges its bars into the store.
/// Returns the number of bars stored for the symbol afterwards.
pub async fn handle_load_csv_data(
    symbol: String,
    path: PathBuf,
    delimiter: u8,
    store: Arc<RwLock<SeriesStore>>,
) -> Result<usize> {
    let parse_symbol = symbol.clone();
    let series = tokio::task::spawn_blocking(move || {
        DailyCsvParser::load_series_from_csv(&path, &parse_symbol, delimiter)
    })
    .await
    .map_err(|e| EngineError::ProcessingError(format!("CSV loading task failed: {}", e)))??;

    let parsed = series.len();
    let stored = store.write().await.add_bars(&symbol, series.bars);
    tracing::info!(symbol = %symbol, parsed, stored, "Loaded daily bars");
    Ok(stored)
}
