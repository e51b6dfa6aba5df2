// Handler for a full screening pass over the configured watchlist
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::EngineSettings;
use crate::data::SeriesStore;
use crate::error::{EngineError, Result};
use crate::screener::Screener;
use shared::models::{InstrumentReport, ScreeningReport};

pub async fn handle_screen_watchlist(
    settings: Arc<EngineSettings>,
    store: Arc<RwLock<SeriesStore>>,
) -> ScreeningReport {
    let screener = Arc::new(Screener::new(settings.indicators.clone(), settings.screener.clone()));

    // Snapshot under the read lock, compute without it
    let snapshots: Vec<_> = {
        let store = store.read().await;
        screener
            .settings()
            .watchlist
            .iter()
            .map(|symbol| (symbol.clone(), store.get_series(symbol)))
            .collect()
    };

    let mut outcomes: Vec<(String, Option<Result<InstrumentReport>>)> = Vec::with_capacity(snapshots.len());
    let mut handles = Vec::new();
    for (index, (symbol, series)) in snapshots.into_iter().enumerate() {
        if let Some(series) = series {
            let screener = Arc::clone(&screener);
            handles.push((index, tokio::task::spawn_blocking(move || screener.evaluate(&series))));
        }
        outcomes.push((symbol, None));
    }
    tracing::debug!(tasks = handles.len(), watchlist = outcomes.len(), "Spawned screening tasks");

    for (index, handle) in handles {
        let outcome = handle
            .await
            .unwrap_or_else(|e| Err(EngineError::ProcessingError(format!("screening task failed: {}", e))));
        outcomes[index].1 = Some(outcome);
    }

    screener.assemble(outcomes)
}
