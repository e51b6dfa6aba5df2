// Async entry points of the engine: data loading, screening passes and
// indicator queries. Each operation lives in its own handler module.
use crate::config::EngineSettings;
use crate::data::SeriesStore;
use crate::error::Result;
use shared::models::{IndicatorSeries, ScreeningReport};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod calculate_indicator;
pub mod load_csv_data;
pub mod screen_watchlist;

pub struct ScreeningEngine {
    series_store: Arc<RwLock<SeriesStore>>,
    settings: Arc<EngineSettings>,
}

impl ScreeningEngine {
    pub fn new(series_store: Arc<RwLock<SeriesStore>>, settings: EngineSettings) -> Self {
        ScreeningEngine {
            series_store,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn series_store(&self) -> Arc<RwLock<SeriesStore>> {
        Arc::clone(&self.series_store)
    }

    /// Loads a daily CSV for `symbol` using the configured delimiter.
    pub async fn load_csv_data(&self, symbol: &str, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref().to_path_buf();
        tracing::info!(symbol = %symbol, path = %path.display(), "Loading CSV data");
        let delimiter = self.settings.data.delimiter()?;
        load_csv_data::handle_load_csv_data(symbol.to_string(), path, delimiter, self.series_store()).await
    }

    /// Screens every watchlist symbol against the series currently stored.
    pub async fn screen_watchlist(&self) -> ScreeningReport {
        tracing::info!(watchlist = self.settings.screener.watchlist.len(), "Starting screening pass");
        screen_watchlist::handle_screen_watchlist(Arc::clone(&self.settings), self.series_store()).await
    }

    pub async fn calculate_indicator(
        &self,
        symbol: &str,
        indicator_type: &str,
        parameters: &str,
    ) -> Result<IndicatorSeries> {
        tracing::info!(
            symbol = %symbol,
            indicator_type = %indicator_type,
            parameters = %parameters,
            "Received indicator query"
        );
        calculate_indicator::handle_calculate_indicator(
            symbol,
            indicator_type,
            parameters,
            &self.settings.indicators,
            self.series_store(),
        )
        .await
    }
}
