// Indicator frame: a price series with its derived indicator columns
use super::{IndicatorCalculator, Macd, Rsi, Sma};
use crate::config::IndicatorSettings;
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use shared::models::{PriceBar, PriceSeries};

/// Every column has one entry per bar. An indicator whose warm-up the series
/// does not cover is `None` throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub ma_short: Vec<Option<f64>>,
    pub ma_mid: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
    pub settings: IndicatorSettings,
}

/// One bar of an `IndicatorFrame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRow {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub ma_short: Option<f64>,
    pub ma_mid: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

impl IndicatorFrame {
    /// Validates `series` and derives all indicator columns. Pure: the same
    /// input always yields the same frame.
    pub fn compute(series: &PriceSeries, settings: &IndicatorSettings) -> Result<Self> {
        settings.validate()?;
        validate_series(series)?;

        let bars = &series.bars;
        let closes = super::closes(bars);
        let macd = Macd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal)?;
        let (macd_line, signal, histogram) = match macd.series(&closes) {
            Some(s) => (s.macd, s.signal, s.histogram),
            None => (vec![None; bars.len()], vec![None; bars.len()], vec![None; bars.len()]),
        };

        let frame = IndicatorFrame {
            symbol: series.symbol.clone(),
            bars: bars.clone(),
            ma_short: Sma::new(settings.short_window)?.calculate(bars),
            ma_mid: Sma::new(settings.mid_window)?.calculate(bars),
            ma_long: Sma::new(settings.long_window)?.calculate(bars),
            rsi: Rsi::new(settings.rsi_period)?
                .with_min_bars(settings.rsi_min_bars)
                .calculate(bars),
            macd: macd_line,
            signal,
            histogram,
            settings: settings.clone(),
        };
        tracing::trace!(symbol = %frame.symbol, bars = frame.len(), "Computed indicator frame");
        Ok(frame)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<FrameRow> {
        let bar = self.bars.get(index)?;
        let cell = |column: &[Option<f64>]| column.get(index).copied().flatten();
        Some(FrameRow {
            index,
            timestamp: bar.timestamp,
            close: bar.close,
            ma_short: cell(&self.ma_short),
            ma_mid: cell(&self.ma_mid),
            ma_long: cell(&self.ma_long),
            rsi: cell(&self.rsi),
            macd: cell(&self.macd),
            signal: cell(&self.signal),
            histogram: cell(&self.histogram),
        })
    }

    pub fn latest(&self) -> Option<FrameRow> {
        self.row(self.len().checked_sub(1)?)
    }

    pub fn previous(&self) -> Option<FrameRow> {
        self.row(self.len().checked_sub(2)?)
    }
}

/// Rejects series a frame must not be built from: empty symbol, dates not
/// strictly ascending, non-finite or non-positive prices.
pub fn validate_series(series: &PriceSeries) -> Result<()> {
    if series.symbol.trim().is_empty() {
        return Err(EngineError::InvalidInput("series has an empty symbol".to_string()));
    }
    for (i, bar) in series.bars.iter().enumerate() {
        let prices = [("open", bar.open), ("high", bar.high), ("low", bar.low), ("close", bar.close)];
        if let Some((field, value)) = prices.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(EngineError::InvalidInput(format!(
                "{}: bar {} has invalid {} price ({})",
                series.symbol, i, field, value
            )));
        }
        if i > 0 && bar.timestamp <= series.bars[i - 1].timestamp {
            return Err(EngineError::InvalidInput(format!(
                "{}: bar {} ({}) is not after bar {} ({})",
                series.symbol,
                i,
                bar.timestamp,
                i - 1,
                series.bars[i - 1].timestamp
            )));
        }
    }
    Ok(())
}
