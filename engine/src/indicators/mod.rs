// Technical indicators module
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use frame::{FrameRow, IndicatorFrame};
pub use macd::{Macd, MacdComponent, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;

use serde_json::Value;
use shared::models::PriceBar;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// Bars needed before any value is produced.
    fn required_bars(&self) -> usize;
    /// One entry per input bar; `None` during warm-up, and everywhere when
    /// `data` is shorter than `required_bars()`.
    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>>;
}

/// Largest period any calculator accepts.
pub const MAX_PERIOD: usize = 100_000;

pub(crate) fn check_period(indicator: &str, period: usize) -> crate::error::Result<()> {
    if period > MAX_PERIOD {
        return Err(crate::error::EngineError::IndicatorError(format!(
            "{} period ({}) must not exceed {}",
            indicator, period, MAX_PERIOD
        )));
    }
    Ok(())
}

pub(crate) fn closes(data: &[PriceBar]) -> Vec<f64> {
    data.iter().map(|b| b.close).collect()
}
