// Relative Strength Index (RSI) indicator implementation
//
// Gains and losses of the day-over-day close delta are smoothed with
// alpha = 1 / period (Wilder), both seeded at the first bar with a zero delta.
// RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS).
use super::{check_period, closes, IndicatorCalculator};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::PriceBar;

pub struct Rsi {
    name: String,
    period: usize,
    min_bars: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("RSI period must be greater than 0".to_string()));
        }
        check_period("RSI", period)?;
        Ok(Self {
            name: format!("RSI({})", period),
            period,
            min_bars: period + 1,
        })
    }

    /// Withholds the whole column until the series has at least `min_bars` bars.
    /// Never lower than `period + 1`.
    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars.max(self.period.saturating_add(1));
        self
    }
}

/// Full RSI column; `None` before index `period` or when `closes` has fewer than `min_bars` entries.
pub fn rsi_values(closes: &[f64], period: usize, min_bars: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.len() < min_bars.max(period.saturating_add(1)) {
        return vec![None; closes.len()];
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut results = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if i < period {
            results.push(None);
        } else {
            results.push(Some(rsi_from_averages(avg_gain, avg_loss)));
        }
    }
    results
}

/// No losses means maximal strength (100); no movement at all is neutral (50).
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "min_bars": self.min_bars })
    }

    fn required_bars(&self) -> usize {
        self.min_bars
    }

    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>> {
        rsi_values(&closes(data), self.period, self.min_bars)
    }
}
