// Simple Moving Average (SMA) indicator implementation
use super::{check_period, closes, IndicatorCalculator};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::PriceBar;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("SMA period must be greater than 0".to_string()));
        }
        check_period("SMA", period)?;
        Ok(Self {
            name: format!("SMA({})", period),
            period,
        })
    }
}

/// Trailing arithmetic mean over `period` values, `None` for the first `period - 1` entries.
pub fn sma_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];

    // Calculate sum for the first window
    let mut sum: f64 = values.iter().take(period).sum();
    results.push(Some(sum / period as f64));

    // Slide the window
    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(Some(sum / period as f64));
    }
    results
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>> {
        sma_values(&closes(data), self.period)
    }
}
