// Exponential Moving Average (EMA) indicator implementation
use super::{check_period, closes, IndicatorCalculator};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::PriceBar;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("EMA period must be greater than 0".to_string()));
        }
        check_period("EMA", period)?;
        Ok(Self {
            name: format!("EMA({})", period),
            period,
        })
    }
}

/// EMA with multiplier `2 / (period + 1)`, seeded with the first value (no SMA seed).
pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut results = Vec::with_capacity(values.len());
    let mut previous_ema = first;
    results.push(previous_ema);

    for &value in values.iter().skip(1) {
        let ema = value * multiplier + previous_ema * (1.0 - multiplier);
        results.push(ema);
        previous_ema = ema;
    }
    results
}

impl IndicatorCalculator for Ema {
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
        if data.len() < self.period {
            return vec![None; data.len()];
        }
        // Values before `period` bars are still dominated by the seed.
        ema_values(&closes(data), self.period)
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i + 1 >= self.period).then_some(v))
            .collect()
    }
}
