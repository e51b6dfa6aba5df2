// Moving Average Convergence/Divergence (MACD) indicator implementation
//
// MACD      = EMA(fast) - EMA(slow) of close
// Signal    = EMA(signal) of MACD
// Histogram = MACD - Signal
//
// All EMAs are seeded with their first input. Nothing is reported until
// `slow + signal` bars are available.
use super::ema::ema_values;
use super::{check_period, closes, IndicatorCalculator};
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::PriceBar;

/// Which MACD column `IndicatorCalculator::calculate` yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(EngineError::IndicatorError("MACD periods must be greater than 0".to_string()));
        }
        for period in [fast, slow, signal] {
            check_period("MACD", period)?;
        }
        if fast >= slow {
            return Err(EngineError::IndicatorError(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                fast, slow
            )));
        }
        Ok(Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
            component: MacdComponent::Line,
        })
    }

    pub fn component(mut self, component: MacdComponent) -> Self {
        let label = match component {
            MacdComponent::Line => "MACD",
            MacdComponent::Signal => "MACD Signal",
            MacdComponent::Histogram => "MACD Histogram",
        };
        self.name = format!("{}({},{},{})", label, self.fast, self.slow, self.signal);
        self.component = component;
        self
    }

    /// All three columns, or `None` when `closes` is shorter than `slow + signal`.
    pub fn series(&self, closes: &[f64]) -> Option<MacdSeries> {
        let required = self.required_bars();
        if closes.len() < required {
            return None;
        }

        let fast_ema = ema_values(closes, self.fast);
        let slow_ema = ema_values(closes, self.slow);
        let macd_line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
        let signal_line = ema_values(&macd_line, self.signal);

        let warm = |i: usize| i + 1 >= required;
        let mut series = MacdSeries {
            macd: Vec::with_capacity(closes.len()),
            signal: Vec::with_capacity(closes.len()),
            histogram: Vec::with_capacity(closes.len()),
        };
        for (i, (&m, &s)) in macd_line.iter().zip(&signal_line).enumerate() {
            if warm(i) {
                series.macd.push(Some(m));
                series.signal.push(Some(s));
                series.histogram.push(Some(m - s));
            } else {
                series.macd.push(None);
                series.signal.push(None);
                series.histogram.push(None);
            }
        }
        Some(series)
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn required_bars(&self) -> usize {
        self.slow.saturating_add(self.signal)
    }

    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>> {
        match self.series(&closes(data)) {
            Some(series) => match self.component {
                MacdComponent::Line => series.macd,
                MacdComponent::Signal => series.signal,
                MacdComponent::Histogram => series.histogram,
            },
            None => vec![None; data.len()],
        }
    }
}
