// Handler for ad-hoc indicator queries over a stored series
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::IndicatorSettings;
use crate::data::SeriesStore;
use crate::error::{EngineError, Result};
use crate::indicators::{Ema, IndicatorCalculator, Macd, MacdComponent, Rsi, Sma};
use serde_json::Value;
use shared::models::IndicatorSeries;

pub async fn handle_calculate_indicator(
    symbol: &str,
    indicator_type: &str,
    parameters: &str,
    defaults: &IndicatorSettings,
    store: Arc<RwLock<SeriesStore>>,
) -> Result<IndicatorSeries> {
    tracing::debug!(symbol = %symbol, indicator_type = %indicator_type, "Handling indicator query");

    let series = store.read().await.get_series(symbol);
    let series = match series {
        Some(series) if !series.is_empty() => series,
        _ => {
            tracing::warn!(symbol = %symbol, "No bars found to calculate indicator");
            return Err(EngineError::MarketDataError(format!(
                "No bars found for symbol '{}' to calculate indicator",
                symbol
            )));
        }
    };

    let params: Value = if parameters.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(parameters).map_err(|e| {
            EngineError::ProcessingError(format!(
                "Invalid JSON parameters for indicator '{}': {}",
                indicator_type, e
            ))
        })?
    };
    if !params.is_object() {
        return Err(EngineError::ProcessingError(format!(
            "Parameters for indicator '{}' must be a JSON object",
            indicator_type
        )));
    }

    let calculator = build_calculator(indicator_type, &params, defaults)?;
    let values = calculator.calculate(&series.bars);

    Ok(IndicatorSeries {
        name: calculator.name().to_string(),
        parameters: calculator.parameters(),
        values,
    })
}

fn build_calculator(
    indicator_type: &str,
    params: &Value,
    defaults: &IndicatorSettings,
) -> Result<Box<dyn IndicatorCalculator>> {
    let macd = |component: MacdComponent| -> Result<Box<dyn IndicatorCalculator>> {
        let indicator = Macd::new(
            usize_param(params, "fast", defaults.macd_fast)?,
            usize_param(params, "slow", defaults.macd_slow)?,
            usize_param(params, "signal", defaults.macd_signal)?,
        )?;
        Ok(Box::new(indicator.component(component)))
    };

    match indicator_type.to_lowercase().as_str() {
        "sma" => Ok(Box::new(Sma::new(usize_param(params, "period", defaults.mid_window)?)?)),
        "ema" => Ok(Box::new(Ema::new(usize_param(params, "period", defaults.mid_window)?)?)),
        "rsi" => {
            let period = usize_param(params, "period", defaults.rsi_period)?;
            let min_bars = usize_param(params, "min_bars", period.saturating_add(1))?;
            Ok(Box::new(Rsi::new(period)?.with_min_bars(min_bars)))
        }
        "macd" => macd(MacdComponent::Line),
        "macd_signal" => macd(MacdComponent::Signal),
        "macd_histogram" => macd(MacdComponent::Histogram),
        _ => {
            tracing::error!(indicator_type = %indicator_type, "Unknown indicator type requested");
            Err(EngineError::IndicatorError(format!("Unknown indicator type: {}", indicator_type)))
        }
    }
}

fn usize_param(params: &Value, key: &str, default: usize) -> Result<usize> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                EngineError::IndicatorError(format!(
                    "Parameter '{}' must be a non-negative integer, got {}",
                    key, value
                ))
            }),
    }
}
