// Rule-based classification of an indicator frame's latest bars
use crate::error::{EngineError, Result};
use crate::indicators::IndicatorFrame;
use shared::models::{
    Classification, CrossEvent, Direction, InstrumentReport, MarketRegime, Momentum, RsiZone, Trend,
};

/// Classification of the latest bar.
pub fn classify(frame: &IndicatorFrame) -> Result<Classification> {
    match frame.len() {
        0 => Err(EngineError::insufficient(
            "classification",
            frame.settings.classification_min_bars(),
            0,
        )),
        len => classify_at(frame, len - 1),
    }
}

/// Classification of the bar at `index`, using `index - 1` as the prior bar.
pub fn classify_at(frame: &IndicatorFrame, index: usize) -> Result<Classification> {
    let settings = &frame.settings;
    let current = frame.row(index).ok_or_else(|| {
        EngineError::ProcessingError(format!("{}: no bar at index {}", frame.symbol, index))
    })?;
    if index == 0 {
        return Err(EngineError::insufficient("classification", 2, 1));
    }

    let bars_seen = index + 1;
    let ma_mid = current.ma_mid.ok_or_else(|| {
        EngineError::insufficient(format!("SMA({})", settings.mid_window), settings.mid_window, bars_seen)
    })?;
    let rsi = current.rsi.ok_or_else(|| {
        EngineError::insufficient(
            format!("RSI({})", settings.rsi_period),
            settings.rsi_min_bars.max(settings.rsi_period.saturating_add(1)),
            bars_seen,
        )
    })?;
    let histogram = current.histogram.ok_or_else(|| {
        EngineError::insufficient(
            format!("MACD({},{},{})", settings.macd_fast, settings.macd_slow, settings.macd_signal),
            settings.macd_min_bars(),
            bars_seen,
        )
    })?;

    let trend = if current.close > ma_mid {
        Trend::Bullish
    } else if current.close < ma_mid {
        Trend::Bearish
    } else {
        Trend::Consolidating
    };

    let momentum = if histogram > 0.0 { Momentum::Bullish } else { Momentum::Bearish };

    let rsi_zone = if rsi > settings.overbought {
        RsiZone::Overbought
    } else if rsi < settings.oversold {
        RsiZone::Oversold
    } else {
        RsiZone::Normal
    };

    let strong = current
        .ma_long
        .map(|ma_long| current.close > ma_mid && rsi < settings.overbought && current.close > ma_long);

    Ok(Classification {
        trend,
        momentum,
        rsi_zone,
        cross: cross_at(frame, index),
        strong,
    })
}

/// Golden cross when the short average moves from strictly below to strictly
/// above the mid average between `index - 1` and `index`; death cross is the inverse.
pub fn cross_at(frame: &IndicatorFrame, index: usize) -> Option<CrossEvent> {
    let previous = frame.row(index.checked_sub(1)?)?;
    let current = frame.row(index)?;
    let (prev_short, prev_mid) = (previous.ma_short?, previous.ma_mid?);
    let (cur_short, cur_mid) = (current.ma_short?, current.ma_mid?);

    if prev_short < prev_mid && cur_short > cur_mid {
        Some(CrossEvent::Golden)
    } else if prev_short > prev_mid && cur_short < cur_mid {
        Some(CrossEvent::Death)
    } else {
        None
    }
}

/// Every cross in the frame as `(index, event)`, oldest first.
pub fn cross_events(frame: &IndicatorFrame) -> Vec<(usize, CrossEvent)> {
    (1..frame.len())
        .filter_map(|i| cross_at(frame, i).map(|event| (i, event)))
        .collect()
}

/// Benchmark read: bearish on trend or momentum is defensive, bullish on both is aggressive.
pub fn market_regime(benchmark: &Classification) -> MarketRegime {
    match (benchmark.trend, benchmark.momentum) {
        (Trend::Bearish, _) | (_, Momentum::Bearish) => MarketRegime::Defensive,
        (Trend::Bullish, Momentum::Bullish) => MarketRegime::Aggressive,
        _ => MarketRegime::Neutral,
    }
}

/// Latest values and classification of a frame, labelled with `name`.
pub fn build_report(frame: &IndicatorFrame, name: &str) -> Result<InstrumentReport> {
    let classification = classify(frame)?;
    let (latest, previous) = match (frame.latest(), frame.previous()) {
        (Some(latest), Some(previous)) => (latest, previous),
        _ => return Err(EngineError::insufficient("classification", 2, frame.len())),
    };
    let required = |value: Option<f64>, column: &str| {
        value.ok_or_else(|| {
            EngineError::ProcessingError(format!("{}: missing {} at latest bar", frame.symbol, column))
        })
    };

    let change = latest.close - previous.close;
    Ok(InstrumentReport {
        symbol: frame.symbol.clone(),
        name: name.to_string(),
        timestamp: latest.timestamp,
        close: latest.close,
        change,
        direction: direction(change),
        ma_short: latest.ma_short,
        ma_mid: required(latest.ma_mid, "ma_mid")?,
        ma_long: latest.ma_long,
        rsi: required(latest.rsi, "rsi")?,
        macd: required(latest.macd, "macd")?,
        signal: required(latest.signal, "signal")?,
        histogram: required(latest.histogram, "histogram")?,
        classification,
    })
}

fn direction(change: f64) -> Direction {
    if change > 0.0 {
        Direction::Up
    } else if change < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorSettings;
    use crate::indicators::test_support::{create_series, rising};

    fn frame_for(closes: &[f64]) -> IndicatorFrame {
        IndicatorFrame::compute(&create_series("TEST", closes), &IndicatorSettings::default()).unwrap()
    }

    /// 25 falling closes followed by 20 closes rising three units a day.
    fn v_shaped() -> Vec<f64> {
        (0..45)
            .map(|i| if i < 25 { 100.0 - i as f64 } else { 76.0 + 3.0 * (i - 24) as f64 })
            .collect()
    }

    #[test]
    fn test_rising_forty_bars_classification() {
        let frame = frame_for(&rising(100.0, 40));
        let classification = classify(&frame).unwrap();
        assert_eq!(classification.trend, Trend::Bullish);
        assert_eq!(classification.momentum, Momentum::Bullish);
        assert_eq!(classification.rsi_zone, RsiZone::Overbought);
        assert_eq!(classification.cross, None);
        // 40 bars cannot fill the 60-bar average
        assert_eq!(classification.strong, None);
    }

    #[test]
    fn test_falling_series_is_bearish_and_oversold() {
        let closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let classification = classify(&frame_for(&closes)).unwrap();
        assert_eq!(classification.trend, Trend::Bearish);
        assert_eq!(classification.momentum, Momentum::Bearish);
        assert_eq!(classification.rsi_zone, RsiZone::Oversold);
    }

    #[test]
    fn test_flat_series_is_consolidating_and_neutral() {
        let classification = classify(&frame_for(&[50.0; 40])).unwrap();
        assert_eq!(classification.trend, Trend::Consolidating);
        // zero histogram is not bullish
        assert_eq!(classification.momentum, Momentum::Bearish);
        assert_eq!(classification.rsi_zone, RsiZone::Normal);
    }

    #[test]
    fn test_golden_cross_reported_only_on_crossing_day() {
        let frame = frame_for(&v_shaped());
        assert_eq!(cross_events(&frame), vec![(29, CrossEvent::Golden)]);
        for index in 1..frame.len() {
            let expected = if index == 29 { Some(CrossEvent::Golden) } else { None };
            assert_eq!(cross_at(&frame, index), expected, "index {}", index);
        }
        // MACD is still warming up on the crossing day
        assert!(matches!(classify_at(&frame, 29), Err(EngineError::InsufficientData { .. })));
        assert_eq!(classify_at(&frame, 34).unwrap().cross, None);
    }

    #[test]
    fn test_death_cross_is_symmetric() {
        let closes: Vec<f64> = (0..45)
            .map(|i| if i < 25 { 100.0 + i as f64 } else { 124.0 - 3.0 * (i - 24) as f64 })
            .collect();
        let frame = frame_for(&closes);
        assert_eq!(cross_events(&frame), vec![(29, CrossEvent::Death)]);
    }

    #[test]
    fn test_golden_cross_on_latest_bar_is_classified() {
        // Shift the V so the crossing day is the last bar
        let mut closes: Vec<f64> = (0..20).map(|_| 100.0).collect();
        closes.extend(v_shaped().into_iter().take(30));
        let frame = frame_for(&closes);
        assert_eq!(frame.len(), 50);
        assert_eq!(cross_events(&frame).last(), Some(&(49, CrossEvent::Golden)));
        assert_eq!(classify(&frame).unwrap().cross, Some(CrossEvent::Golden));
    }

    #[test]
    fn test_strength_flag_requires_long_average() {
        let frame = frame_for(&rising(100.0, 70));
        // close above both averages but RSI is 100 (overbought)
        assert_eq!(classify(&frame).unwrap().strong, Some(false));

        // +3 / -2 zig-zag: rising, but with enough losses to keep RSI near 62
        let mut closes = vec![100.0];
        for i in 1..70 {
            let last = closes[i - 1];
            closes.push(if i % 2 == 1 { last + 3.0 } else { last - 2.0 });
        }
        let frame = frame_for(&closes);
        let latest = frame.latest().unwrap();
        assert!(latest.rsi.unwrap() < 70.0);
        assert!(latest.close > latest.ma_mid.unwrap());
        assert_eq!(classify(&frame).unwrap().strong, Some(true));
    }

    #[test]
    fn test_short_series_is_insufficient_data() {
        let err = classify(&frame_for(&rising(100.0, 30))).unwrap_err();
        match err {
            EngineError::InsufficientData { indicator, required, actual } => {
                assert_eq!(indicator, "MACD(12,26,9)");
                assert_eq!(required, 35);
                assert_eq!(actual, 30);
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = classify(&frame_for(&rising(100.0, 10))).unwrap_err();
        assert!(err.to_string().contains("SMA(20)"));
        assert!(classify(&frame_for(&[])).is_err());
    }

    #[test]
    fn test_market_regime() {
        let base = Classification {
            trend: Trend::Bullish,
            momentum: Momentum::Bullish,
            rsi_zone: RsiZone::Normal,
            cross: None,
            strong: None,
        };
        assert_eq!(market_regime(&base), MarketRegime::Aggressive);
        assert_eq!(
            market_regime(&Classification { momentum: Momentum::Bearish, ..base }),
            MarketRegime::Defensive
        );
        assert_eq!(
            market_regime(&Classification { trend: Trend::Bearish, ..base }),
            MarketRegime::Defensive
        );
        assert_eq!(
            market_regime(&Classification { trend: Trend::Consolidating, ..base }),
            MarketRegime::Neutral
        );
    }

    #[test]
    fn test_build_report() {
        let frame = frame_for(&rising(100.0, 40));
        let report = build_report(&frame, "Test Corp").unwrap();
        assert_eq!(report.symbol, "TEST");
        assert_eq!(report.name, "Test Corp");
        assert_eq!(report.close, 139.0);
        assert_eq!(report.change, 1.0);
        assert_eq!(report.direction, Direction::Up);
        assert_eq!(report.ma_mid, 129.5);
        assert_eq!(report.rsi, 100.0);
        assert_eq!(report.histogram, report.macd - report.signal);
        assert_eq!(report.classification.trend, Trend::Bullish);
    }
}
