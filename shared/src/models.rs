use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading day for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars of a single instrument, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

/// Values of one named indicator, aligned bar-for-bar with its input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

/// Close relative to the mid-window moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Consolidating,
}

/// Sign of the MACD histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Normal,
}

/// Short moving average crossing the mid moving average between two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossEvent {
    Golden,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Risk appetite derived from the benchmark instrument of a screening pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Aggressive,
    Neutral,
    Defensive,
}

/// Sort key used to rank screening candidates (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    #[default]
    Rsi,
    Histogram,
    Change,
}

/// Categorical view of the latest bar of an indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub trend: Trend,
    pub momentum: Momentum,
    pub rsi_zone: RsiZone,
    pub cross: Option<CrossEvent>,
    /// `None` while the long moving average is still warming up.
    pub strong: Option<bool>,
}

/// Latest indicator values plus classification for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub symbol: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub change: f64,
    pub direction: Direction,
    pub ma_short: Option<f64>,
    pub ma_mid: f64,
    pub ma_long: Option<f64>,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one screening pass over a watchlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Every classified instrument, in watchlist order.
    pub reports: Vec<InstrumentReport>,
    /// Strong instruments, ranked and capped.
    pub candidates: Vec<InstrumentReport>,
    pub skipped: Vec<SkippedInstrument>,
    pub regime: Option<MarketRegime>,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Consolidating => write!(f, "consolidating"),
        }
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Momentum::Bullish => write!(f, "bullish"),
            Momentum::Bearish => write!(f, "bearish"),
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiZone::Overbought => write!(f, "overbought"),
            RsiZone::Oversold => write!(f, "oversold"),
            RsiZone::Normal => write!(f, "normal"),
        }
    }
}

impl fmt::Display for CrossEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossEvent::Golden => write!(f, "golden cross"),
            CrossEvent::Death => write!(f, "death cross"),
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketRegime::Aggressive => write!(f, "aggressive"),
            MarketRegime::Neutral => write!(f, "neutral"),
            MarketRegime::Defensive => write!(f, "defensive"),
        }
    }
}
