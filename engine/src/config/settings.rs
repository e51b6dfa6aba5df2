// Engine settings, loaded from the embedded default JSON or a user-supplied file
use crate::error::{EngineError, Result};
use crate::indicators::MAX_PERIOD;
use serde::{Deserialize, Serialize};
use shared::models::RankBy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub indicators: IndicatorSettings,
    pub screener: ScreenerSettings,
    pub data: DataSettings,
}

/// Windows, periods and thresholds of the indicator frame and classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub short_window: usize,
    pub mid_window: usize,
    pub long_window: usize,
    pub rsi_period: usize,
    /// Bars required before the RSI column is reported at all.
    pub rsi_min_bars: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub overbought: f64,
    pub oversold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerSettings {
    pub watchlist: Vec<String>,
    pub names: HashMap<String, String>,
    pub benchmark: Option<String>,
    pub top_n: usize,
    pub rank_by: RankBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub data_dir: PathBuf,
    pub csv_delimiter: String, // Should be char, but JSON string is easier
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            short_window: 5,
            mid_window: 20,
            long_window: 60,
            rsi_period: 14,
            rsi_min_bars: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        ScreenerSettings {
            watchlist: Vec::new(),
            names: HashMap::new(),
            benchmark: None,
            top_n: 5,
            rank_by: RankBy::Rsi,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            data_dir: PathBuf::from("data"),
            csv_delimiter: ",".to_string(),
        }
    }
}

impl IndicatorSettings {
    /// Bars needed before MACD, signal and histogram are reported.
    pub fn macd_min_bars(&self) -> usize {
        self.macd_slow.saturating_add(self.macd_signal)
    }

    /// Bars needed before an instrument can be classified.
    pub fn classification_min_bars(&self) -> usize {
        self.mid_window
            .max(self.rsi_min_bars)
            .max(self.macd_min_bars())
            .max(2)
    }

    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("short_window", self.short_window),
            ("mid_window", self.mid_window),
            ("long_window", self.long_window),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, v)| *v == 0) {
            return Err(EngineError::ConfigError(format!("{} must be greater than 0", name)));
        }
        let min_bars = [("rsi_min_bars", self.rsi_min_bars)];
        let too_long = windows.iter().chain(min_bars.iter()).find(|(_, v)| *v > MAX_PERIOD);
        if let Some((name, value)) = too_long {
            return Err(EngineError::ConfigError(format!(
                "{} ({}) must not exceed {}",
                name, value, MAX_PERIOD
            )));
        }
        if self.short_window >= self.mid_window {
            return Err(EngineError::ConfigError(format!(
                "short_window ({}) must be less than mid_window ({})",
                self.short_window, self.mid_window
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::ConfigError(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.rsi_min_bars < self.rsi_period + 1 {
            return Err(EngineError::ConfigError(format!(
                "rsi_min_bars ({}) must be at least rsi_period + 1 ({})",
                self.rsi_min_bars,
                self.rsi_period + 1
            )));
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.overbought) || !in_range(self.oversold) {
            return Err(EngineError::ConfigError(
                "RSI thresholds must lie within [0, 100]".to_string(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(EngineError::ConfigError(format!(
                "oversold ({}) must be below overbought ({})",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

impl ScreenerSettings {
    /// Display name of a symbol, falling back to the symbol itself.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.names.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(EngineError::ConfigError("top_n must be greater than 0".to_string()));
        }
        if let Some(empty) = self.watchlist.iter().position(|s| s.trim().is_empty()) {
            return Err(EngineError::ConfigError(format!(
                "watchlist entry {} is empty",
                empty
            )));
        }
        Ok(())
    }
}

impl DataSettings {
    pub fn delimiter(&self) -> Result<u8> {
        match self.csv_delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(EngineError::ConfigError(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            ))),
        }
    }

    /// Location of the daily-bar CSV for a symbol.
    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }
}

impl EngineSettings {
    /// Settings bundled with the binary.
    pub fn load_default() -> Result<Self> {
        Self::from_json(DEFAULT_CONFIG)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        self.screener.validate()?;
        self.data.delimiter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_loads() {
        let settings = EngineSettings::load_default().unwrap();
        assert_eq!(settings.indicators, IndicatorSettings::default());
        assert_eq!(settings.screener.top_n, 5);
        assert_eq!(settings.screener.benchmark.as_deref(), Some("0050.TW"));
        assert_eq!(settings.screener.watchlist.first().map(String::as_str), Some("0050.TW"));
        assert_eq!(settings.screener.display_name("2330.TW"), "TSMC");
        assert_eq!(settings.data.delimiter().unwrap(), b',');
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EngineSettings::from_json(r#"{ "screener": { "watchlist": ["AAPL"], "top_n": 3 } }"#).unwrap();
        assert_eq!(settings.screener.watchlist, vec!["AAPL".to_string()]);
        assert_eq!(settings.screener.top_n, 3);
        assert_eq!(settings.screener.rank_by, RankBy::Rsi);
        assert_eq!(settings.indicators.macd_min_bars(), 35);
        assert_eq!(settings.indicators.classification_min_bars(), 35);
    }

    #[test]
    fn test_display_name_falls_back_to_symbol() {
        let settings = ScreenerSettings::default();
        assert_eq!(settings.display_name("MSFT"), "MSFT");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let cases = [
            r#"{ "indicators": { "macd_fast": 26, "macd_slow": 12 } }"#,
            r#"{ "indicators": { "rsi_period": 0 } }"#,
            r#"{ "indicators": { "short_window": 20, "mid_window": 20 } }"#,
            r#"{ "indicators": { "oversold": 80.0, "overbought": 70.0 } }"#,
            r#"{ "indicators": { "overbought": 120.0 } }"#,
            r#"{ "indicators": { "rsi_period": 30 } }"#,
            r#"{ "screener": { "top_n": 0 } }"#,
            r#"{ "screener": { "watchlist": ["2330.TW", " "] } }"#,
            r#"{ "data": { "csv_delimiter": ";;" } }"#,
            r#"{ "indicators": { "rsi_min_bars": 1000000 } }"#,
        ];
        for raw in cases {
            let err = EngineSettings::from_json(raw).unwrap_err();
            assert!(matches!(err, EngineError::ConfigError(_)), "accepted: {}", raw);
        }
    }

    #[test]
    fn test_huge_periods_rejected_without_overflow() {
        for field in ["rsi_period", "macd_slow", "macd_signal", "long_window"] {
            let raw = format!(r#"{{ "indicators": {{ "{}": {} }} }}"#, field, u64::MAX);
            let err = EngineSettings::from_json(&raw).unwrap_err();
            assert!(matches!(err, EngineError::ConfigError(_)), "accepted huge {}", field);
        }
        let settings = IndicatorSettings { macd_slow: usize::MAX, ..IndicatorSettings::default() };
        assert_eq!(settings.macd_min_bars(), usize::MAX);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = EngineSettings::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Invalid settings JSON"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "data": {{ "data_dir": "/tmp/bars", "csv_delimiter": ";" }} }}"#).unwrap();
        let settings = EngineSettings::load_from_path(file.path()).unwrap();
        assert_eq!(settings.data.delimiter().unwrap(), b';');
        assert_eq!(settings.data.csv_path("2330.TW"), PathBuf::from("/tmp/bars/2330.TW.csv"));
    }

    #[test]
    fn test_load_from_missing_path_is_io_error() {
        let err = EngineSettings::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
