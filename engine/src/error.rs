use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error("Insufficient data for {indicator}: need {required} bars, got {actual}")]
    InsufficientData {
        indicator: String,
        required: usize,
        actual: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn insufficient(indicator: impl Into<String>, required: usize, actual: usize) -> Self {
        EngineError::InsufficientData {
            indicator: indicator.into(),
            required,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = EngineError::insufficient("MACD(12,26,9)", 35, 20);
        assert_eq!(err.to_string(), "Insufficient data for MACD(12,26,9): need 35 bars, got 20");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: EngineError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
