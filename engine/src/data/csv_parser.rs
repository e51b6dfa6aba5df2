use crate::error::{EngineError, Result};
use csv::{ReaderBuilder, StringRecord};
use shared::models::{PriceBar, PriceSeries};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Field-level parsing for daily price exports
pub mod daily_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, Utc};
    use std::str::FromStr;

    // Accepts "2024-03-01" (midnight UTC) or a full RFC 3339 timestamp
    pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .ok_or_else(|| anyhow!("Failed to build timestamp for date '{}'", s));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

    pub fn parse_price(s: &str) -> Result<f64> {
        f64::from_str(s.trim()).map_err(|e| anyhow!("Failed to parse price '{}': {}", s, e))
    }

    // Some exports write volume as a float ("1200.0")
    pub fn parse_volume(s: &str) -> Result<u64> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        u64::from_str(digits).map_err(|e| anyhow!("Failed to parse volume '{}': {}", s, e))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_parse_plain_date() {
            let dt = parse_date("2024-03-01").unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
            assert_eq!(dt.hour(), 0);
        }

        #[test]
        fn test_parse_rfc3339_date() {
            let dt = parse_date("2024-03-01T00:00:00+08:00").unwrap();
            assert_eq!((dt.month(), dt.day(), dt.hour()), (2, 29, 16));
        }

        #[test]
        fn test_parse_invalid_date() {
            assert!(parse_date("01/03/2024").is_err());
            assert!(parse_date("2024-02-30").is_err());
        }

        #[test]
        fn test_parse_price() {
            assert_eq!(parse_price(" 139.5 ").unwrap(), 139.5);
            assert!(parse_price("12,5").is_err());
        }

        #[test]
        fn test_parse_volume() {
            assert_eq!(parse_volume("1200").unwrap(), 1200);
            assert_eq!(parse_volume("1200.0").unwrap(), 1200);
            assert!(parse_volume("-5").is_err());
            assert!(parse_volume("12.5").is_err());
        }
    }
}

pub struct DailyCsvParser;

impl DailyCsvParser {
    // Header: Date,Open,High,Low,Close,Volume (any order, extra columns ignored)
    // Example row: 2024-03-01,690.0,699.0,688.0,697.0,31234567
    pub fn load_series_from_csv(path: impl AsRef<Path>, symbol: &str, delimiter: u8) -> Result<PriceSeries> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let date_str = Self::required_field(&record, &headers, "Date", line)?;
            let timestamp = daily_format::parse_date(date_str)
                .map_err(|e| Self::format_error("Date", line, e))?;

            let price = |name: &str| -> Result<f64> {
                let raw = Self::required_field(&record, &headers, name, line)?;
                daily_format::parse_price(raw).map_err(|e| Self::format_error(name, line, e))
            };
            let (open, high, low, close) = (price("Open")?, price("High")?, price("Low")?, price("Close")?);

            let volume_str = Self::required_field(&record, &headers, "Volume", line)?;
            let volume = daily_format::parse_volume(volume_str)
                .map_err(|e| Self::format_error("Volume", line, e))?;

            bars.push(PriceBar { timestamp, open, high, low, close, volume });
        }

        tracing::debug!(symbol = %symbol, path = %path.display(), bars = bars.len(), "Parsed daily CSV");
        Ok(PriceSeries::new(symbol, bars))
    }

    // Column lookup by header name so column order does not matter
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Missing '{}' field in CSV record at line {}", name, line))
        })
    }

    fn format_error(name: &str, line: usize, e: anyhow::Error) -> EngineError {
        EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_series_valid_data() {
        let csv_content = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-03-01,690.0,699.0,688.0,697.0,690.1,31234567
2024-03-04,700.0,712.0,698.0,710.0,703.0,40111222.0";
        let tmp_file = create_test_csv(csv_content);
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "2330.TW", b',').unwrap();

        assert_eq!(series.symbol, "2330.TW");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].timestamp, daily_format::parse_date("2024-03-01").unwrap());
        assert_eq!(series.bars[0].open, 690.0);
        assert_eq!(series.bars[0].close, 697.0);
        assert_eq!(series.bars[0].volume, 31234567);
        assert_eq!(series.bars[1].high, 712.0);
        assert_eq!(series.bars[1].volume, 40111222);
    }

    #[test]
    fn test_load_series_column_order_and_delimiter() {
        let csv_content = "\
Volume;Close;Low;High;Open;Date
1000;10.5;9.5;11.0;10.0;2024-01-02";
        let tmp_file = create_test_csv(csv_content);
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X", b';').unwrap();
        assert_eq!(series.bars[0].open, 10.0);
        assert_eq!(series.bars[0].close, 10.5);
        assert_eq!(series.bars[0].volume, 1000);
    }

    #[test]
    fn test_load_series_header_only() {
        let tmp_file = create_test_csv("Date,Open,High,Low,Close,Volume");
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X", b',').unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_load_series_missing_column() {
        let csv_content = "\
Date,Open,High,Low,Close
2024-01-02,10.0,11.0,9.5,10.5";
        let tmp_file = create_test_csv(csv_content);
        let err = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X", b',').unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Missing 'Volume' field"));
    }

    #[test]
    fn test_load_series_invalid_price() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-02,10.0,11.0,9.5,10.5,100
2024-01-03,invalid,11.0,9.5,10.5,100";
        let tmp_file = create_test_csv(csv_content);
        let err = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X", b',').unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Error parsing 'Open' at line 3"));
        assert!(message.contains("Failed to parse price 'invalid'"));
    }

    #[test]
    fn test_load_series_ragged_row() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-02,10.0,11.0";
        let tmp_file = create_test_csv(csv_content);
        let err = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X", b',').unwrap_err();
        assert!(matches!(err, EngineError::CsvSystemError { .. }));
    }

    #[test]
    fn test_load_series_missing_file() {
        let err = DailyCsvParser::load_series_from_csv("does/not/exist.csv", "X", b',').unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
