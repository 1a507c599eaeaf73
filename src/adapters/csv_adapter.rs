//! CSV bar source.
//!
//! Expects a header row naming at least `date` and `close`; `open`, `high`,
//! `low` and `volume` are optional. Dates are `YYYY-MM-DD` or
//! `YYYY-MM-DD HH:MM:SS`. An empty price cell reads as NaN so that the runner
//! can record the bar as a fault instead of rejecting the whole file.

use crate::domain::error::SigtraceError;
use crate::domain::ohlcv::{Bar, validate_series};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, SigtraceError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let required = |names: &[&str]| {
            find(names).ok_or_else(|| SigtraceError::Data {
                reason: format!("missing {} column", names[0]),
            })
        };
        Ok(Self {
            date: required(&["date", "timestamp", "datetime"])?,
            open: find(&["open"]),
            high: find(&["high"]),
            low: find(&["low"]),
            close: required(&["close"])?,
            volume: find(&["volume"]),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(
    record: &StringRecord,
    column: usize,
    name: &str,
    line: u64,
) -> Result<f64, SigtraceError> {
    let raw = record.get(column).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|e| SigtraceError::Data {
        reason: format!("line {line}: invalid {name} value '{raw}': {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn read_bars(&self, source: &str) -> Result<Vec<Bar>, SigtraceError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| {
            SigtraceError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", path.display(), e),
            ))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SigtraceError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigtraceError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let date_str = record.get(columns.date).unwrap_or("");
            let timestamp = parse_timestamp(date_str).ok_or_else(|| SigtraceError::Data {
                reason: format!("line {line}: invalid date '{date_str}'"),
            })?;

            let close = parse_price(&record, columns.close, "close", line)?;
            let optional = |column: Option<usize>, name: &str, fallback: f64| match column {
                Some(c) => parse_price(&record, c, name, line),
                None => Ok(fallback),
            };

            bars.push(Bar {
                timestamp,
                open: optional(columns.open, "open", close)?,
                high: optional(columns.high, "high", close)?,
                low: optional(columns.low, "low", close)?,
                close,
                volume: optional(columns.volume, "volume", 0.0)?,
            });
        }

        if bars.is_empty() {
            return Err(SigtraceError::NoData {
                source_name: path.display().to_string(),
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        validate_series(&bars)?;
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("EMPTY.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(
            path.join("CLOSE_ONLY.csv"),
            "Date,Close\n2024-01-15 09:30:00,10.5\n2024-01-15 09:31:00,\n",
        )
        .unwrap();
        fs::write(
            path.join("DUPLICATE.csv"),
            "date,close\n2024-01-15,1\n2024-01-15,2\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn read_bars_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.read_bars("BHP.csv").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, parse_timestamp("2024-01-15").unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert_eq!(bars[2].close, 115.0);
    }

    #[test]
    fn close_only_file_with_missing_value() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.read_bars("CLOSE_ONLY.csv").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 10.5);
        assert_eq!(bars[0].volume, 0.0);
        assert!(bars[1].close.is_nan());
    }

    #[test]
    fn empty_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.read_bars("EMPTY.csv").unwrap_err(),
            SigtraceError::NoData { .. }
        ));
    }

    #[test]
    fn duplicate_timestamps_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.read_bars("DUPLICATE.csv").unwrap_err(),
            SigtraceError::Data { .. }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.read_bars("XYZ.csv").unwrap_err(),
            SigtraceError::Io(_)
        ));
    }

    #[test]
    fn invalid_values_are_data_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.csv"), "date,close\n2024-13-01,1\n").unwrap();
        fs::write(dir.path().join("bad_close.csv"), "date,close\n2024-01-01,abc\n").unwrap();
        fs::write(dir.path().join("no_close.csv"), "date,open\n2024-01-01,1\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        for file in ["bad.csv", "bad_close.csv", "no_close.csv"] {
            assert!(
                matches!(adapter.read_bars(file).unwrap_err(), SigtraceError::Data { .. }),
                "{file}"
            );
        }
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp(" 2024-01-15 16:00:00 ").is_some());
        assert!(parse_timestamp("15/01/2024").is_none());
    }
}
