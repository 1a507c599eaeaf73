#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sigtrace::domain::error::SigtraceError;
pub use sigtrace::domain::ohlcv::Bar;
use sigtrace::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, source: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(source.to_string(), bars);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn read_bars(&self, source: &str) -> Result<Vec<Bar>, SigtraceError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(SigtraceError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(source) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(SigtraceError::NoData {
                source_name: source.to_string(),
            }),
        }
    }
}

pub fn day(offset: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(offset as i64)
}

pub fn make_bar(offset: usize, close: f64) -> Bar {
    Bar {
        timestamp: day(offset),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c))
        .collect()
}

/// Deterministic oscillating series with a slow drift.
pub fn wave(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            start_price + (t * 0.35).sin() * 6.0 + (t * 0.11).cos() * 3.0 + t * 0.05
        })
        .collect()
}

/// The canonical crossover scenario: BUY at index 5, SELL at index 9 with
/// MA(2, 4, SMA).
pub const CROSSOVER_SCENARIO: [f64; 12] = [
    100.0, 100.0, 100.0, 100.0, 100.0, 105.0, 110.0, 115.0, 120.0, 90.0, 85.0, 80.0,
];

pub fn csv_content(closes: &[f64]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for (i, c) in closes.iter().enumerate() {
        out.push_str(&format!(
            "{},{c},{c},{c},{c},1000\n",
            day(i).format("%Y-%m-%d")
        ));
    }
    out
}
