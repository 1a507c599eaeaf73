//! OHLCV bar representation.

use crate::domain::error::SigtraceError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar with open/high/low all equal to `close` and zero volume.
    pub fn from_close(timestamp: NaiveDateTime, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Closing prices of `bars`, in order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Checks that timestamps are strictly increasing.
pub fn validate_series(bars: &[Bar]) -> Result<(), SigtraceError> {
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(SigtraceError::Data {
                reason: format!(
                    "timestamps must be strictly increasing: bar {} ({}) follows {}",
                    i + 1,
                    pair[1].timestamp,
                    pair[0].timestamp
                ),
            });
        }
    }
    Ok(())
}
