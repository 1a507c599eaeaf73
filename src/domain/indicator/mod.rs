//! Technical indicator library.
//!
//! Every function takes a slice of closing prices (oldest first) and returns a
//! series of the same length. `None` marks an undefined point: the warm-up
//! period, a window touching a non-finite price, or a non-finite result.
//! A value at index `i` depends on `prices[..=i]` only, so evaluating the
//! series over a prefix yields the same values as evaluating it over the
//! full history.

pub mod bollinger;
pub mod moving_average;
pub mod rsi;
pub mod stddev;
pub mod zscore;

pub use bollinger::{BollingerBands, bollinger_bands};
pub use moving_average::{MaKind, ema, moving_average, sma};
pub use rsi::rsi;
pub use stddev::rolling_std;
pub use zscore::z_score;

/// Last value of an indicator series, flattened.
pub fn last(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Value one step before the last, flattened.
pub fn previous(series: &[Option<f64>]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    series[series.len() - 2]
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_and_previous() {
        let series = vec![None, Some(1.0), Some(2.0)];
        assert_eq!(last(&series), Some(2.0));
        assert_eq!(previous(&series), Some(1.0));
    }

    #[test]
    fn last_of_undefined_tail() {
        let series = vec![Some(1.0), None];
        assert_eq!(last(&series), None);
        assert_eq!(previous(&series), Some(1.0));
    }

    #[test]
    fn previous_requires_two_points() {
        assert_eq!(previous(&[Some(1.0)]), None);
        assert_eq!(last(&[]), None);
    }

    #[test]
    fn finite_filters_nan_and_inf() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }
}
