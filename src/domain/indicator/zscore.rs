//! Z-score of price deviation from a moving average.
//!
//! deviation = C - MA
//! z = deviation / max(STD(deviation, n), ε)
//!
//! With an SMA of the same window the first defined z sits at index 2n-2.

use crate::domain::indicator::finite;
use crate::domain::indicator::stddev::rolling_std;

pub const STD_FLOOR: f64 = f64::EPSILON;

/// Price minus moving average, undefined where the average is.
pub fn deviation(prices: &[f64], ma: &[Option<f64>]) -> Vec<Option<f64>> {
    prices
        .iter()
        .zip(ma)
        .map(|(&p, m)| m.and_then(|m| finite(p - m)))
        .collect()
}

pub fn z_score(prices: &[f64], ma: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let dev = deviation(prices, ma);
    let std = rolling_std(&dev, window);

    dev.iter()
        .zip(&std)
        .map(|(d, s)| match (d, s) {
            (Some(d), Some(s)) => finite(d / s.max(STD_FLOOR)),
            _ => None,
        })
        .collect()
}
