//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × STD)
//! - Lower: Middle - (multiplier × STD)
//!
//! STD is the sample standard deviation over the same n closes.
//! Warmup: first (n-1) bars are undefined; n = 1 never defines a band.

use crate::domain::indicator::moving_average::sma;
use crate::domain::indicator::stddev::{defined, rolling_std};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// (upper - lower) / middle
    pub fn width(&self) -> f64 {
        (self.upper - self.lower) / self.middle
    }

    /// Position of `price` within the bands: 0 at the lower band, 1 at the
    /// upper band. Undefined when the bands have collapsed.
    pub fn percent_b(&self, price: f64) -> Option<f64> {
        let span = self.upper - self.lower;
        if span > 0.0 {
            Some((price - self.lower) / span)
        } else {
            None
        }
    }
}

pub fn bollinger_bands(
    prices: &[f64],
    window: usize,
    std_multiplier: f64,
) -> Vec<Option<BollingerBands>> {
    let middle = sma(prices, window);
    let std = rolling_std(&defined(prices), window);

    middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(middle), Some(std)) => Some(BollingerBands {
                upper: middle + std_multiplier * std,
                middle: *middle,
                lower: middle - std_multiplier * std,
            }),
            _ => None,
        })
        .collect()
}
