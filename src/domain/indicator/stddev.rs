//! Rolling sample standard deviation.
//!
//! STD(n)[i] = sqrt(Σ (x[i-j] - mean)^2 / (n - 1)) for j in 0..n
//!
//! Sample (n-1) divisor, matching the reference rolling statistics. A window
//! that contains an undefined value is undefined, so a series that is itself
//! warming up pushes the first defined deviation further out. n < 2 is
//! always undefined.

use crate::domain::indicator::finite;

pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut points = Vec::with_capacity(window);
            for v in slice {
                points.push((*v)?);
            }
            let mean = points.iter().sum::<f64>() / window as f64;
            let variance = points
                .iter()
                .map(|x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (window - 1) as f64;
            finite(variance.sqrt())
        })
        .collect()
}

/// Wraps raw prices as a fully defined series.
pub fn defined(prices: &[f64]) -> Vec<Option<f64>> {
    prices.iter().map(|&p| finite(p)).collect()
}
