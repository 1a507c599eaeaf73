//! Simple and exponential moving averages.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]); undefined for the first (n-1) bars.
//!
//! EMA(n) is the adjusted exponentially weighted mean with α = 2/(n+1):
//! EMA[i] = Σ (1-α)^k · C[i-k] / Σ (1-α)^k, defined from the first bar. A
//! non-finite price keeps its place in the decay but adds no weight.

use crate::domain::error::ConfigError;
use crate::domain::indicator::finite;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaKind {
    Simple,
    Exponential,
}

impl MaKind {
    pub fn label(self) -> &'static str {
        match self {
            MaKind::Simple => "SMA",
            MaKind::Exponential => "EMA",
        }
    }

    /// Frame column name, e.g. `SMA_20`.
    pub fn column_name(self, window: usize) -> String {
        format!("{}_{}", self.label(), window)
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MaKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(MaKind::Simple),
            "EMA" => Ok(MaKind::Exponential),
            _ => Err(ConfigError::UnsupportedMaKind(s.trim().to_string())),
        }
    }
}

pub fn moving_average(prices: &[f64], window: usize, kind: MaKind) -> Vec<Option<f64>> {
    match kind {
        MaKind::Simple => sma(prices, window),
        MaKind::Exponential => ema(prices, window),
    }
}

pub fn sma(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    (0..prices.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let sum: f64 = prices[i + 1 - window..=i].iter().sum();
            finite(sum / window as f64)
        })
        .collect()
}

pub fn ema(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    prices
        .iter()
        .map(|&price| {
            if price.is_finite() {
                numerator = price + decay * numerator;
                denominator = 1.0 + decay * denominator;
            } else {
                numerator *= decay;
                denominator *= decay;
            }
            if denominator > 0.0 {
                finite(numerator / denominator)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ma_kind_parse() {
        assert_eq!("SMA".parse::<MaKind>().unwrap(), MaKind::Simple);
        assert_eq!(" ema ".parse::<MaKind>().unwrap(), MaKind::Exponential);
        assert_eq!(
            "WMA".parse::<MaKind>().unwrap_err(),
            ConfigError::UnsupportedMaKind("WMA".into())
        );
    }

    #[test]
    fn column_names() {
        assert_eq!(MaKind::Simple.column_name(20), "SMA_20");
        assert_eq!(MaKind::Exponential.column_name(5), "EMA_5");
    }

    #[test]
    fn sma_warmup() {
        let series = sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_relative_eq!(series[2].unwrap(), 20.0);
        assert_relative_eq!(series[3].unwrap(), 30.0);
        assert_relative_eq!(series[4].unwrap(), 40.0);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let series = sma(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn sma_zero_window_undefined() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_nan_poisons_window_only() {
        let series = sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert_eq!(series[1], None);
        assert_eq!(series[2], None);
        assert_relative_eq!(series[3].unwrap(), 3.5);
    }

    #[test]
    fn ema_defined_from_first_bar() {
        let series = ema(&[10.0, 20.0, 30.0], 3);
        assert!(series.iter().all(Option::is_some));
        assert_relative_eq!(series[0].unwrap(), 10.0);
    }

    #[test]
    fn ema_adjusted_weights() {
        // α = 0.5 → weights 1, 0.5, 0.25 (newest first)
        let series = ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(series[1].unwrap(), (20.0 + 0.5 * 10.0) / 1.5);
        assert_relative_eq!(
            series[2].unwrap(),
            (30.0 + 0.5 * 20.0 + 0.25 * 10.0) / 1.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn ema_constant_prices() {
        let series = ema(&[100.0; 10], 4);
        for v in series {
            assert_relative_eq!(v.unwrap(), 100.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn ema_skips_non_finite_input() {
        let series = ema(&[10.0, f64::NAN, 10.0], 3);
        assert_relative_eq!(series[1].unwrap(), 10.0);
        assert_relative_eq!(series[2].unwrap(), 10.0);
    }

    #[test]
    fn prefix_consistency() {
        let prices = [3.0, 5.0, 4.0, 8.0, 7.0, 9.0, 6.0];
        let full = moving_average(&prices, 3, MaKind::Exponential);
        let prefix = moving_average(&prices[..5], 3, MaKind::Exponential);
        assert_eq!(&full[..5], &prefix[..]);
    }
}
