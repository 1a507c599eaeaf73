//! RSI (Relative Strength Index).
//!
//! Average gain and loss are plain trailing means over the last n price
//! changes (no Wilder smoothing):
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! avg_loss == 0 saturates to 100 when there were gains, and sits at the
//! neutral 50 when there was no movement at all.
//!
//! Warmup: the first n bars are undefined (n changes need n+1 prices).

use crate::domain::indicator::finite;

pub fn rsi(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    (0..prices.len())
        .map(|i| {
            if i < window {
                return None;
            }
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            for j in i + 1 - window..=i {
                let change = prices[j] - prices[j - 1];
                if !change.is_finite() {
                    return None;
                }
                if change > 0.0 {
                    gain_sum += change;
                } else {
                    loss_sum -= change;
                }
            }
            let avg_gain = gain_sum / window as f64;
            let avg_loss = loss_sum / window as f64;
            finite(rsi_from_averages(avg_gain, avg_loss))
        })
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
