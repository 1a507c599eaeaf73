//! Performance statistics over return series.
//!
//! All functions are pure and run after a full trace has been produced.
//! Returns are simple fractional changes (0.01 = 1%).

use crate::domain::runner::RunResult;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Bar-to-bar percentage change; one shorter than `closes`. A change from a
/// zero price is reported as 0.
pub fn returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| if w[0] != 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// Running compounded return: Π(1 + r) - 1.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth - 1.0
        })
        .collect()
}

/// Final compounded return; 0 for an empty series.
pub fn cumulative_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |wealth, r| wealth * (1.0 + r)) - 1.0
}

fn mean_and_sample_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    // a constant series has no spread, whatever the rounding of its mean
    if values.windows(2).all(|w| w[0] == w[1]) {
        return Some((values[0], 0.0));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance.sqrt()))
}

/// Annualized Sharpe ratio of daily returns against an annual risk-free rate.
/// Zero when fewer than two returns exist or the excess returns do not vary.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    match mean_and_sample_std(&excess) {
        Some((mean, std)) if std > 0.0 && std.is_finite() => {
            TRADING_DAYS_PER_YEAR.sqrt() * mean / std
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline of the wealth curve `1 + cumulative`, as a
/// positive percentage.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for c in cumulative {
        let wealth = 1.0 + c;
        peak = peak.max(wealth);
        if peak > 0.0 {
            worst = worst.min((wealth - peak) / peak);
        }
    }
    worst.abs() * 100.0
}

/// Sample standard deviation of daily returns scaled by √252.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    mean_and_sample_std(returns)
        .map(|(_, std)| std * TRADING_DAYS_PER_YEAR.sqrt())
        .unwrap_or(0.0)
}

/// Returns earned by holding the previous bar's position over each bar.
/// Aligned with [`returns`] of the traced closes.
pub fn strategy_returns(result: &RunResult) -> Vec<f64> {
    let market = returns(&result.closes());
    result
        .rows
        .iter()
        .zip(market)
        .map(|(row, r)| {
            let held = f64::from(row.position.code()) * r;
            if held.is_finite() { held } else { 0.0 }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub buy_and_hold_return: f64,
    pub strategy_return: f64,
    pub sharpe_ratio: f64,
    pub buy_and_hold_sharpe: f64,
    /// Percent.
    pub max_drawdown: f64,
    pub volatility: f64,
}

impl PerformanceSummary {
    pub fn compute(result: &RunResult, risk_free_rate: f64) -> Self {
        let market: Vec<f64> = returns(&result.closes())
            .into_iter()
            .map(|r| if r.is_finite() { r } else { 0.0 })
            .collect();
        let strategy = strategy_returns(result);

        Self {
            buy_and_hold_return: cumulative_return(&market),
            strategy_return: cumulative_return(&strategy),
            sharpe_ratio: sharpe_ratio(&strategy, risk_free_rate),
            buy_and_hold_sharpe: sharpe_ratio(&market, risk_free_rate),
            max_drawdown: max_drawdown(&cumulative_returns(&strategy)),
            volatility: annualized_volatility(&strategy),
        }
    }
}
