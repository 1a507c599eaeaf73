//! Signal-generating strategies.
//!
//! A strategy looks at the bars seen so far (oldest first, the last one being
//! the bar under evaluation) and decides BUY, SELL or HOLD. Strategies are
//! stateless between calls; position bookkeeping lives in
//! [`crate::domain::position::PositionTracker`].

pub mod config;

mod bollinger_reversion;
mod ma_crossover;
mod multi_ma;
mod rsi_divergence;
mod rsi_threshold;
mod zscore_reversion;

pub use bollinger_reversion::{BandPosition, BollingerMeanReversion};
pub use config::{
    BollingerConfig, MaCrossoverConfig, MultiMaConfig, RsiDivergenceConfig, RsiThresholdConfig,
    StrategyConfig, ZScoreConfig,
};
pub use ma_crossover::MovingAverageCrossover;
pub use multi_ma::{Alignment, MultiMovingAverageCrossover};
pub use rsi_divergence::{Divergence, RsiDivergence};
pub use rsi_threshold::RsiThreshold;
pub use zscore_reversion::ZScoreMeanReversion;

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::MaKind;
use crate::domain::ohlcv::Bar;
use crate::domain::signal::Signal;

pub trait Strategy: Send + Sync {
    /// Identifying name including the parameters, e.g. `RSI(14,30,70)`.
    fn name(&self) -> &str;

    fn config(&self) -> StrategyConfig;

    fn validate_config(&self) -> Result<(), ConfigError> {
        self.config().validate()
    }

    /// Index of the first bar that may produce a non-HOLD signal.
    fn min_history(&self) -> usize;

    /// Decision for the last bar of `bars`. HOLD whenever history is short or
    /// an indicator is undefined; `Err` only when the bar itself is unusable.
    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError>;

    /// Indicator columns over the whole series. Pure: calling it twice on the
    /// same bars yields equal frames.
    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame;

    /// Conviction in [-1, 1] at the last bar; positive is bullish.
    fn signal_strength(&self, _bars: &[Bar]) -> f64 {
        0.0
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn config(&self) -> StrategyConfig {
        (**self).config()
    }

    fn validate_config(&self) -> Result<(), ConfigError> {
        (**self).validate_config()
    }

    fn min_history(&self) -> usize {
        (**self).min_history()
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        (**self).generate_signal(bars)
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        (**self).add_indicators(bars)
    }

    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        (**self).signal_strength(bars)
    }
}

/// Closes needed to evaluate the last bar of `bars`.
///
/// Fails when the current close is not finite. Returns `None` while the last
/// index is below `min_index`. Only the trailing `depth` closes are returned;
/// every indicator value at the last bar depends on those alone.
pub(crate) fn evaluation_window(
    bars: &[Bar],
    min_index: usize,
    depth: usize,
) -> Result<Option<Vec<f64>>, StrategyError> {
    let Some(current) = bars.last() else {
        return Ok(None);
    };
    let index = bars.len() - 1;
    if !current.close.is_finite() {
        return Err(StrategyError::NonFinitePrice {
            index,
            value: current.close,
        });
    }
    if index < min_index {
        return Ok(None);
    }
    let start = bars.len().saturating_sub(depth);
    Ok(Some(bars[start..].iter().map(|b| b.close).collect()))
}

/// Closes a moving average of `kind` needs for its last `span` values. The
/// exponential average reaches back to the first bar.
pub(crate) fn ma_depth(kind: MaKind, span: usize) -> usize {
    match kind {
        MaKind::Simple => span,
        MaKind::Exponential => usize::MAX,
    }
}

pub(crate) fn clamp_strength(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::bars_from_closes;
    use super::*;

    #[test]
    fn evaluation_window_rejects_non_finite_current_close() {
        let bars = bars_from_closes(&[1.0, 2.0, f64::NAN]);
        let err = evaluation_window(&bars, 0, usize::MAX).unwrap_err();
        assert!(matches!(err, StrategyError::NonFinitePrice { index: 2, .. }));
    }

    #[test]
    fn non_finite_close_faults_even_during_warmup() {
        let bars = bars_from_closes(&[f64::INFINITY]);
        assert!(evaluation_window(&bars, 10, 5).is_err());
    }

    #[test]
    fn evaluation_window_gates_on_index() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert_eq!(evaluation_window(&bars, 3, 10).unwrap(), None);
        assert_eq!(
            evaluation_window(&bars, 2, 10).unwrap(),
            Some(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn evaluation_window_keeps_trailing_depth() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(evaluation_window(&bars, 0, 2).unwrap(), Some(vec![3.0, 4.0]));
        assert_eq!(evaluation_window(&[], 0, 2).unwrap(), None);
    }

    #[test]
    fn strength_is_clamped() {
        assert_eq!(clamp_strength(3.0), 1.0);
        assert_eq!(clamp_strength(-3.0), -1.0);
        assert_eq!(clamp_strength(f64::NAN), 0.0);
        assert_eq!(clamp_strength(0.25), 0.25);
    }

    #[test]
    fn boxed_strategy_delegates() {
        let boxed: Box<dyn Strategy> = StrategyConfig::RsiThreshold(RsiThresholdConfig::default())
            .build()
            .unwrap();
        assert_eq!(boxed.name(), "RSI(14,30,70)");
        assert_eq!(boxed.min_history(), 14);
        assert!(boxed.validate_config().is_ok());
    }
}
