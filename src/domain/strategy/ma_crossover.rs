//! Two-line moving average crossover.
//!
//! BUY on a golden cross (short crosses above long), SELL on a death cross.
//! A cross needs the previous bar on or beyond the line and the current bar
//! strictly past it.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::{last, moving_average, previous};
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{MaCrossoverConfig, StrategyConfig};
use crate::domain::strategy::{Strategy, clamp_strength, evaluation_window, ma_depth};

#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    config: MaCrossoverConfig,
    name: String,
}

impl MovingAverageCrossover {
    pub fn new(config: MaCrossoverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "MovingAverage({},{},{})",
            config.short_window(),
            config.long_window(),
            config.ma_kind()
        );
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &MaCrossoverConfig {
        &self.config
    }

    /// Replaces the parameters; the old ones stay in place on error.
    pub fn reconfigure(&mut self, config: MaCrossoverConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn lines(&self, prices: &[f64]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let kind = self.config.ma_kind();
        (
            moving_average(prices, self.config.short_window(), kind),
            moving_average(prices, self.config.long_window(), kind),
        )
    }

    fn window(&self, bars: &[Bar]) -> Result<Option<Vec<f64>>, StrategyError> {
        let span = self.config.long_window().saturating_add(1);
        let depth = ma_depth(self.config.ma_kind(), span);
        evaluation_window(bars, self.min_history(), depth)
    }
}

/// Crossover decision from the previous and current values of a fast and a
/// slow line. Any undefined value means no decision.
pub(crate) fn crossover(
    prev_fast: Option<f64>,
    prev_slow: Option<f64>,
    fast: Option<f64>,
    slow: Option<f64>,
) -> Signal {
    let (Some(prev_fast), Some(prev_slow), Some(fast), Some(slow)) =
        (prev_fast, prev_slow, fast, slow)
    else {
        return Signal::Hold;
    };
    if prev_fast <= prev_slow && fast > slow {
        Signal::Buy
    } else if prev_fast >= prev_slow && fast < slow {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

impl Strategy for MovingAverageCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::MaCrossover(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.long_window() - 1
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let Some(prices) = self.window(bars)? else {
            return Ok(Signal::Hold);
        };
        let (short, long) = self.lines(&prices);
        Ok(crossover(
            previous(&short),
            previous(&long),
            last(&short),
            last(&long),
        ))
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let prices = closes(bars);
        let (short, long) = self.lines(&prices);
        let (diff, ratio): (Vec<_>, Vec<_>) = short
            .iter()
            .zip(&long)
            .map(|pair| match pair {
                (Some(s), Some(l)) => (Some(s - l), (*l != 0.0).then(|| s / l)),
                _ => (None, None),
            })
            .unzip();

        let kind = self.config.ma_kind();
        IndicatorFrame::new(bars)
            .with_values(kind.column_name(self.config.short_window()), short)
            .with_values(kind.column_name(self.config.long_window()), long)
            .with_values("MA_Diff", diff)
            .with_values("MA_Ratio", ratio)
    }

    /// Relative spread of the short line over the long line, scaled by 10.
    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        let Ok(Some(prices)) = self.window(bars) else {
            return 0.0;
        };
        let (short, long) = self.lines(&prices);
        match (last(&short), last(&long)) {
            (Some(s), Some(l)) if l != 0.0 => clamp_strength(10.0 * (s - l) / l),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::MaKind;
    use crate::domain::strategy::test_support::bars_from_closes;
    use approx::assert_relative_eq;

    fn strategy(short: usize, long: usize) -> MovingAverageCrossover {
        MovingAverageCrossover::new(MaCrossoverConfig::new(short, long, MaKind::Simple).unwrap())
            .unwrap()
    }

    fn signals(strategy: &MovingAverageCrossover, closes: &[f64]) -> Vec<Signal> {
        let bars = bars_from_closes(closes);
        (0..bars.len())
            .map(|i| strategy.generate_signal(&bars[..=i]).unwrap())
            .collect()
    }

    #[test]
    fn name_includes_parameters() {
        assert_eq!(strategy(5, 20).name(), "MovingAverage(5,20,SMA)");
        let ema = MovingAverageCrossover::new(
            MaCrossoverConfig::new(12, 26, MaKind::Exponential).unwrap(),
        )
        .unwrap();
        assert_eq!(ema.name(), "MovingAverage(12,26,EMA)");
    }

    #[test]
    fn golden_and_death_cross() {
        let closes = [
            100.0, 100.0, 100.0, 100.0, 100.0, 105.0, 110.0, 115.0, 120.0, 90.0, 85.0, 80.0,
        ];
        let got = signals(&strategy(2, 4), &closes);
        let mut expected = vec![Signal::Hold; closes.len()];
        expected[5] = Signal::Buy;
        expected[9] = Signal::Sell;
        assert_eq!(got, expected);
    }

    #[test]
    fn hold_before_long_window() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64).sin() * 5.0).collect();
        let s = strategy(3, 10);
        let got = signals(&s, &closes);
        assert!(got[..s.min_history()].iter().all(|&x| x == Signal::Hold));
    }

    #[test]
    fn crossover_tie_breaks() {
        // touching then crossing is a cross
        assert_eq!(crossover(Some(1.0), Some(1.0), Some(2.0), Some(1.0)), Signal::Buy);
        assert_eq!(crossover(Some(1.0), Some(1.0), Some(0.5), Some(1.0)), Signal::Sell);
        // reaching equality is not
        assert_eq!(crossover(Some(0.5), Some(1.0), Some(1.0), Some(1.0)), Signal::Hold);
        // already above stays HOLD
        assert_eq!(crossover(Some(2.0), Some(1.0), Some(3.0), Some(1.0)), Signal::Hold);
        assert_eq!(crossover(None, Some(1.0), Some(3.0), Some(1.0)), Signal::Hold);
    }

    #[test]
    fn frame_columns() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let frame = strategy(2, 3).add_indicators(&bars);
        assert_eq!(
            frame.column_names(),
            vec!["SMA_2", "SMA_3", "MA_Diff", "MA_Ratio"]
        );
        let diff = frame.values("MA_Diff").unwrap();
        assert_eq!(diff[1], None);
        assert_relative_eq!(diff[3].unwrap(), 3.5 - 3.0);
        assert_relative_eq!(frame.values("MA_Ratio").unwrap()[3].unwrap(), 3.5 / 3.0);
    }

    #[test]
    fn strength_sign_follows_spread() {
        let s = strategy(2, 4);
        let rising = bars_from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let falling = bars_from_closes(&[104.0, 103.0, 102.0, 101.0, 100.0]);
        assert!(s.signal_strength(&rising) > 0.0);
        assert!(s.signal_strength(&falling) < 0.0);
        assert_eq!(s.signal_strength(&rising[..2]), 0.0);
    }

    #[test]
    fn reconfigure_keeps_old_parameters_on_error() {
        let mut s = strategy(5, 20);
        assert!(s.reconfigure(MaCrossoverConfig::default().with_long_window(40).unwrap()).is_ok());
        assert_eq!(s.name(), "MovingAverage(5,40,SMA)");
        let bad = MaCrossoverConfig::new(40, 5, MaKind::Simple);
        assert!(bad.is_err());
        assert_eq!(s.settings().long_window(), 40);
    }

    #[test]
    fn huge_long_window_holds_without_overflow() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        for kind in [MaKind::Simple, MaKind::Exponential] {
            let config = MaCrossoverConfig::new(2, usize::MAX, kind).unwrap();
            let s = MovingAverageCrossover::new(config).unwrap();
            for i in 0..bars.len() {
                assert_eq!(s.generate_signal(&bars[..=i]).unwrap(), Signal::Hold);
            }
        }
    }
}
