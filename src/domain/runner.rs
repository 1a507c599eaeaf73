//! Bar-by-bar strategy evaluation.
//!
//! The runner feeds every prefix of the series to the strategy, applies the
//! resulting signal to a [`PositionTracker`] and records one row per bar. A
//! bar whose evaluation faults is logged, recorded as HOLD and skipped; the
//! run always covers the whole series.

use crate::domain::error::StrategyError;
use crate::domain::ohlcv::Bar;
use crate::domain::position::{PositionChangeRecord, PositionTracker, SignalRecord, StrategyStats};
use crate::domain::signal::{Position, Signal};
use crate::domain::strategy::Strategy;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub bar: Bar,
    pub signal: Signal,
    pub position: Position,
    pub unrealized_pnl: f64,
}

/// A bar whose signal could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct BarFault {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub error: StrategyError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub strategy_name: String,
    pub rows: Vec<RunRow>,
    pub faults: Vec<BarFault>,
}

impl RunResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.rows.iter().map(|r| r.signal).collect()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.rows.iter().map(|r| r.position).collect()
    }

    pub fn unrealized_pnl(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.unrealized_pnl).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.bar.close).collect()
    }
}

pub struct Runner<S: Strategy> {
    strategy: S,
    tracker: PositionTracker,
}

impl<S: Strategy> Runner<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            tracker: PositionTracker::new(),
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn run(&mut self, bars: &[Bar]) -> RunResult {
        self.tracker.reset();
        let name = self.strategy.name().to_string();
        debug!(strategy = %name, bars = bars.len(), "starting run");

        let mut rows = Vec::with_capacity(bars.len());
        let mut faults = Vec::new();

        for (index, bar) in bars.iter().enumerate() {
            let signal = match self.strategy.generate_signal(&bars[..=index]) {
                Ok(signal) => signal,
                Err(error) => {
                    warn!(
                        strategy = %name,
                        index,
                        timestamp = %bar.timestamp,
                        %error,
                        "signal fault, holding"
                    );
                    faults.push(BarFault {
                        index,
                        timestamp: bar.timestamp,
                        error,
                    });
                    Signal::Hold
                }
            };

            if self.tracker.apply(signal, bar.close, bar.timestamp) {
                debug!(
                    strategy = %name,
                    index,
                    %signal,
                    position = %self.tracker.position(),
                    price = bar.close,
                    "position change"
                );
            }
            self.tracker.record_signal(signal, bar.close, bar.timestamp);

            rows.push(RunRow {
                bar: bar.clone(),
                signal,
                position: self.tracker.position(),
                unrealized_pnl: self.tracker.unrealized_pnl(bar.close),
            });
        }

        info!(
            strategy = %name,
            bars = rows.len(),
            position_changes = self.tracker.position_log().len(),
            faults = faults.len(),
            "run complete"
        );

        RunResult {
            strategy_name: name,
            rows,
            faults,
        }
    }

    pub fn stats(&self) -> StrategyStats {
        self.tracker.stats(self.strategy.name(), self.strategy.config())
    }

    pub fn signal_log(&self) -> &[SignalRecord] {
        self.tracker.signal_log()
    }

    pub fn position_log(&self) -> &[PositionChangeRecord] {
        self.tracker.position_log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::MaKind;
    use crate::domain::strategy::test_support::bars_from_closes;
    use crate::domain::strategy::{MaCrossoverConfig, MovingAverageCrossover, StrategyConfig};
    use approx::assert_relative_eq;

    fn runner() -> Runner<MovingAverageCrossover> {
        let config = MaCrossoverConfig::new(2, 4, MaKind::Simple).unwrap();
        Runner::new(MovingAverageCrossover::new(config).unwrap())
    }

    const SCENARIO: [f64; 12] = [
        100.0, 100.0, 100.0, 100.0, 100.0, 105.0, 110.0, 115.0, 120.0, 90.0, 85.0, 80.0,
    ];

    #[test]
    fn empty_input_gives_empty_result() {
        let result = runner().run(&[]);
        assert!(result.is_empty());
        assert!(result.faults.is_empty());
    }

    #[test]
    fn crossover_scenario_trace() {
        let mut runner = runner();
        let result = runner.run(&bars_from_closes(&SCENARIO));
        assert_eq!(result.len(), 12);
        assert_eq!(result.strategy_name, "MovingAverage(2,4,SMA)");

        let positions = result.positions();
        assert!(positions[..5].iter().all(|&p| p == Position::Neutral));
        assert!(positions[5..9].iter().all(|&p| p == Position::Long));
        assert!(positions[9..].iter().all(|&p| p == Position::Short));

        let pnl = result.unrealized_pnl();
        assert_eq!(pnl[4], 0.0);
        assert_relative_eq!(pnl[5], 0.0);
        assert_relative_eq!(pnl[8], (120.0 - 105.0) / 105.0);
        assert_relative_eq!(pnl[11], (90.0 - 80.0) / 90.0);

        assert_eq!(runner.position_log().len(), 2);
        assert_eq!(runner.signal_log().len(), 12);
    }

    #[test]
    fn faulting_bar_is_recorded_as_hold() {
        let mut closes = SCENARIO.to_vec();
        closes[6] = f64::NAN;
        let mut runner = runner();
        let result = runner.run(&bars_from_closes(&closes));

        assert_eq!(result.len(), closes.len());
        assert_eq!(result.faults.len(), 1);
        assert_eq!(result.faults[0].index, 6);
        assert_eq!(result.rows[6].signal, Signal::Hold);
        assert_eq!(result.rows[6].position, Position::Long);
        assert_eq!(result.rows[6].unrealized_pnl, 0.0);
    }

    #[test]
    fn rerun_resets_logs() {
        let mut runner = runner();
        let bars = bars_from_closes(&SCENARIO);
        let first = runner.run(&bars);
        let second = runner.run(&bars);
        assert_eq!(first, second);
        assert_eq!(runner.signal_log().len(), 12);
    }

    #[test]
    fn stats_after_run() {
        let mut runner = runner();
        runner.run(&bars_from_closes(&SCENARIO));
        let stats = runner.stats();
        assert_eq!(stats.total_signals, 12);
        assert_eq!(stats.buy_signals, 1);
        assert_eq!(stats.sell_signals, 1);
        assert_eq!(stats.hold_signals, 10);
        assert_eq!(stats.position_changes, 2);
        assert_eq!(stats.current_position, Position::Short);
        assert!(matches!(stats.parameters, StrategyConfig::MaCrossover(_)));
    }

    #[test]
    fn runs_boxed_strategies() {
        let strategy = StrategyConfig::MaCrossover(MaCrossoverConfig::default())
            .build()
            .unwrap();
        let mut runner = Runner::new(strategy);
        let result = runner.run(&bars_from_closes(&SCENARIO));
        assert_eq!(result.len(), 12);
        assert!(result.signals().iter().all(|&s| s == Signal::Hold));
    }
}
