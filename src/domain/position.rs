//! Position state machine and its append-only logs.

use crate::domain::signal::{Position, Signal};
use crate::domain::strategy::StrategyConfig;
use chrono::NaiveDateTime;

/// One evaluated bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub timestamp: NaiveDateTime,
    pub signal: Signal,
    pub price: f64,
    /// Position after the signal was applied.
    pub position: Position,
}

/// A bar on which the position actually changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionChangeRecord {
    pub timestamp: NaiveDateTime,
    pub old_position: Position,
    pub new_position: Position,
    pub price: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyStats {
    pub strategy_name: String,
    pub total_signals: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub hold_signals: usize,
    pub position_changes: usize,
    /// Percent of all signals.
    pub buy_signal_rate: f64,
    /// Percent of all signals.
    pub sell_signal_rate: f64,
    pub current_position: Position,
    pub parameters: StrategyConfig,
}

#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    position: Position,
    entry_price: f64,
    signal_log: Vec<SignalRecord>,
    change_log: Vec<PositionChangeRecord>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to NEUTRAL with entry price 0 and empty logs.
    pub fn reset(&mut self) {
        self.position = Position::Neutral;
        self.entry_price = 0.0;
        self.signal_log.clear();
        self.change_log.clear();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    /// Applies `signal` at `price`. Returns true if the position changed, in
    /// which case the entry price is reset to `price` and a change record is
    /// appended.
    pub fn apply(&mut self, signal: Signal, price: f64, timestamp: NaiveDateTime) -> bool {
        let next = self.position.transition(signal);
        if next == self.position {
            return false;
        }
        self.change_log.push(PositionChangeRecord {
            timestamp,
            old_position: self.position,
            new_position: next,
            price,
            signal,
        });
        self.position = next;
        self.entry_price = price;
        true
    }

    /// Fractional P&L of the open position at `price`: positive when the
    /// position is in profit. Zero when flat, without an entry price, or when
    /// `price` is not finite.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 || !price.is_finite() {
            return 0.0;
        }
        let entry = self.entry_price;
        match self.position {
            Position::Long => (price - entry) / entry,
            Position::Short => (entry - price) / entry,
            Position::Neutral => 0.0,
        }
    }

    /// Appends the record for a bar whose signal has already been applied.
    pub fn record_signal(&mut self, signal: Signal, price: f64, timestamp: NaiveDateTime) {
        self.signal_log.push(SignalRecord {
            timestamp,
            signal,
            price,
            position: self.position,
        });
    }

    pub fn signal_log(&self) -> &[SignalRecord] {
        &self.signal_log
    }

    pub fn position_log(&self) -> &[PositionChangeRecord] {
        &self.change_log
    }

    pub fn stats(&self, strategy_name: &str, parameters: StrategyConfig) -> StrategyStats {
        let count = |s: Signal| self.signal_log.iter().filter(|r| r.signal == s).count();
        let total_signals = self.signal_log.len();
        let buy_signals = count(Signal::Buy);
        let sell_signals = count(Signal::Sell);
        let rate = |n: usize| {
            if total_signals == 0 {
                0.0
            } else {
                n as f64 / total_signals as f64 * 100.0
            }
        };

        StrategyStats {
            strategy_name: strategy_name.to_string(),
            total_signals,
            buy_signals,
            sell_signals,
            hold_signals: count(Signal::Hold),
            position_changes: self.change_log.len(),
            buy_signal_rate: rate(buy_signals),
            sell_signal_rate: rate(sell_signals),
            current_position: self.position,
            parameters,
        }
    }
}
