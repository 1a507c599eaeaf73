//! Trading signal and position sum types.

use std::fmt;

/// Per-bar trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// +1 / -1 / 0, the tabular encoding of the trace.
    pub fn code(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current exposure of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    Long,
    Short,
    #[default]
    Neutral,
}

impl Position {
    /// +1 / -1 / 0.
    pub fn code(self) -> i8 {
        match self {
            Position::Long => 1,
            Position::Short => -1,
            Position::Neutral => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Long => "LONG",
            Position::Short => "SHORT",
            Position::Neutral => "NEUTRAL",
        }
    }

    /// Position after `signal` is applied. A BUY while LONG or a SELL while
    /// SHORT leaves the position unchanged; HOLD never changes it.
    pub fn transition(self, signal: Signal) -> Position {
        match signal {
            Signal::Buy => Position::Long,
            Signal::Sell => Position::Short,
            Signal::Hold => self,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
