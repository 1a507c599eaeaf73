//! Moving average stack alignment.
//!
//! With windows sorted ascending, a bullish stack has every shorter average at
//! or above the next longer one; a bearish stack the reverse. The bullish
//! test runs first, so a flat stack is bullish.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::{last, moving_average};
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{MultiMaConfig, StrategyConfig};
use crate::domain::strategy::{Strategy, clamp_strength, evaluation_window, ma_depth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Bullish,
    Bearish,
    Mixed,
}

impl Alignment {
    /// Alignment of averages ordered shortest window first.
    pub fn of(stack: &[f64]) -> Alignment {
        if stack.windows(2).all(|p| p[0] >= p[1]) {
            Alignment::Bullish
        } else if stack.windows(2).all(|p| p[0] <= p[1]) {
            Alignment::Bearish
        } else {
            Alignment::Mixed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Bullish => "BULLISH",
            Alignment::Bearish => "BEARISH",
            Alignment::Mixed => "MIXED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MultiMovingAverageCrossover {
    config: MultiMaConfig,
    name: String,
}

impl MultiMovingAverageCrossover {
    pub fn new(config: MultiMaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let windows: Vec<String> = config.windows().iter().map(|w| w.to_string()).collect();
        let name = format!("MultiMA({},{})", windows.join(","), config.ma_kind());
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &MultiMaConfig {
        &self.config
    }

    pub fn reconfigure(&mut self, config: MultiMaConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn averages(&self, prices: &[f64]) -> Vec<Vec<Option<f64>>> {
        self.config
            .windows()
            .iter()
            .map(|&w| moving_average(prices, w, self.config.ma_kind()))
            .collect()
    }

    /// Current value of every average, or `None` if any is undefined.
    fn stack(&self, bars: &[Bar]) -> Result<Option<Vec<f64>>, StrategyError> {
        let depth = ma_depth(self.config.ma_kind(), self.config.max_window());
        let Some(prices) = evaluation_window(bars, self.min_history(), depth)? else {
            return Ok(None);
        };
        Ok(self.averages(&prices).iter().map(|s| last(s)).collect())
    }
}

impl Strategy for MultiMovingAverageCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::MultiMa(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.max_window() - 1
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let Some(stack) = self.stack(bars)? else {
            return Ok(Signal::Hold);
        };
        Ok(match Alignment::of(&stack) {
            Alignment::Bullish => Signal::Buy,
            Alignment::Bearish => Signal::Sell,
            Alignment::Mixed => Signal::Hold,
        })
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let prices = closes(bars);
        let averages = self.averages(&prices);
        let alignment = (0..bars.len())
            .map(|i| {
                let stack: Option<Vec<f64>> = averages.iter().map(|s| s[i]).collect();
                stack.map_or(Alignment::Mixed, |s| Alignment::of(&s)).as_str()
            })
            .collect();

        let kind = self.config.ma_kind();
        let frame = self
            .config
            .windows()
            .iter()
            .zip(averages)
            .fold(IndicatorFrame::new(bars), |frame, (&w, series)| {
                frame.with_values(kind.column_name(w), series)
            });
        frame.with_labels("MA_Alignment", alignment)
    }

    /// Share of adjacent pairs stacked bullishly minus the share stacked
    /// bearishly.
    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        let Ok(Some(stack)) = self.stack(bars) else {
            return 0.0;
        };
        let pairs = stack.len() - 1;
        let bullish = stack.windows(2).filter(|p| p[0] > p[1]).count();
        let bearish = stack.windows(2).filter(|p| p[0] < p[1]).count();
        clamp_strength((bullish as f64 - bearish as f64) / pairs as f64)
    }
}
