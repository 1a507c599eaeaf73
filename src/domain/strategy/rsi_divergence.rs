//! Price/RSI divergence.
//!
//! Over the trailing lookback bars, a falling price with a rising RSI is a
//! bullish divergence and a rising price with a falling RSI a bearish one.
//! The RSI move must exceed the configured minimum.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::rsi;
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{RsiDivergenceConfig, StrategyConfig};
use crate::domain::strategy::{Strategy, evaluation_window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divergence {
    None,
    Bullish,
    Bearish,
}

impl Divergence {
    /// Compares first and last of the trailing `lookback` points. Any
    /// undefined RSI in that range means no divergence.
    pub fn detect(
        prices: &[f64],
        rsi: &[Option<f64>],
        lookback: usize,
        min_rsi_change: f64,
    ) -> Divergence {
        if lookback == 0 || prices.len() < lookback || rsi.len() < lookback {
            return Divergence::None;
        }
        let prices = &prices[prices.len() - lookback..];
        let recent: Option<Vec<f64>> = rsi[rsi.len() - lookback..].iter().copied().collect();
        let Some(recent) = recent else {
            return Divergence::None;
        };

        let price_change = prices[lookback - 1] - prices[0];
        let rsi_change = recent[lookback - 1] - recent[0];
        if price_change < 0.0 && rsi_change > min_rsi_change {
            Divergence::Bullish
        } else if price_change > 0.0 && rsi_change < -min_rsi_change {
            Divergence::Bearish
        } else {
            Divergence::None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Divergence::None => "NONE",
            Divergence::Bullish => "BULLISH",
            Divergence::Bearish => "BEARISH",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RsiDivergence {
    config: RsiDivergenceConfig,
    name: String,
}

impl RsiDivergence {
    pub fn new(config: RsiDivergenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "RSI_Divergence({},{},{})",
            config.window(),
            config.lookback(),
            config.min_rsi_change()
        );
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &RsiDivergenceConfig {
        &self.config
    }

    pub fn reconfigure(&mut self, config: RsiDivergenceConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }
}

impl Strategy for RsiDivergence {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::RsiDivergence(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.window().saturating_add(self.config.lookback())
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let depth = self.min_history();
        let Some(prices) = evaluation_window(bars, self.min_history(), depth)? else {
            return Ok(Signal::Hold);
        };
        let series = rsi(&prices, self.config.window());
        Ok(
            match Divergence::detect(
                &prices,
                &series,
                self.config.lookback(),
                self.config.min_rsi_change(),
            ) {
                Divergence::Bullish => Signal::Buy,
                Divergence::Bearish => Signal::Sell,
                Divergence::None => Signal::Hold,
            },
        )
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let prices = closes(bars);
        let series = rsi(&prices, self.config.window());
        let min_history = self.min_history();
        let divergence = (0..bars.len())
            .map(|i| {
                if i < min_history {
                    return Divergence::None.as_str();
                }
                Divergence::detect(
                    &prices[..=i],
                    &series[..=i],
                    self.config.lookback(),
                    self.config.min_rsi_change(),
                )
                .as_str()
            })
            .collect();
        IndicatorFrame::new(bars)
            .with_values("RSI", series)
            .with_labels("Divergence", divergence)
    }
}
