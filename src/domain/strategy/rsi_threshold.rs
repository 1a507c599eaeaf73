//! RSI overbought/oversold thresholds.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::{IndicatorFrame, Zone};
use crate::domain::indicator::{last, rsi};
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{RsiThresholdConfig, StrategyConfig};
use crate::domain::strategy::{Strategy, clamp_strength, evaluation_window};

#[derive(Debug, Clone)]
pub struct RsiThreshold {
    config: RsiThresholdConfig,
    name: String,
}

impl RsiThreshold {
    pub fn new(config: RsiThresholdConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "RSI({},{},{})",
            config.window(),
            config.oversold(),
            config.overbought()
        );
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &RsiThresholdConfig {
        &self.config
    }

    pub fn reconfigure(&mut self, config: RsiThresholdConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn current_rsi(&self, bars: &[Bar]) -> Result<Option<f64>, StrategyError> {
        let window = self.config.window();
        let depth = window.saturating_add(1);
        let Some(prices) = evaluation_window(bars, self.min_history(), depth)? else {
            return Ok(None);
        };
        Ok(last(&rsi(&prices, window)))
    }

    fn zone(&self, value: Option<f64>) -> Zone {
        Zone::classify(value, self.config.oversold(), self.config.overbought())
    }
}

impl Strategy for RsiThreshold {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::RsiThreshold(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.window()
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let value = self.current_rsi(bars)?;
        Ok(match self.zone(value) {
            Zone::Oversold => Signal::Buy,
            Zone::Overbought => Signal::Sell,
            Zone::Neutral => Signal::Hold,
        })
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let series = rsi(&closes(bars), self.config.window());
        let status = series.iter().map(|&v| self.zone(v).as_str()).collect();
        IndicatorFrame::new(bars)
            .with_values("RSI", series)
            .with_constant("RSI_Oversold", self.config.oversold())
            .with_constant("RSI_Overbought", self.config.overbought())
            .with_labels("RSI_Status", status)
    }

    /// Depth into the oversold zone is bullish, depth into the overbought
    /// zone bearish. Between the thresholds, distance from 50.
    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        let Ok(Some(value)) = self.current_rsi(bars) else {
            return 0.0;
        };
        let oversold = self.config.oversold();
        let overbought = self.config.overbought();
        let strength = match self.zone(Some(value)) {
            Zone::Oversold if oversold > 0.0 => (oversold - value) / oversold,
            Zone::Oversold => 1.0,
            Zone::Overbought if overbought < 100.0 => -(value - overbought) / (100.0 - overbought),
            Zone::Overbought => -1.0,
            Zone::Neutral => (50.0 - value) / 50.0,
        };
        clamp_strength(strength)
    }
}
