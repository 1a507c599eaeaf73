//! Bollinger band mean reversion.
//!
//! BUY when the close touches or breaks the lower band, SELL at the upper band.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::IndicatorFrame;
use crate::domain::indicator::{BollingerBands, bollinger_bands};
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{BollingerConfig, StrategyConfig};
use crate::domain::strategy::{Strategy, clamp_strength, evaluation_window};

/// Where a close sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    Middle,
    BelowLower,
    AboveUpper,
}

impl BandPosition {
    pub fn classify(price: f64, bands: Option<BollingerBands>) -> BandPosition {
        match bands {
            Some(b) if price <= b.lower => BandPosition::BelowLower,
            Some(b) if price >= b.upper => BandPosition::AboveUpper,
            _ => BandPosition::Middle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BandPosition::Middle => "MIDDLE",
            BandPosition::BelowLower => "BELOW_LOWER",
            BandPosition::AboveUpper => "ABOVE_UPPER",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BollingerMeanReversion {
    config: BollingerConfig,
    name: String,
}

impl BollingerMeanReversion {
    pub fn new(config: BollingerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "BBMeanReversion({},{})",
            config.window(),
            config.std_multiplier()
        );
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &BollingerConfig {
        &self.config
    }

    pub fn reconfigure(&mut self, config: BollingerConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Current close and bands.
    fn current(&self, bars: &[Bar]) -> Result<Option<(f64, BollingerBands)>, StrategyError> {
        let window = self.config.window();
        let Some(prices) = evaluation_window(bars, self.min_history(), window)? else {
            return Ok(None);
        };
        let bands = bollinger_bands(&prices, window, self.config.std_multiplier());
        Ok(prices.last().copied().zip(bands.last().copied().flatten()))
    }
}

impl Strategy for BollingerMeanReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::Bollinger(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.window()
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let Some((price, bands)) = self.current(bars)? else {
            return Ok(Signal::Hold);
        };
        Ok(match BandPosition::classify(price, Some(bands)) {
            BandPosition::BelowLower => Signal::Buy,
            BandPosition::AboveUpper => Signal::Sell,
            BandPosition::Middle => Signal::Hold,
        })
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let prices = closes(bars);
        let bands = bollinger_bands(&prices, self.config.window(), self.config.std_multiplier());

        let pick = |f: fn(&BollingerBands) -> f64| -> Vec<Option<f64>> {
            bands.iter().map(|b| b.as_ref().map(f)).collect()
        };
        let percent_b = bands
            .iter()
            .zip(&prices)
            .map(|(b, &p)| b.and_then(|b| b.percent_b(p)))
            .collect();
        let position = bands
            .iter()
            .zip(&prices)
            .map(|(&b, &p)| BandPosition::classify(p, b).as_str())
            .collect();

        IndicatorFrame::new(bars)
            .with_values("BB_Upper", pick(|b| b.upper))
            .with_values("BB_Middle", pick(|b| b.middle))
            .with_values("BB_Lower", pick(|b| b.lower))
            .with_values("BB_Width", pick(BollingerBands::width))
            .with_values("Percent_B", percent_b)
            .with_labels("BB_Position", position)
    }

    /// 1 at the lower band, -1 at the upper band.
    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        let Ok(Some((price, bands))) = self.current(bars) else {
            return 0.0;
        };
        bands
            .percent_b(price)
            .map_or(0.0, |pb| clamp_strength(1.0 - 2.0 * pb))
    }
}
