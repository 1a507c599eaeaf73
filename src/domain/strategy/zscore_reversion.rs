//! Z-score mean reversion: buy stretched-down prices, sell stretched-up ones.

use crate::domain::error::{ConfigError, StrategyError};
use crate::domain::frame::{IndicatorFrame, Zone};
use crate::domain::indicator::zscore::deviation;
use crate::domain::indicator::{finite, last, moving_average, z_score};
use crate::domain::ohlcv::{Bar, closes};
use crate::domain::signal::Signal;
use crate::domain::strategy::config::{StrategyConfig, ZScoreConfig};
use crate::domain::strategy::{Strategy, clamp_strength, evaluation_window, ma_depth};

#[derive(Debug, Clone)]
pub struct ZScoreMeanReversion {
    config: ZScoreConfig,
    name: String,
}

impl ZScoreMeanReversion {
    pub fn new(config: ZScoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name = format!(
            "MeanReversion({},{},{})",
            config.window(),
            config.threshold(),
            config.ma_kind()
        );
        Ok(Self { config, name })
    }

    pub fn settings(&self) -> &ZScoreConfig {
        &self.config
    }

    pub fn reconfigure(&mut self, config: ZScoreConfig) -> Result<(), ConfigError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn current_z(&self, bars: &[Bar]) -> Result<Option<f64>, StrategyError> {
        let window = self.config.window();
        let depth = ma_depth(self.config.ma_kind(), window.saturating_mul(2) - 1);
        let Some(prices) = evaluation_window(bars, self.min_history(), depth)? else {
            return Ok(None);
        };
        let ma = moving_average(&prices, window, self.config.ma_kind());
        Ok(last(&z_score(&prices, &ma, window)))
    }

    fn zone(&self, z: Option<f64>) -> Zone {
        let threshold = self.config.threshold();
        Zone::classify(z, -threshold, threshold)
    }
}

impl Strategy for ZScoreMeanReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> StrategyConfig {
        StrategyConfig::ZScore(self.config.clone())
    }

    fn min_history(&self) -> usize {
        self.config.window().saturating_mul(2)
    }

    fn generate_signal(&self, bars: &[Bar]) -> Result<Signal, StrategyError> {
        let z = self.current_z(bars)?;
        Ok(match self.zone(z) {
            Zone::Oversold => Signal::Buy,
            Zone::Overbought => Signal::Sell,
            Zone::Neutral => Signal::Hold,
        })
    }

    fn add_indicators(&self, bars: &[Bar]) -> IndicatorFrame {
        let prices = closes(bars);
        let window = self.config.window();
        let kind = self.config.ma_kind();
        let threshold = self.config.threshold();

        let ma = moving_average(&prices, window, kind);
        let z = z_score(&prices, &ma, window);
        let dev = deviation(&prices, &ma);
        let dev_pct = dev
            .iter()
            .zip(&ma)
            .map(|(d, m)| match (d, m) {
                (Some(d), Some(m)) if *m != 0.0 => finite(d / m * 100.0),
                _ => None,
            })
            .collect();
        let zones = z.iter().map(|&v| self.zone(v).as_str()).collect();

        IndicatorFrame::new(bars)
            .with_values(kind.column_name(window), ma)
            .with_values("Z_Score", z)
            .with_constant("Upper_Threshold", threshold)
            .with_constant("Lower_Threshold", -threshold)
            .with_values("Deviation", dev)
            .with_values("Deviation_Pct", dev_pct)
            .with_labels("Signal_Zone", zones)
    }

    /// Negative z is bullish; |z| of 3 saturates.
    fn signal_strength(&self, bars: &[Bar]) -> f64 {
        match self.current_z(bars) {
            Ok(Some(z)) => clamp_strength(-z / 3.0),
            _ => 0.0,
        }
    }
}
