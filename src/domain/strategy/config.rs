//! Strategy configuration values.
//!
//! Each variant has its own immutable configuration type. Constructors and
//! every `with_*` method validate eagerly and return a new value, so a
//! configuration that exists is a valid one.

use crate::domain::error::ConfigError;
use crate::domain::indicator::MaKind;
use crate::domain::strategy::{
    BollingerMeanReversion, MovingAverageCrossover, MultiMovingAverageCrossover, RsiDivergence,
    RsiThreshold, Strategy, ZScoreMeanReversion,
};
use std::fmt;

fn positive_window(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidWindow { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

fn percentage(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}

/// Parameters of [`MovingAverageCrossover`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaCrossoverConfig {
    short_window: usize,
    long_window: usize,
    ma_kind: MaKind,
}

impl MaCrossoverConfig {
    pub fn new(short_window: usize, long_window: usize, ma_kind: MaKind) -> Result<Self, ConfigError> {
        let config = Self {
            short_window,
            long_window,
            ma_kind,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("short_window", self.short_window)?;
        positive_window("long_window", self.long_window)?;
        if self.short_window >= self.long_window {
            return Err(ConfigError::WindowOrder {
                short: self.short_window,
                long: self.long_window,
            });
        }
        Ok(())
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn ma_kind(&self) -> MaKind {
        self.ma_kind
    }

    pub fn with_short_window(&self, short_window: usize) -> Result<Self, ConfigError> {
        Self::new(short_window, self.long_window, self.ma_kind)
    }

    pub fn with_long_window(&self, long_window: usize) -> Result<Self, ConfigError> {
        Self::new(self.short_window, long_window, self.ma_kind)
    }

    pub fn with_ma_kind(&self, ma_kind: MaKind) -> Result<Self, ConfigError> {
        Self::new(self.short_window, self.long_window, ma_kind)
    }
}

impl Default for MaCrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            ma_kind: MaKind::Simple,
        }
    }
}

/// Parameters of [`MultiMovingAverageCrossover`]. Windows are kept sorted
/// ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMaConfig {
    windows: Vec<usize>,
    ma_kind: MaKind,
}

impl MultiMaConfig {
    pub fn new(mut windows: Vec<usize>, ma_kind: MaKind) -> Result<Self, ConfigError> {
        windows.sort_unstable();
        let config = Self { windows, ma_kind };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows.len() < 2 {
            return Err(ConfigError::TooFewWindows {
                count: self.windows.len(),
            });
        }
        for &w in &self.windows {
            positive_window("windows", w)?;
        }
        Ok(())
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    pub fn max_window(&self) -> usize {
        self.windows.last().copied().unwrap_or(0)
    }

    pub fn ma_kind(&self) -> MaKind {
        self.ma_kind
    }

    pub fn with_windows(&self, windows: Vec<usize>) -> Result<Self, ConfigError> {
        Self::new(windows, self.ma_kind)
    }

    pub fn with_ma_kind(&self, ma_kind: MaKind) -> Result<Self, ConfigError> {
        Self::new(self.windows.clone(), ma_kind)
    }
}

impl Default for MultiMaConfig {
    fn default() -> Self {
        Self {
            windows: vec![5, 10, 20],
            ma_kind: MaKind::Simple,
        }
    }
}

/// Parameters of [`RsiThreshold`].
#[derive(Debug, Clone, PartialEq)]
pub struct RsiThresholdConfig {
    window: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiThresholdConfig {
    pub fn new(window: usize, oversold: f64, overbought: f64) -> Result<Self, ConfigError> {
        let config = Self {
            window,
            oversold,
            overbought,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("rsi_window", self.window)?;
        percentage("oversold", self.oversold)?;
        percentage("overbought", self.overbought)?;
        if self.oversold >= self.overbought {
            return Err(ConfigError::ThresholdOrder {
                oversold: self.oversold,
                overbought: self.overbought,
            });
        }
        Ok(())
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn oversold(&self) -> f64 {
        self.oversold
    }

    pub fn overbought(&self) -> f64 {
        self.overbought
    }

    pub fn with_window(&self, window: usize) -> Result<Self, ConfigError> {
        Self::new(window, self.oversold, self.overbought)
    }

    pub fn with_thresholds(&self, oversold: f64, overbought: f64) -> Result<Self, ConfigError> {
        Self::new(self.window, oversold, overbought)
    }
}

impl Default for RsiThresholdConfig {
    fn default() -> Self {
        Self {
            window: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Parameters of [`RsiDivergence`].
#[derive(Debug, Clone, PartialEq)]
pub struct RsiDivergenceConfig {
    window: usize,
    lookback: usize,
    min_rsi_change: f64,
}

impl RsiDivergenceConfig {
    pub fn new(window: usize, lookback: usize, min_rsi_change: f64) -> Result<Self, ConfigError> {
        let config = Self {
            window,
            lookback,
            min_rsi_change,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("rsi_window", self.window)?;
        positive_window("lookback", self.lookback)?;
        if !(self.min_rsi_change >= 0.0) || !self.min_rsi_change.is_finite() {
            return Err(ConfigError::Negative {
                name: "min_rsi_change",
                value: self.min_rsi_change,
            });
        }
        Ok(())
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn min_rsi_change(&self) -> f64 {
        self.min_rsi_change
    }

    pub fn with_lookback(&self, lookback: usize) -> Result<Self, ConfigError> {
        Self::new(self.window, lookback, self.min_rsi_change)
    }

    pub fn with_min_rsi_change(&self, min_rsi_change: f64) -> Result<Self, ConfigError> {
        Self::new(self.window, self.lookback, min_rsi_change)
    }
}

impl Default for RsiDivergenceConfig {
    fn default() -> Self {
        Self {
            window: 14,
            lookback: 10,
            min_rsi_change: 5.0,
        }
    }
}

/// Parameters of [`ZScoreMeanReversion`].
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreConfig {
    window: usize,
    threshold: f64,
    ma_kind: MaKind,
}

impl ZScoreConfig {
    pub fn new(window: usize, threshold: f64, ma_kind: MaKind) -> Result<Self, ConfigError> {
        let config = Self {
            window,
            threshold,
            ma_kind,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("window", self.window)?;
        positive("threshold", self.threshold)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn ma_kind(&self) -> MaKind {
        self.ma_kind
    }

    pub fn with_threshold(&self, threshold: f64) -> Result<Self, ConfigError> {
        Self::new(self.window, threshold, self.ma_kind)
    }

    pub fn with_window(&self, window: usize) -> Result<Self, ConfigError> {
        Self::new(window, self.threshold, self.ma_kind)
    }
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            window: 20,
            threshold: 2.0,
            ma_kind: MaKind::Simple,
        }
    }
}

/// Parameters of [`BollingerMeanReversion`].
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerConfig {
    window: usize,
    std_multiplier: f64,
}

impl BollingerConfig {
    pub fn new(window: usize, std_multiplier: f64) -> Result<Self, ConfigError> {
        let config = Self {
            window,
            std_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_window("window", self.window)?;
        positive("std_multiplier", self.std_multiplier)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn std_multiplier(&self) -> f64 {
        self.std_multiplier
    }

    pub fn with_std_multiplier(&self, std_multiplier: f64) -> Result<Self, ConfigError> {
        Self::new(self.window, std_multiplier)
    }
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            window: 20,
            std_multiplier: 2.0,
        }
    }
}

/// Configuration of any strategy variant.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyConfig {
    MaCrossover(MaCrossoverConfig),
    MultiMa(MultiMaConfig),
    RsiThreshold(RsiThresholdConfig),
    RsiDivergence(RsiDivergenceConfig),
    ZScore(ZScoreConfig),
    Bollinger(BollingerConfig),
}

impl StrategyConfig {
    /// Kind identifiers accepted in configuration files.
    pub const KINDS: [&'static str; 6] = [
        "ma_crossover",
        "multi_ma",
        "rsi_threshold",
        "rsi_divergence",
        "zscore",
        "bollinger",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            StrategyConfig::MaCrossover(_) => "ma_crossover",
            StrategyConfig::MultiMa(_) => "multi_ma",
            StrategyConfig::RsiThreshold(_) => "rsi_threshold",
            StrategyConfig::RsiDivergence(_) => "rsi_divergence",
            StrategyConfig::ZScore(_) => "zscore",
            StrategyConfig::Bollinger(_) => "bollinger",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::MaCrossover(c) => c.validate(),
            StrategyConfig::MultiMa(c) => c.validate(),
            StrategyConfig::RsiThreshold(c) => c.validate(),
            StrategyConfig::RsiDivergence(c) => c.validate(),
            StrategyConfig::ZScore(c) => c.validate(),
            StrategyConfig::Bollinger(c) => c.validate(),
        }
    }

    /// Builds the strategy this configuration describes.
    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        let strategy: Box<dyn Strategy> = match self {
            StrategyConfig::MaCrossover(c) => Box::new(MovingAverageCrossover::new(c.clone())?),
            StrategyConfig::MultiMa(c) => Box::new(MultiMovingAverageCrossover::new(c.clone())?),
            StrategyConfig::RsiThreshold(c) => Box::new(RsiThreshold::new(c.clone())?),
            StrategyConfig::RsiDivergence(c) => Box::new(RsiDivergence::new(c.clone())?),
            StrategyConfig::ZScore(c) => Box::new(ZScoreMeanReversion::new(c.clone())?),
            StrategyConfig::Bollinger(c) => Box::new(BollingerMeanReversion::new(c.clone())?),
        };
        Ok(strategy)
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyConfig::MaCrossover(c) => write!(
                f,
                "short_window={}, long_window={}, ma_type={}",
                c.short_window, c.long_window, c.ma_kind
            ),
            StrategyConfig::MultiMa(c) => {
                let windows: Vec<String> = c.windows.iter().map(|w| w.to_string()).collect();
                write!(f, "windows=[{}], ma_type={}", windows.join(","), c.ma_kind)
            }
            StrategyConfig::RsiThreshold(c) => write!(
                f,
                "rsi_window={}, oversold={}, overbought={}",
                c.window, c.oversold, c.overbought
            ),
            StrategyConfig::RsiDivergence(c) => write!(
                f,
                "rsi_window={}, lookback={}, min_rsi_change={}",
                c.window, c.lookback, c.min_rsi_change
            ),
            StrategyConfig::ZScore(c) => write!(
                f,
                "window={}, threshold={}, ma_type={}",
                c.window, c.threshold, c.ma_kind
            ),
            StrategyConfig::Bollinger(c) => write!(
                f,
                "window={}, std_multiplier={}",
                c.window, c.std_multiplier
            ),
        }
    }
}
