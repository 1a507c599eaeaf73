//! Strategy and backtest settings from a configuration source.
//!
//! Missing optional keys take the variant defaults. A value that is present
//! but does not parse is rejected rather than replaced by a default.

use crate::domain::error::SigtraceError;
use crate::domain::indicator::MaKind;
use crate::domain::strategy::{
    BollingerConfig, MaCrossoverConfig, MultiMaConfig, RsiDivergenceConfig, RsiThresholdConfig,
    StrategyConfig, ZScoreConfig,
};
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

const STRATEGY: &str = "strategy";
const BACKTEST: &str = "backtest";

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SigtraceError {
    SigtraceError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_or<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, SigtraceError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| invalid(section, key, format!("cannot parse '{raw}'"))),
    }
}

fn ma_kind_or(config: &dyn ConfigPort, default: MaKind) -> Result<MaKind, SigtraceError> {
    match config.get_string(STRATEGY, "ma_type") {
        None => Ok(default),
        Some(raw) => Ok(raw.parse::<MaKind>()?),
    }
}

fn windows_or(config: &dyn ConfigPort, default: &[usize]) -> Result<Vec<usize>, SigtraceError> {
    match config.get_list(STRATEGY, "windows") {
        None => Ok(default.to_vec()),
        Some(items) => items
            .iter()
            .map(|item| {
                item.parse()
                    .map_err(|_| invalid(STRATEGY, "windows", format!("cannot parse '{item}'")))
            })
            .collect(),
    }
}

/// Reads `[strategy]` into a validated [`StrategyConfig`].
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, SigtraceError> {
    let kind = config
        .get_string(STRATEGY, "kind")
        .ok_or_else(|| SigtraceError::ConfigMissing {
            section: STRATEGY.to_string(),
            key: "kind".to_string(),
        })?;

    let strategy = match kind.to_ascii_lowercase().as_str() {
        "ma_crossover" => {
            let d = MaCrossoverConfig::default();
            StrategyConfig::MaCrossover(MaCrossoverConfig::new(
                parse_or(config, STRATEGY, "short_window", d.short_window())?,
                parse_or(config, STRATEGY, "long_window", d.long_window())?,
                ma_kind_or(config, d.ma_kind())?,
            )?)
        }
        "multi_ma" => {
            let d = MultiMaConfig::default();
            StrategyConfig::MultiMa(MultiMaConfig::new(
                windows_or(config, d.windows())?,
                ma_kind_or(config, d.ma_kind())?,
            )?)
        }
        "rsi_threshold" => {
            let d = RsiThresholdConfig::default();
            StrategyConfig::RsiThreshold(RsiThresholdConfig::new(
                parse_or(config, STRATEGY, "rsi_window", d.window())?,
                parse_or(config, STRATEGY, "oversold", d.oversold())?,
                parse_or(config, STRATEGY, "overbought", d.overbought())?,
            )?)
        }
        "rsi_divergence" => {
            let d = RsiDivergenceConfig::default();
            StrategyConfig::RsiDivergence(RsiDivergenceConfig::new(
                parse_or(config, STRATEGY, "rsi_window", d.window())?,
                parse_or(config, STRATEGY, "lookback", d.lookback())?,
                parse_or(config, STRATEGY, "min_rsi_change", d.min_rsi_change())?,
            )?)
        }
        "zscore" => {
            let d = ZScoreConfig::default();
            StrategyConfig::ZScore(ZScoreConfig::new(
                parse_or(config, STRATEGY, "window", d.window())?,
                parse_or(config, STRATEGY, "threshold", d.threshold())?,
                ma_kind_or(config, d.ma_kind())?,
            )?)
        }
        "bollinger" => {
            let d = BollingerConfig::default();
            StrategyConfig::Bollinger(BollingerConfig::new(
                parse_or(config, STRATEGY, "window", d.window())?,
                parse_or(config, STRATEGY, "std_multiplier", d.std_multiplier())?,
            )?)
        }
        other => {
            return Err(invalid(
                STRATEGY,
                "kind",
                format!(
                    "unknown strategy '{other}', expected one of {}",
                    StrategyConfig::KINDS.join(", ")
                ),
            ));
        }
    };
    Ok(strategy)
}

/// Annual risk-free rate from `[backtest]`, in [0, 1).
pub fn risk_free_rate(config: &dyn ConfigPort) -> Result<f64, SigtraceError> {
    let value = parse_or(config, BACKTEST, "risk_free_rate", DEFAULT_RISK_FREE_RATE)?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            BACKTEST,
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::error::ConfigError;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn missing_kind() {
        let err = build_strategy_config(&adapter("[strategy]\nshort_window = 5\n")).unwrap_err();
        assert!(matches!(err, SigtraceError::ConfigMissing { ref key, .. } if key == "kind"));
    }

    #[test]
    fn unknown_kind() {
        let err = build_strategy_config(&adapter("[strategy]\nkind = macd\n")).unwrap_err();
        assert!(matches!(err, SigtraceError::ConfigInvalid { ref key, .. } if key == "kind"));
        assert!(err.to_string().contains("macd"));
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = build_strategy_config(&adapter("[strategy]\nkind = ma_crossover\n")).unwrap();
        assert_eq!(
            config,
            StrategyConfig::MaCrossover(MaCrossoverConfig::default())
        );
    }

    #[test]
    fn ma_crossover_with_ema() {
        let config = build_strategy_config(&adapter(
            "[strategy]\nkind = ma_crossover\nshort_window = 12\nlong_window = 26\nma_type = ema\n",
        ))
        .unwrap();
        let StrategyConfig::MaCrossover(c) = config else {
            panic!("wrong variant");
        };
        assert_eq!(c.short_window(), 12);
        assert_eq!(c.long_window(), 26);
        assert_eq!(c.ma_kind(), MaKind::Exponential);
    }

    #[test]
    fn multi_ma_windows_list() {
        let config = build_strategy_config(&adapter(
            "[strategy]\nkind = multi_ma\nwindows = 50, 10, 20\n",
        ))
        .unwrap();
        let StrategyConfig::MultiMa(c) = config else {
            panic!("wrong variant");
        };
        assert_eq!(c.windows(), &[10, 20, 50]);
    }

    #[test]
    fn each_kind_builds() {
        for kind in StrategyConfig::KINDS {
            let config = build_strategy_config(&adapter(&format!("[strategy]\nkind = {kind}\n")))
                .unwrap();
            assert_eq!(config.kind(), kind);
            assert!(config.build().is_ok());
        }
    }

    #[test]
    fn unparsable_value_is_invalid() {
        let err = build_strategy_config(&adapter(
            "[strategy]\nkind = rsi_threshold\noversold = low\n",
        ))
        .unwrap_err();
        assert!(matches!(err, SigtraceError::ConfigInvalid { ref key, .. } if key == "oversold"));

        let err = build_strategy_config(&adapter(
            "[strategy]\nkind = multi_ma\nwindows = 5,x\n",
        ))
        .unwrap_err();
        assert!(matches!(err, SigtraceError::ConfigInvalid { ref key, .. } if key == "windows"));
    }

    #[test]
    fn unsupported_ma_type() {
        let err = build_strategy_config(&adapter("[strategy]\nkind = zscore\nma_type = WMA\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            SigtraceError::Config(ConfigError::UnsupportedMaKind(ref kind)) if kind == "WMA"
        ));
    }

    #[test]
    fn constraint_violation_surfaces_config_error() {
        let err = build_strategy_config(&adapter(
            "[strategy]\nkind = ma_crossover\nshort_window = 30\nlong_window = 10\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            SigtraceError::Config(ConfigError::WindowOrder { short: 30, long: 10 })
        ));
    }

    #[test]
    fn risk_free_rate_default_and_range() {
        assert_eq!(risk_free_rate(&adapter("[strategy]\n")).unwrap(), 0.02);
        assert_eq!(
            risk_free_rate(&adapter("[backtest]\nrisk_free_rate = 0.05\n")).unwrap(),
            0.05
        );
        assert!(risk_free_rate(&adapter("[backtest]\nrisk_free_rate = 1.5\n")).is_err());
        assert!(risk_free_rate(&adapter("[backtest]\nrisk_free_rate = -0.1\n")).is_err());
    }
}
