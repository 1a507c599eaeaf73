//! Domain error types.

/// Invalid strategy parameters. Raised at construction and whenever a
/// configuration value is rebuilt; never recovered automatically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("short window ({short}) must be less than long window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("at least 2 moving-average windows are required, got {count}")]
    TooFewWindows { count: usize },

    #[error("{name} must be within [0, 100], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("oversold threshold ({oversold}) must be less than overbought threshold ({overbought})")]
    ThresholdOrder { oversold: f64, overbought: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("unsupported moving average type: {0} (expected SMA or EMA)")]
    UnsupportedMaKind(String),
}

/// A fault raised while generating the signal for a single bar. The runner
/// substitutes HOLD for the bar and keeps going.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("non-finite close price {value} at bar {index}")]
    NonFinitePrice { index: usize, value: f64 },
}

/// Top-level error type for sigtrace.
#[derive(Debug, thiserror::Error)]
pub enum SigtraceError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no bars in {source_name}")]
    NoData { source_name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraceError> for std::process::ExitCode {
    fn from(err: &SigtraceError) -> Self {
        let code: u8 = match err {
            SigtraceError::Io(_) => 1,
            SigtraceError::ConfigParse { .. }
            | SigtraceError::ConfigMissing { .. }
            | SigtraceError::ConfigInvalid { .. }
            | SigtraceError::Config(_) => 2,
            SigtraceError::Data { .. } | SigtraceError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
