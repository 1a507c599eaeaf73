//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{build_strategy_config, risk_free_rate};
use crate::domain::error::SigtraceError;
use crate::domain::metrics::PerformanceSummary;
use crate::domain::ohlcv::Bar;
use crate::domain::position::StrategyStats;
use crate::domain::runner::Runner;
use crate::domain::strategy::{Strategy, StrategyConfig};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrace", about = "Bar-by-bar trading signal and position tracer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy over a bar series and report the trace
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the strategy's indicator columns for a bar series
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            data,
            output,
        } => run_trace(&config, &data, output.as_deref()),
        Command::Indicators {
            config,
            data,
            output,
        } => run_indicators(&config, &data, &output),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigtraceError> {
    FileConfigAdapter::from_file(path).map_err(|e| SigtraceError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_strategy(config_path: &Path) -> Result<(FileConfigAdapter, StrategyConfig), SigtraceError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let strategy_config = build_strategy_config(&adapter)?;
    Ok((adapter, strategy_config))
}

fn load_bars(data_path: &Path) -> Result<Vec<Bar>, SigtraceError> {
    eprintln!("Loading bars from {}", data_path.display());
    let bars = CsvAdapter::new(PathBuf::new()).read_bars(&data_path.to_string_lossy())?;
    info!(bars = bars.len(), "bars loaded");
    Ok(bars)
}

fn run_trace(config_path: &Path, data_path: &Path, output: Option<&Path>) -> Result<(), SigtraceError> {
    let (adapter, strategy_config) = load_strategy(config_path)?;
    let rf = risk_free_rate(&adapter)?;
    let bars = load_bars(data_path)?;

    let mut runner = Runner::new(strategy_config.build()?);
    eprintln!("Running {} over {} bars", runner.strategy().name(), bars.len());
    let result = runner.run(&bars);

    for fault in &result.faults {
        eprintln!("warning: bar {} ({}): {}", fault.index, fault.timestamp, fault.error);
    }

    print_stats(&runner.stats());
    print_summary(&PerformanceSummary::compute(&result, rf), rf);

    if let Some(output) = output {
        CsvReportAdapter::new().write_trace(&result, &output.to_string_lossy())?;
        eprintln!("\nTrace written to: {}", output.display());
    }
    Ok(())
}

fn run_indicators(config_path: &Path, data_path: &Path, output: &Path) -> Result<(), SigtraceError> {
    let (_, strategy_config) = load_strategy(config_path)?;
    let strategy = strategy_config.build()?;
    let bars = load_bars(data_path)?;

    let frame = strategy.add_indicators(&bars);
    CsvReportAdapter::new().write_indicators(&frame, &output.to_string_lossy())?;
    eprintln!(
        "{} indicator columns for {} written to: {}",
        frame.columns().len(),
        strategy.name(),
        output.display()
    );
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SigtraceError> {
    let (adapter, strategy_config) = load_strategy(config_path)?;
    let rf = risk_free_rate(&adapter)?;
    let strategy = strategy_config.build()?;

    eprintln!("Config validated successfully");
    eprintln!("\nStrategy:");
    eprintln!("  name:           {}", strategy.name());
    eprintln!("  kind:           {}", strategy_config.kind());
    eprintln!("  parameters:     {}", strategy_config);
    eprintln!("  min history:    {} bars", strategy.min_history() + 1);
    eprintln!("  risk-free rate: {:.2}%", rf * 100.0);
    Ok(())
}

fn print_stats(stats: &StrategyStats) {
    eprintln!("\n=== {} ===", stats.strategy_name);
    eprintln!("Parameters:       {}", stats.parameters);
    eprintln!("Signals:          {}", stats.total_signals);
    eprintln!(
        "  BUY:            {} ({:.1}%)",
        stats.buy_signals, stats.buy_signal_rate
    );
    eprintln!(
        "  SELL:           {} ({:.1}%)",
        stats.sell_signals, stats.sell_signal_rate
    );
    eprintln!("  HOLD:           {}", stats.hold_signals);
    eprintln!("Position changes: {}", stats.position_changes);
    eprintln!("Final position:   {}", stats.current_position);
}

fn print_summary(summary: &PerformanceSummary, rf: f64) {
    eprintln!("\n=== Performance (rf {:.2}%) ===", rf * 100.0);
    eprintln!(
        "Buy & Hold:       {:.2}%  (Sharpe {:.2})",
        summary.buy_and_hold_return * 100.0,
        summary.buy_and_hold_sharpe
    );
    eprintln!("Strategy Return:  {:.2}%", summary.strategy_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", summary.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", summary.max_drawdown);
    eprintln!("Volatility:       {:.2}%", summary.volatility * 100.0);
}
