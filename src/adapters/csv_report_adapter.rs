//! CSV trace writer implementing ReportPort.
//!
//! Traces keep the input columns and append `signal`, `position`,
//! `unrealized_pnl` and `strategy`. Indicator frames append one column per
//! indicator; undefined values are written as empty cells.

use std::fs;
use std::path::Path;

use crate::domain::error::SigtraceError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::ohlcv::Bar;
use crate::domain::runner::RunResult;
use crate::ports::report_port::ReportPort;

const BAR_HEADERS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> SigtraceError {
    SigtraceError::Io(std::io::Error::other(e.to_string()))
}

fn writer(output_path: &str) -> Result<csv::Writer<fs::File>, SigtraceError> {
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    csv::Writer::from_path(path).map_err(csv_error)
}

fn bar_fields(bar: &Bar) -> Vec<String> {
    vec![
        bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        bar.open.to_string(),
        bar.high.to_string(),
        bar.low.to_string(),
        bar.close.to_string(),
        bar.volume.to_string(),
    ]
}

impl ReportPort for CsvReportAdapter {
    fn write_trace(&self, result: &RunResult, output_path: &str) -> Result<(), SigtraceError> {
        let mut wtr = writer(output_path)?;

        let mut header: Vec<&str> = BAR_HEADERS.to_vec();
        header.extend(["signal", "position", "unrealized_pnl", "strategy"]);
        wtr.write_record(&header).map_err(csv_error)?;

        for row in &result.rows {
            let mut fields = bar_fields(&row.bar);
            fields.push(row.signal.code().to_string());
            fields.push(row.position.code().to_string());
            fields.push(row.unrealized_pnl.to_string());
            fields.push(result.strategy_name.clone());
            wtr.write_record(&fields).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_indicators(
        &self,
        frame: &IndicatorFrame,
        output_path: &str,
    ) -> Result<(), SigtraceError> {
        let mut wtr = writer(output_path)?;

        let mut header: Vec<&str> = BAR_HEADERS.to_vec();
        header.extend(frame.column_names());
        wtr.write_record(&header).map_err(csv_error)?;

        for (i, bar) in frame.bars().iter().enumerate() {
            let mut fields = bar_fields(bar);
            fields.extend(frame.columns().iter().map(|c| c.data.cell(i)));
            wtr.write_record(&fields).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
