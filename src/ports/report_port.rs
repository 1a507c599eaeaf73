//! Trace output port trait.

use crate::domain::error::SigtraceError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::runner::RunResult;

/// Port for writing run traces and indicator frames.
pub trait ReportPort {
    fn write_trace(&self, result: &RunResult, output_path: &str) -> Result<(), SigtraceError>;

    fn write_indicators(
        &self,
        frame: &IndicatorFrame,
        output_path: &str,
    ) -> Result<(), SigtraceError>;
}
