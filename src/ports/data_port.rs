//! Bar source port trait.

use crate::domain::error::SigtraceError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// Bars of `source`, oldest first, with strictly increasing timestamps.
    fn read_bars(&self, source: &str) -> Result<Vec<Bar>, SigtraceError>;
}
