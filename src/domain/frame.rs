//! Columnar enrichment of a bar series, as produced by
//! `Strategy::add_indicators`.

use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Values(Vec<Option<f64>>),
    Labels(Vec<&'static str>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Values(v) => v.len(),
            ColumnData::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell rendered for tabular output; undefined values render empty.
    pub fn cell(&self, row: usize) -> String {
        match self {
            ColumnData::Values(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|x| x.to_string())
                .unwrap_or_default(),
            ColumnData::Labels(v) => v.get(row).map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub name: String,
    pub data: ColumnData,
}

/// Threshold zone of an oscillator reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Neutral,
    Oversold,
    Overbought,
}

impl Zone {
    /// Classifies `value` against inclusive thresholds. Undefined is neutral.
    pub fn classify(value: Option<f64>, lower: f64, upper: f64) -> Zone {
        match value {
            Some(v) if v <= lower => Zone::Oversold,
            Some(v) if v >= upper => Zone::Overbought,
            _ => Zone::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Neutral => "NEUTRAL",
            Zone::Oversold => "OVERSOLD",
            Zone::Overbought => "OVERBOUGHT",
        }
    }
}

/// The original bars plus named indicator columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    columns: Vec<IndicatorColumn>,
}

impl IndicatorFrame {
    pub fn new(bars: &[Bar]) -> Self {
        Self {
            bars: bars.to_vec(),
            columns: Vec::new(),
        }
    }

    /// Adds or replaces a numeric column.
    pub fn with_values(self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.with_column(name.into(), ColumnData::Values(values))
    }

    /// Adds or replaces a column holding the same value on every row.
    pub fn with_constant(self, name: impl Into<String>, value: f64) -> Self {
        let values = vec![Some(value); self.bars.len()];
        self.with_values(name, values)
    }

    /// Adds or replaces a label column.
    pub fn with_labels(self, name: impl Into<String>, labels: Vec<&'static str>) -> Self {
        self.with_column(name.into(), ColumnData::Labels(labels))
    }

    fn with_column(mut self, name: String, data: ColumnData) -> Self {
        debug_assert_eq!(data.len(), self.bars.len(), "column {name} length mismatch");
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(IndicatorColumn { name, data }),
        }
        self
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&IndicatorColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Values(v) => Some(v),
            ColumnData::Labels(_) => None,
        }
    }

    pub fn labels(&self, name: &str) -> Option<&[&'static str]> {
        match &self.column(name)?.data {
            ColumnData::Labels(v) => Some(v),
            ColumnData::Values(_) => None,
        }
    }
}
