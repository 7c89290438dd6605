use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::year::{is_platform_year, PLATFORM_YEARS};

/// A single table cell.
///
/// Source data holds numbers, but a cell being edited keeps the text the user
/// typed (e.g. `"3."`) until it is complete, so both forms are carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric reading of the cell; text cells are parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => esd_utils::numeric::parse_lenient(s),
        }
    }

    /// True only for a numeric zero. Text cells, even `""`, are not zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, CellValue::Number(n) if *n == 0.0)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One named, unit-tagged time series: a row of the data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub indicator: String,
    pub unit: String,
    /// Year key (e.g. `"2030"`) to cell value, ordered by year.
    #[serde(default)]
    pub values: BTreeMap<String, CellValue>,
}

impl IndicatorRow {
    pub fn new(indicator: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            indicator: indicator.into(),
            unit: unit.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert of one year's value.
    pub fn with_value(mut self, year: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(year.into(), value.into());
        self
    }

    /// Numeric value at `year`, if present and numeric-like.
    pub fn numeric(&self, year: &str) -> Option<f64> {
        self.values.get(year).and_then(CellValue::as_f64)
    }

    /// Year keys in ascending order.
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Whether the year keys are exactly the platform year sequence.
    pub fn covers_platform_years(&self) -> bool {
        self.values.len() == PLATFORM_YEARS.len() && self.values.keys().all(|y| is_platform_year(y))
    }

    /// Whether the row has at least one value that is not a numeric zero.
    pub fn has_nonzero_value(&self) -> bool {
        self.values.values().any(|v| !v.is_zero())
    }
}
