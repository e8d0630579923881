use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// SeriesKey: Normalized identity of one time-series column
// ---------------------------------------------------------------------------

/// Identifies a series column by instrument and, when the provider reports
/// one, the datatype it was requested under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    instrument: String,
    field: Option<String>,
}

impl SeriesKey {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            field: None,
        }
    }

    pub fn with_field(instrument: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            field: Some(field.into()),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}({})", self.instrument, field),
            None => f.write_str(&self.instrument),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation: One non-missing value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// SeriesColumn / SeriesTable: Date-indexed values, one column per series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    pub key: SeriesKey,
    pub values: Vec<Option<f64>>,
}

impl SeriesColumn {
    /// Non-missing, finite observations paired with their dates.
    pub fn observations(&self, dates: &[NaiveDate]) -> Vec<Observation> {
        dates
            .iter()
            .zip(&self.values)
            .filter_map(|(date, value)| match value {
                Some(v) if v.is_finite() => Some(Observation {
                    date: *date,
                    value: *v,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Time-series table sharing a single ascending date index across columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<SeriesColumn>,
}

impl SeriesTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Append a column. Its length must match the date index.
    pub fn push_column(&mut self, key: SeriesKey, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.dates.len() {
            return Err(DashboardError::InvalidArgument(format!(
                "Series {} has {} values for {} dates",
                key,
                values.len(),
                self.dates.len()
            )));
        }
        self.columns.push(SeriesColumn { key, values });
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[SeriesColumn] {
        &self.columns
    }

    pub fn column(&self, key: &SeriesKey) -> Option<&SeriesColumn> {
        self.columns.iter().find(|c| &c.key == key)
    }

    /// Number of dates in the index.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of series columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn observations(&self, index: usize) -> Vec<Observation> {
        self.columns
            .get(index)
            .map(|c| c.observations(&self.dates))
            .unwrap_or_default()
    }
}
