use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SnapshotCell: One static value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum SnapshotCell {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    #[default]
    Missing,
}

impl SnapshotCell {
    pub fn is_missing(&self) -> bool {
        matches!(self, SnapshotCell::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnapshotCell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SnapshotCell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for SnapshotCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotCell::Number(n) => write!(f, "{:.2}", n),
            SnapshotCell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SnapshotCell::Text(s) => f.write_str(s),
            SnapshotCell::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// SnapshotRecord: Long-format provider row (instrument × datatype)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub instrument: String,
    pub datatype: String,
    pub value: SnapshotCell,
}

impl SnapshotRecord {
    pub fn new(
        instrument: impl Into<String>,
        datatype: impl Into<String>,
        value: SnapshotCell,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            datatype: datatype.into(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// SnapshotTable: Wide format, one row per instrument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub instrument: String,
    pub cells: Vec<SnapshotCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTable {
    columns: Vec<String>,
    rows: Vec<SnapshotRow>,
}

impl SnapshotTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating its cells to the column count.
    pub fn push_row(&mut self, instrument: impl Into<String>, mut cells: Vec<SnapshotCell>) {
        cells.resize(self.columns.len(), SnapshotCell::Missing);
        self.rows.push(SnapshotRow {
            instrument: instrument.into(),
            cells,
        });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn instruments(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.instrument.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    pub fn row(&self, instrument: &str) -> Option<&SnapshotRow> {
        self.rows.iter().find(|r| r.instrument == instrument)
    }

    pub fn get(&self, instrument: &str, label: &str) -> Option<&SnapshotCell> {
        let col = self.columns.iter().position(|c| c == label)?;
        self.row(instrument).and_then(|r| r.cells.get(col))
    }

    /// Display name from the `Name` column, if present and non-empty.
    pub fn name_of(&self, instrument: &str) -> Option<String> {
        self.get(instrument, crate::catalog::NAME_LABEL)
            .filter(|cell| !cell.is_missing())
            .map(|cell| cell.to_string())
            .filter(|name| !name.trim().is_empty())
    }
}
