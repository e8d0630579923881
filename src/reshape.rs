//! Long-to-wide pivot of static snapshot records.

use std::collections::{HashMap, HashSet};

use crate::catalog::FieldSpec;
use crate::error::{DashboardError, Result};
use crate::models::{SnapshotCell, SnapshotRecord, SnapshotTable};

/// Pivot `(instrument, datatype, value)` rows into one row per instrument.
///
/// Rows keep the order instruments first appear in; columns follow `fields`
/// and carry their display labels. Datatypes outside `fields` are dropped and
/// absent cells are [`SnapshotCell::Missing`]. A repeated `(instrument,
/// datatype)` pair keeps its last value and is logged. A non-empty response
/// that carries no values at all for one of `fields` is an error.
pub fn pivot_snapshot(records: &[SnapshotRecord], fields: &[FieldSpec]) -> Result<SnapshotTable> {
    let labels: Vec<String> = fields.iter().map(|f| f.label.to_string()).collect();
    let mut table = SnapshotTable::new(labels);
    if records.is_empty() {
        return Ok(table);
    }

    let column_of: HashMap<&str, usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.code, i))
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut cells: HashMap<&str, Vec<SnapshotCell>> = HashMap::new();
    let mut seen = vec![false; fields.len()];
    let mut filled: HashSet<(&str, usize)> = HashSet::new();

    for record in records {
        let Some(&col) = column_of.get(record.datatype.as_str()) else {
            continue;
        };
        seen[col] = true;
        let row = cells.entry(record.instrument.as_str()).or_insert_with(|| {
            order.push(record.instrument.as_str());
            vec![SnapshotCell::Missing; fields.len()]
        });
        if !filled.insert((record.instrument.as_str(), col)) {
            tracing::warn!(
                instrument = %record.instrument,
                datatype = %record.datatype,
                "duplicate snapshot record; keeping the later value"
            );
        }
        row[col] = record.value.clone();
    }

    if let Some(missing) = fields.iter().zip(&seen).find(|(_, seen)| !**seen) {
        return Err(DashboardError::Provider(format!(
            "Snapshot response has no column for field {}",
            missing.0.code
        )));
    }

    for instrument in order {
        if let Some(row) = cells.remove(instrument) {
            table.push_row(instrument, row);
        }
    }
    Ok(table)
}
