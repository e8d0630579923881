//! HTML rendering of the snapshot table.

use std::fmt::Write as _;

use super::escape_text;
use crate::models::{SnapshotCell, SnapshotTable};

pub const INSTRUMENT_HEADER: &str = "Instrument";

fn cell_class(cell: &SnapshotCell) -> &'static str {
    match cell {
        SnapshotCell::Number(_) => "num",
        SnapshotCell::Date(_) => "date",
        SnapshotCell::Text(_) => "text",
        SnapshotCell::Missing => "missing",
    }
}

/// One `<table>`: the instrument column, then one column per label.
pub fn snapshot_html(table: &SnapshotTable) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<table class='snapshot'>");
    let _ = writeln!(html, "  <thead>");
    let _ = write!(html, "    <tr><th>{}</th>", INSTRUMENT_HEADER);
    for column in table.columns() {
        let _ = write!(html, "<th>{}</th>", escape_text(column));
    }
    let _ = writeln!(html, "</tr>");
    let _ = writeln!(html, "  </thead>");
    let _ = writeln!(html, "  <tbody>");
    for row in table.rows() {
        let _ = write!(html, "    <tr><th scope='row'>{}</th>", escape_text(&row.instrument));
        for cell in &row.cells {
            let _ = write!(
                html,
                "<td class='{}'>{}</td>",
                cell_class(cell),
                escape_text(&cell.to_string())
            );
        }
        let _ = writeln!(html, "</tr>");
    }
    let _ = writeln!(html, "  </tbody>");
    let _ = writeln!(html, "</table>");
    html
}
