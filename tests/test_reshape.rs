//! Snapshot pivot tests.

use commodity_overview::catalog::FieldSpec;
use commodity_overview::models::{SnapshotCell, SnapshotRecord};
use commodity_overview::reshape::pivot_snapshot;
use commodity_overview::DashboardError;

const TWO_FIELDS: &[FieldSpec] = &[
    FieldSpec { code: "F1", label: "Name" },
    FieldSpec { code: "F2", label: "Current" },
];

fn text(s: &str) -> SnapshotCell {
    SnapshotCell::Text(s.to_string())
}

#[test]
fn two_instruments_two_fields_pivot_to_wide_table() {
    let records = vec![
        SnapshotRecord::new("GOLDBLN", "F1", text("Gold Bullion")),
        SnapshotRecord::new("GOLDBLN", "F2", SnapshotCell::Number(2410.5)),
        SnapshotRecord::new("SILVERH", "F1", text("Silver")),
        SnapshotRecord::new("SILVERH", "F2", SnapshotCell::Number(29.1)),
    ];

    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.columns(), &["Name".to_string(), "Current".to_string()]);
    assert_eq!(table.instruments(), vec!["GOLDBLN", "SILVERH"]);
    assert_eq!(table.get("GOLDBLN", "Current"), Some(&SnapshotCell::Number(2410.5)));
    assert_eq!(table.name_of("SILVERH").as_deref(), Some("Silver"));
}

#[test]
fn column_order_follows_field_spec_not_response() {
    let records = vec![
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(1.0)),
        SnapshotRecord::new("A", "F1", text("Alpha")),
    ];
    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.rows()[0].cells, vec![text("Alpha"), SnapshotCell::Number(1.0)]);
}

#[test]
fn unrequested_datatypes_are_dropped() {
    let records = vec![
        SnapshotRecord::new("A", "F1", text("Alpha")),
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(1.0)),
        SnapshotRecord::new("A", "EXTRA", SnapshotCell::Number(9.0)),
    ];
    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.rows()[0].cells.len(), 2);
}

#[test]
fn partially_missing_instrument_gets_missing_cells() {
    let records = vec![
        SnapshotRecord::new("A", "F1", text("Alpha")),
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(1.0)),
        SnapshotRecord::new("B", "F1", text("Beta")),
    ];
    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("B", "Current"), Some(&SnapshotCell::Missing));
    assert!(table.row("C").is_none());
}

#[test]
fn empty_response_yields_empty_table_with_columns() {
    let table = pivot_snapshot(&[], TWO_FIELDS).unwrap();
    assert!(table.is_empty());
    assert!(table.has_column("Name"));
    assert!(table.has_column("Current"));
}

#[test]
fn field_absent_from_whole_response_is_an_error() {
    let records = vec![SnapshotRecord::new("A", "F1", text("Alpha"))];
    let err = pivot_snapshot(&records, TWO_FIELDS).unwrap_err();
    assert!(matches!(err, DashboardError::Provider(msg) if msg.contains("F2")));
}

#[test]
fn name_of_skips_missing_and_blank_names() {
    let records = vec![
        SnapshotRecord::new("A", "F1", SnapshotCell::Missing),
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(1.0)),
        SnapshotRecord::new("B", "F1", text("  ")),
    ];
    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.name_of("A"), None);
    assert_eq!(table.name_of("B"), None);
}

#[test]
fn duplicate_record_keeps_last_value() {
    let records = vec![
        SnapshotRecord::new("A", "F1", text("Alpha")),
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(1.0)),
        SnapshotRecord::new("A", "F2", SnapshotCell::Number(2.0)),
    ];
    let table = pivot_snapshot(&records, TWO_FIELDS).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("A", "Current"), Some(&SnapshotCell::Number(2.0)));
}
