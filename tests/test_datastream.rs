//! Datastream wire-format and credentials tests (no network).

use std::io::Write;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use commodity_overview::models::{SeriesKey, SnapshotCell};
use commodity_overview::provider::datastream::{
    parse_json_date, series_from_response, snapshot_from_response, snapshot_request,
    time_series_request, DataResponse,
};
use commodity_overview::provider::{SnapshotRequest, TimeSeriesRequest};
use commodity_overview::{Credentials, DashboardError, DatastreamClient};
use serde_json::json;

fn response(value: serde_json::Value) -> DataResponse {
    serde_json::from_value(value).unwrap()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

#[test]
fn json_date_with_offset() {
    let dt = parse_json_date("/Date(1704067200000+0000)/").unwrap();
    assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn json_date_without_offset() {
    let dt = parse_json_date("/Date(1565568000000)/").unwrap();
    assert_eq!(dt.year(), 2019);
    assert_eq!(dt.month(), 8);
    assert_eq!(dt.day(), 12);
}

#[test]
fn malformed_json_dates_are_rejected() {
    assert!(parse_json_date("2024-01-01").is_none());
    assert!(parse_json_date("/Date()/").is_none());
    assert!(parse_json_date("/Date(abc)/").is_none());
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn time_series_request_wire_shape() {
    let request = TimeSeriesRequest {
        instruments: vec!["GOLDBLN".into(), "SILVERH".into()],
        start: "-2Y".into(),
        end: NaiveDate::from_ymd_opt(2026, 10, 19),
        fields: Vec::new(),
    };
    let body = serde_json::to_value(time_series_request(&request)).unwrap();

    assert_eq!(body["Instrument"]["Value"], "GOLDBLN,SILVERH");
    assert_eq!(body["Instrument"]["Properties"][0]["Key"], "IsSymbolSet");
    assert_eq!(body["Instrument"]["Properties"][0]["Value"], true);
    assert_eq!(body["DataTypes"], json!([]));
    assert_eq!(body["Date"]["Start"], "-2Y");
    assert_eq!(body["Date"]["End"], "2026-10-19");
    assert_eq!(body["Date"]["Frequency"], "D");
    assert_eq!(body["Date"]["Kind"], 1);
}

#[test]
fn snapshot_request_wire_shape() {
    let request = SnapshotRequest {
        instruments: vec!["LCPCASH".into()],
        fields: vec!["NAME".into(), "X".into()],
    };
    let body = serde_json::to_value(snapshot_request(&request)).unwrap();

    assert_eq!(body["Instrument"]["Value"], "LCPCASH");
    assert_eq!(body["DataTypes"][0]["Value"], "NAME");
    assert_eq!(body["DataTypes"][1]["Value"], "X");
    assert_eq!(body["Date"]["Kind"], 0);
    assert_eq!(body["Date"]["Start"], "");
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn series_response_decodes_columns_in_order() {
    let resp = response(json!({
        "Dates": ["/Date(1704067200000+0000)/", "/Date(1704153600000+0000)/"],
        "DataTypeValues": [{
            "DataType": "",
            "SymbolValues": [
                {"Symbol": "GOLDBLN", "Type": 4, "Value": [2063.7, null]},
                {"Symbol": "SILVERH", "Type": 4, "Value": [23.8, 23.6]}
            ]
        }]
    }));
    let table = series_from_response(&resp).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.width(), 2);
    assert_eq!(table.columns()[0].key, SeriesKey::new("GOLDBLN"));
    assert_eq!(table.columns()[0].values, vec![Some(2063.7), None]);
    assert_eq!(table.observations(0).len(), 1);
    assert_eq!(table.observations(1).len(), 2);
}

#[test]
fn series_response_keeps_datatype_in_key() {
    let resp = response(json!({
        "Dates": ["/Date(1704067200000+0000)/"],
        "DataTypeValues": [{
            "DataType": "X",
            "SymbolValues": [{"Symbol": "LCPCASH", "Type": 4, "Value": [8500.0]}]
        }]
    }));
    let table = series_from_response(&resp).unwrap();
    let key = SeriesKey::with_field("LCPCASH", "X");
    assert!(table.column(&key).is_some());
    assert_eq!(key.to_string(), "LCPCASH(X)");
}

#[test]
fn errored_symbol_becomes_all_missing() {
    let resp = response(json!({
        "Dates": ["/Date(1704067200000+0000)/", "/Date(1704153600000+0000)/"],
        "DataTypeValues": [{
            "DataType": "",
            "SymbolValues": [
                {"Symbol": "BADTICK", "Type": 0, "Value": "$$ER: E100,INVALID CODE OR EXPRESSION ENTERED"}
            ]
        }]
    }));
    let table = series_from_response(&resp).unwrap();
    assert_eq!(table.columns()[0].values, vec![None, None]);
    assert!(table.observations(0).is_empty());
}

#[test]
fn unparseable_series_date_is_a_provider_error() {
    let resp = response(json!({"Dates": ["yesterday"], "DataTypeValues": []}));
    assert!(matches!(
        series_from_response(&resp),
        Err(DashboardError::Provider(_))
    ));
}

#[test]
fn empty_series_response_is_an_empty_table() {
    let table = series_from_response(&DataResponse::default()).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.width(), 0);
}

#[test]
fn snapshot_response_decodes_typed_cells() {
    let resp = response(json!({
        "Dates": ["/Date(1760832000000+0000)/"],
        "DataTypeValues": [
            {"DataType": "NAME", "SymbolValues": [
                {"Symbol": "GOLDBLN", "Type": 6, "Value": "Gold Bullion LBM $/t oz"}
            ]},
            {"DataType": "X", "SymbolValues": [
                {"Symbol": "GOLDBLN", "Type": 2, "Value": 2410.5}
            ]},
            {"DataType": "MAXD#(X,-1Y)", "SymbolValues": [
                {"Symbol": "GOLDBLN", "Type": 3, "Value": "/Date(1709251200000+0000)/"}
            ]},
            {"DataType": "PCH#(X,-1M)", "SymbolValues": [
                {"Symbol": "GOLDBLN", "Type": 0, "Value": "$$ER: 0904,NO DATA AVAILABLE"}
            ]}
        ]
    }));
    let records = snapshot_from_response(&resp);

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].datatype, "NAME");
    assert_eq!(
        records[0].value,
        SnapshotCell::Text("Gold Bullion LBM $/t oz".into())
    );
    assert_eq!(records[1].value, SnapshotCell::Number(2410.5));
    assert_eq!(
        records[2].value,
        SnapshotCell::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
    assert!(records[3].value.is_missing());
}

// ---------------------------------------------------------------------------
// Client and credentials
// ---------------------------------------------------------------------------

#[test]
fn client_trims_trailing_slash_from_base_url() {
    let client = DatastreamClient::new(
        Credentials::new("user", "secret"),
        Some("http://127.0.0.1:9/rest/".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9/rest");
    assert_eq!(client.timeout(), Duration::from_secs(5));
}

#[test]
fn closed_client_refuses_requests() {
    let mut client = DatastreamClient::new(
        Credentials::new("user", "secret"),
        Some("http://127.0.0.1:9/rest".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    client.close();
    let request = snapshot_request(&SnapshotRequest {
        instruments: vec!["GOLDBLN".into()],
        fields: vec!["X".into()],
    });
    assert!(matches!(
        client.get_data(&request),
        Err(DashboardError::InvalidArgument(_))
    ));
}

#[test]
fn credentials_debug_redacts_password() {
    let creds = Credentials::new("analyst", "hunter2");
    let debug = format!("{creds:?}");
    assert!(debug.contains("analyst"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn credentials_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"username": "analyst", "password": "hunter2"}}"#).unwrap();
    let creds = Credentials::from_file(file.path()).unwrap();
    assert_eq!(creds.username, "analyst");
    assert_eq!(creds.password, "hunter2");
}

#[test]
fn credentials_file_with_blank_password_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"username": "analyst", "password": ""}}"#).unwrap();
    assert!(matches!(
        Credentials::from_file(file.path()),
        Err(DashboardError::Auth(_))
    ));
}
