//! Shared test fixtures for the dashboard integration tests.
//!
//! Provides `FakeProvider`, an in-memory `DataProvider` that synthesizes
//! series and snapshot rows for whatever instruments it is asked about and
//! records every request it receives.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use commodity_overview::models::{SeriesKey, SeriesTable, SnapshotCell, SnapshotRecord};
use commodity_overview::provider::{DataProvider, SnapshotRequest, TimeSeriesRequest};
use commodity_overview::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TimeSeries(TimeSeriesRequest),
    Snapshot(SnapshotRequest),
}

#[derive(Clone, Default)]
pub struct FakeProvider {
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Instruments whose series come back entirely missing.
    pub empty_series: HashSet<String>,
    /// Instruments left out of the snapshot response.
    pub absent_from_snapshot: HashSet<String>,
    pub fail: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_series(mut self, instrument: &str) -> Self {
        self.empty_series.insert(instrument.to_string());
        self
    }

    pub fn without_snapshot_row(mut self, instrument: &str) -> Self {
        self.absent_from_snapshot.insert(instrument.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Display name the fake reports for an instrument.
pub fn fake_name(instrument: &str) -> String {
    format!("{} Spot", instrument)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Six month-end dates in 2024.
pub fn sample_dates() -> Vec<NaiveDate> {
    vec![
        date(2024, 1, 31),
        date(2024, 2, 29),
        date(2024, 3, 29),
        date(2024, 4, 30),
        date(2024, 5, 31),
        date(2024, 6, 28),
    ]
}

impl DataProvider for FakeProvider {
    fn time_series(&self, request: &TimeSeriesRequest) -> Result<SeriesTable> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::TimeSeries(request.clone()));
        if self.fail {
            return Err(DashboardError::Provider("fake outage".into()));
        }

        let dates = sample_dates();
        let mut table = SeriesTable::new(dates.clone());
        for (i, instrument) in request.instruments.iter().enumerate() {
            let values = if self.empty_series.contains(instrument) {
                vec![None; dates.len()]
            } else {
                (0..dates.len())
                    .map(|k| Some(100.0 + i as f64 + k as f64 * 2.0))
                    .collect()
            };
            table
                .push_column(SeriesKey::new(instrument.as_str()), values)
                .unwrap();
        }
        Ok(table)
    }

    fn snapshot(&self, request: &SnapshotRequest) -> Result<Vec<SnapshotRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Snapshot(request.clone()));
        if self.fail {
            return Err(DashboardError::Provider("fake outage".into()));
        }

        let mut records = Vec::new();
        for instrument in &request.instruments {
            if self.absent_from_snapshot.contains(instrument) {
                continue;
            }
            for field in &request.fields {
                let value = match field.as_str() {
                    "NAME" => SnapshotCell::Text(fake_name(instrument)),
                    "MAXD#(X,-1Y)" | "MIND#(X,-1Y)" => SnapshotCell::Date(date(2024, 3, 1)),
                    _ => SnapshotCell::Number(42.5),
                };
                records.push(SnapshotRecord::new(instrument.as_str(), field.as_str(), value));
            }
        }
        Ok(records)
    }
}

/// Build a one-column series table from optional values over `sample_dates()`.
pub fn single_series(instrument: &str, values: Vec<Option<f64>>) -> SeriesTable {
    let mut dates = sample_dates();
    dates.truncate(values.len());
    let mut table = SeriesTable::new(dates);
    table.push_column(SeriesKey::new(instrument), values).unwrap();
    table
}
