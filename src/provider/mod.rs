//! Remote market-data access.
//!
//! The fetcher talks to a [`DataProvider`]; [`DatastreamClient`] is the
//! production implementation backed by the Datastream Web Service.

pub mod credentials;
pub mod datastream;

pub use credentials::Credentials;
pub use datastream::DatastreamClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{SeriesTable, SnapshotRecord};

/// Time-series query over a relative or absolute start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesRequest {
    pub instruments: Vec<String>,
    /// Relative (`-2Y`) or absolute (`2024-01-31`) start date.
    pub start: String,
    pub end: Option<NaiveDate>,
    /// Datatypes to request; empty means the provider's default series.
    pub fields: Vec<String>,
}

/// Static (latest value) query for a set of datatypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub instruments: Vec<String>,
    pub fields: Vec<String>,
}

/// Source of time series and static snapshots.
pub trait DataProvider: Send {
    /// Date-indexed values for every requested instrument.
    fn time_series(&self, request: &TimeSeriesRequest) -> Result<SeriesTable>;

    /// Long-format `(instrument, datatype, value)` rows.
    fn snapshot(&self, request: &SnapshotRequest) -> Result<Vec<SnapshotRecord>>;
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn time_series(&self, request: &TimeSeriesRequest) -> Result<SeriesTable> {
        (**self).time_series(request)
    }

    fn snapshot(&self, request: &SnapshotRequest) -> Result<Vec<SnapshotRecord>> {
        (**self).snapshot(request)
    }
}
