//! Fetches the series and snapshot tables for a category, through the memo.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::cache::{FetchCache, FetchKey, FetchResult};
use crate::catalog::FieldSpec;
use crate::error::Result;
use crate::provider::{DataProvider, SnapshotRequest, TimeSeriesRequest};
use crate::reshape::pivot_snapshot;
use crate::time_range::TimeRange;

/// Issues provider requests for a category and memoizes the results.
pub struct Fetcher<P> {
    provider: P,
    cache: FetchCache,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<P: DataProvider> Fetcher<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: FetchCache::new(),
            today: local_today,
        }
    }

    /// Override the clock used for the series end date.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Fetch snapshot and series tables.
    ///
    /// `time_range` falls back to one year when not recognized. Results are
    /// memoized under the exact `(category, instruments, time_range)` arguments,
    /// so a repeated call makes no provider requests.
    pub fn fetch(
        &mut self,
        category: &str,
        instruments: &[String],
        fields: &[FieldSpec],
        time_range: &str,
    ) -> Result<Arc<FetchResult>> {
        let key = FetchKey::new(category, instruments, time_range);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(category, time_range, "fetch cache hit");
            return Ok(hit);
        }
        tracing::debug!(category, time_range, "fetch cache miss");

        let range = TimeRange::resolve(time_range);
        let today = (self.today)();

        let series = self.provider.time_series(&TimeSeriesRequest {
            instruments: instruments.to_vec(),
            start: range.start_expression(),
            end: Some(today),
            fields: Vec::new(),
        })?;

        let records = self.provider.snapshot(&SnapshotRequest {
            instruments: instruments.to_vec(),
            fields: fields.iter().map(|f| f.code.to_string()).collect(),
        })?;
        let snapshot = pivot_snapshot(&records, fields)?;

        let result = Arc::new(FetchResult {
            category: category.to_string(),
            time_range: range,
            fetched_on: today,
            snapshot,
            series,
        });
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut FetchCache {
        &mut self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
