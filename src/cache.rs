//! In-memory memo of fetch results.
//!
//! Entries are keyed by the exact arguments a fetch was called with and never
//! expire on their own: they stay until invalidated or the process exits.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{SeriesTable, SnapshotTable};
use crate::time_range::TimeRange;

/// Exact argument tuple of a fetch call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FetchKey {
    pub category: String,
    pub instruments: Vec<String>,
    /// The token as supplied, before any fallback.
    pub time_range: String,
}

impl FetchKey {
    pub fn new(category: &str, instruments: &[String], time_range: &str) -> Self {
        Self {
            category: category.to_string(),
            instruments: instruments.to_vec(),
            time_range: time_range.to_string(),
        }
    }
}

/// Snapshot and series tables for one category and window.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub category: String,
    pub time_range: TimeRange,
    pub fetched_on: NaiveDate,
    pub snapshot: SnapshotTable,
    pub series: SeriesTable,
}

/// Keyed store of fetch results with explicit invalidation.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<FetchKey, Arc<FetchResult>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FetchKey) -> Option<Arc<FetchResult>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &FetchKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a result, replacing any previous entry for the key.
    pub fn insert(&mut self, key: FetchKey, result: Arc<FetchResult>) {
        self.entries.insert(key, result);
    }

    /// Remove one entry. Returns `true` if it was present.
    pub fn invalidate(&mut self, key: &FetchKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry for a category, whatever its instruments or window.
    pub fn invalidate_category(&mut self, category: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.category != category);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<FetchKey> {
        self.entries.keys().cloned().collect()
    }
}
