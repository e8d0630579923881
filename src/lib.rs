//! Commodity overview dashboard.
//!
//! Fetches price history and reference data for a fixed catalog of commodity
//! instruments from Refinitiv Datastream, fits a linear trend to each series,
//! and renders a 4×3 grid of charts (SVG) with a summary table (HTML).
//!
//! # Quick start
//!
//! ```no_run
//! use commodity_overview::{CommodityDashboard, PageSelection, TimeRange};
//!
//! // Credentials come from DSWS_USERNAME / DSWS_PASSWORD.
//! let mut dashboard = CommodityDashboard::builder().build().unwrap();
//!
//! let selection = PageSelection {
//!     category: "Metals".to_string(),
//!     time_range: TimeRange::TwoYears,
//! };
//! let html = dashboard.page(&selection).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod page;
pub mod provider;
pub mod render;
pub mod reshape;
pub mod time_range;
pub mod trend;

#[cfg(feature = "async")]
pub use async_client::AsyncCommodityDashboard;
pub use cache::{FetchCache, FetchKey, FetchResult};
pub use catalog::{Category, FieldSpec};
pub use error::{DashboardError, Result};
pub use fetcher::Fetcher;
pub use page::{PageQuery, PageSelection};
pub use provider::{Credentials, DataProvider, DatastreamClient};
pub use render::RenderedDashboard;
pub use time_range::TimeRange;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CommodityDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CommodityDashboard`].
///
/// Use [`CommodityDashboard::builder()`] to obtain a builder.
pub struct CommodityDashboardBuilder {
    credentials: Option<Credentials>,
    base_url: Option<String>,
    timeout: Duration,
    provider: Option<Box<dyn DataProvider>>,
}

impl Default for CommodityDashboardBuilder {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            provider: None,
        }
    }
}

impl CommodityDashboardBuilder {
    /// Datastream credentials.
    ///
    /// If not set, [`Credentials::resolve()`] reads them from the environment
    /// or the per-user credentials file.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the DSWS endpoint (defaults to `DSWS_BASE_URL` or the public service).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom data provider instead of Datastream.
    ///
    /// Credentials, base URL and timeout are ignored when a provider is given.
    pub fn provider<P: DataProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn build(self) -> Result<CommodityDashboard> {
        let provider: Box<dyn DataProvider> = match self.provider {
            Some(provider) => provider,
            None => {
                let credentials = match self.credentials {
                    Some(c) => c,
                    None => Credentials::resolve()?,
                };
                Box::new(DatastreamClient::new(credentials, self.base_url, self.timeout)?)
            }
        };
        Ok(CommodityDashboard {
            fetcher: Fetcher::new(provider),
        })
    }
}

// ---------------------------------------------------------------------------
// CommodityDashboard
// ---------------------------------------------------------------------------

/// Catalog lookup, memoized fetching and rendering behind one handle.
pub struct CommodityDashboard {
    fetcher: Fetcher<Box<dyn DataProvider>>,
}

impl CommodityDashboard {
    pub fn builder() -> CommodityDashboardBuilder {
        CommodityDashboardBuilder::default()
    }

    /// Fetch a category's tables.
    ///
    /// The summary fields come from the catalog entry for `category`, or the
    /// standard summary fields when the category is not in the catalog.
    pub fn fetch(
        &mut self,
        category: &str,
        instruments: &[String],
        time_range: &str,
    ) -> Result<Arc<FetchResult>> {
        let fields = catalog::lookup(category)
            .map(|c| c.fields())
            .unwrap_or(catalog::SUMMARY_FIELDS);
        self.fetcher.fetch(category, instruments, fields, time_range)
    }

    /// Fetch a catalog category by name.
    pub fn fetch_category(&mut self, category: &str, time_range: &str) -> Result<Arc<FetchResult>> {
        let entry = catalog::lookup(category)?;
        self.fetcher
            .fetch(entry.name, &entry.instrument_ids(), entry.fields(), time_range)
    }

    /// Render fetched tables.
    pub fn render(&self, result: &FetchResult) -> RenderedDashboard {
        render::render(&result.category, &result.snapshot, &result.series)
    }

    /// Fetch and render the selection, returning the full HTML page.
    pub fn page(&mut self, selection: &PageSelection) -> Result<String> {
        let result = self.fetch_category(&selection.category, selection.time_range.token())?;
        let rendered = self.render(&result);
        Ok(page::render_page(selection, &rendered))
    }

    /// Drop the memoized result for one exact fetch key.
    pub fn invalidate(&mut self, key: &FetchKey) -> bool {
        self.fetcher.cache_mut().invalidate(key)
    }

    /// Drop every memoized result for a category.
    pub fn invalidate_category(&mut self, category: &str) -> usize {
        self.fetcher.cache_mut().invalidate_category(category)
    }

    pub fn clear_cache(&mut self) {
        self.fetcher.cache_mut().clear();
    }

    pub fn cached_entries(&self) -> Vec<FetchKey> {
        self.fetcher.cache().keys()
    }

    pub fn fetcher(&self) -> &Fetcher<Box<dyn DataProvider>> {
        &self.fetcher
    }
}

impl fmt::Display for CommodityDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommodityDashboard(categories={}, cached={})",
            catalog::categories().len(),
            self.fetcher.cache().len()
        )
    }
}
