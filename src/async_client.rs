//! Async wrapper around [`CommodityDashboard`] for use in async runtimes (Tokio, etc.).
//!
//! Provider requests are blocking HTTP calls, so every operation runs on
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use commodity_overview::{AsyncCommodityDashboard, PageSelection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dashboard = AsyncCommodityDashboard::builder().build().await.unwrap();
//!
//!     let html = dashboard.page(PageSelection::default()).await.unwrap();
//!
//!     // Any sync method via closure
//!     let cached = dashboard.run(|d| Ok(d.cached_entries().len())).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{DashboardError, Result};
use crate::page::PageSelection;
use crate::provider::{Credentials, DataProvider};
use crate::{config, CommodityDashboard};

// ---------------------------------------------------------------------------
// AsyncCommodityDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCommodityDashboard`].
pub struct AsyncCommodityDashboardBuilder {
    credentials: Option<Credentials>,
    base_url: Option<String>,
    timeout: Duration,
    provider: Option<Box<dyn DataProvider>>,
}

impl Default for AsyncCommodityDashboardBuilder {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            provider: None,
        }
    }
}

impl AsyncCommodityDashboardBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider<P: DataProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the dashboard on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCommodityDashboard> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CommodityDashboard::builder().timeout(self.timeout);
            if let Some(credentials) = self.credentials {
                builder = builder.credentials(credentials);
            }
            if let Some(url) = self.base_url {
                builder = builder.base_url(url);
            }
            if let Some(provider) = self.provider {
                builder = builder.provider(provider);
            }
            let dashboard = builder.build()?;
            Ok(AsyncCommodityDashboard {
                inner: Arc::new(Mutex::new(dashboard)),
            })
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCommodityDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`CommodityDashboard`].
///
/// The dashboard sits behind a [`Mutex`]; concurrent callers are serialized,
/// so a second request for the same selection is served from the fetch memo.
#[derive(Clone)]
pub struct AsyncCommodityDashboard {
    inner: Arc<Mutex<CommodityDashboard>>,
}

impl AsyncCommodityDashboard {
    pub fn builder() -> AsyncCommodityDashboardBuilder {
        AsyncCommodityDashboardBuilder::default()
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CommodityDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = dashboard
                .lock()
                .map_err(|_| DashboardError::InvalidArgument("Dashboard lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch and render a selection into the full HTML page.
    pub async fn page(&self, selection: PageSelection) -> Result<String> {
        self.run(move |d| d.page(&selection)).await
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.run(|d| {
            d.clear_cache();
            Ok(())
        })
        .await
    }
}
