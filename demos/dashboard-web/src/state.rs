use commodity_overview::AsyncCommodityDashboard;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Dashboard handle. Owns the Datastream client and the fetch memo, and
    /// runs blocking provider calls on the tokio blocking pool.
    pub dashboard: AsyncCommodityDashboard,
}
