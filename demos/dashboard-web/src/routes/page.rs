use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};

use commodity_overview::page::{render_error_page, PageQuery, PageSelection};

use crate::error::AppError;
use crate::state::AppState;

/// GET /?category=Metals&range=2Y
///
/// Render the dashboard for the selected category and time range. Provider
/// failures are shown in the page rather than as a bare JSON error.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Response {
    let selection = PageSelection::from_query(&query);
    tracing::info!(category = %selection.category, range = %selection.time_range, "render page");

    match state.dashboard.page(selection.clone()).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "dashboard render failed");
            let err = AppError::from(e);
            (err.status, Html(render_error_page(&selection, &err.message))).into_response()
        }
    }
}
