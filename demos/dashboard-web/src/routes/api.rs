use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use commodity_overview::catalog;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SnapshotParams {
    pub category: Option<String>,
    pub range: Option<String>,
}

/// GET /api/categories
///
/// List the catalog: category names, instruments and summary columns.
pub async fn list_categories() -> Json<Value> {
    let data: Vec<Value> = catalog::categories()
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "instruments": c.instruments(),
                "columns": c.labels(),
            })
        })
        .collect();
    let count = data.len();
    Json(json!({ "data": data, "count": count }))
}

/// GET /api/snapshot?category=Energy&range=3Y
///
/// Summary table for a category as JSON. Served from the fetch memo when
/// the same selection was requested before.
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SnapshotParams>,
) -> Result<Json<Value>, AppError> {
    let category = params
        .category
        .ok_or_else(|| AppError::bad_request("Missing required query parameter: category"))?;
    let range = params.range.unwrap_or_else(|| "1Y".to_string());

    let result = state
        .dashboard
        .run(move |d| d.fetch_category(&category, &range))
        .await?;

    Ok(Json(json!({
        "category": result.category,
        "range": result.time_range,
        "fetched_on": result.fetched_on,
        "data": result.snapshot,
    })))
}

/// POST /api/cache/clear
///
/// Drop every memoized fetch so the next request goes to the provider.
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let cleared = state
        .dashboard
        .run(|d| {
            let n = d.cached_entries().len();
            d.clear_cache();
            Ok(n)
        })
        .await?;
    tracing::info!(cleared, "fetch cache cleared");
    Ok(Json(json!({ "cleared": cleared })))
}
