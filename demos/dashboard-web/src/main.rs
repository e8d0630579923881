mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Initializing dashboard...");
    let dashboard = commodity_overview::AsyncCommodityDashboard::builder()
        .build()
        .await
        .expect("Failed to initialize dashboard (are DSWS_USERNAME and DSWS_PASSWORD set?)");

    let state = Arc::new(AppState { dashboard });

    let app = Router::new()
        .route("/", get(routes::page::dashboard))
        .route("/api/categories", get(routes::api::list_categories))
        .route("/api/snapshot", get(routes::api::get_snapshot))
        .route("/api/cache/clear", post(routes::api::clear_cache))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("DASHBOARD_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
