use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use commodity_overview::DashboardError;

/// Handler error: renders as `{"error": "..."}` on API routes, and carries
/// the status and message into the HTML error page on `/`.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

/// Upstream (Datastream) failures map to 502.
fn status_for(e: &DashboardError) -> StatusCode {
    match e {
        DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        DashboardError::Http(_) | DashboardError::Auth(_) | DashboardError::Provider(_) => {
            StatusCode::BAD_GATEWAY
        }
        DashboardError::Io(_) | DashboardError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        let message = match &e {
            DashboardError::NotFound(msg) | DashboardError::InvalidArgument(msg) => msg.clone(),
            _ => e.to_string(),
        };
        Self {
            status: status_for(&e),
            message,
        }
    }
}
