// ABOUTME: API module containing the HTTP handlers for the yiyi content API.
// ABOUTME: Organized into sub-modules per document, plus the shared store-error to response mapping.

pub mod samples;
pub mod settings;
pub mod shows;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use yiyi_store::StoreError;

/// Map a store error to an HTTP response with a JSON `{"error": ...}` body.
/// Server-side failures are logged; client mistakes are not.
pub fn store_error_response(err: StoreError) -> Response {
    let status = match &err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Conflict { .. } => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("store operation failed: {}", err);
    }

    (
        status,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// The `{"success": true}` body returned by writes that have nothing else to say.
pub fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true }))
}
