// ABOUTME: Site settings API handlers: read the settings document or replace it wholesale.
// ABOUTME: The request body must be a JSON object; anything else is a 400.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use yiyi_core::SiteSettings;

use crate::api::{store_error_response, success};
use crate::app_state::SharedState;

/// GET /api/settings - Current settings, or the built-in defaults.
pub async fn get_settings(State(state): State<SharedState>) -> Json<SiteSettings> {
    Json(state.settings.get().await)
}

/// PUT /api/settings - Replace the settings document.
pub async fn put_settings(
    State(state): State<SharedState>,
    Json(document): Json<Value>,
) -> Response {
    match state.settings.set(document).await {
        Ok(_) => success().into_response(),
        Err(e) => store_error_response(e),
    }
}
