// ABOUTME: Route definitions for the yiyi HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state, tracing, and auth.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::AuthLayer;

/// Build the complete Axum router. When `admin_token` is set, mutating
/// requests under /api must present it as a bearer token.
pub fn create_router(state: SharedState, admin_token: Option<String>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/settings",
            get(api::settings::get_settings).put(api::settings::put_settings),
        )
        .route(
            "/api/shows",
            get(api::shows::list_shows)
                .post(api::shows::create_show)
                .put(api::shows::update_show)
                .delete(api::shows::delete_show),
        )
        .route(
            "/api/music-samples",
            get(api::samples::list_samples)
                .post(api::samples::create_sample)
                .put(api::samples::update_sample)
                .delete(api::samples::delete_sample),
        )
        .route(
            "/api/music-samples/reorder",
            post(api::samples::reorder_samples),
        )
        .route(
            "/api/music-samples/{id}/move",
            post(api::samples::move_sample),
        )
        .with_state(state);

    let router = match admin_token {
        Some(token) => router.layer(AuthLayer::new(token)),
        None => {
            tracing::warn!("no admin token configured; write endpoints are unauthenticated");
            router
        }
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
