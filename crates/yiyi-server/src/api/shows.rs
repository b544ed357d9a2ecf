// ABOUTME: Show API handlers: list, create, update, and delete shows keyed by slug.
// ABOUTME: Create derives the slug from date and title when the client leaves it empty.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use yiyi_core::Show;

use crate::api::{store_error_response, success};
use crate::app_state::SharedState;

/// Query string for DELETE /api/shows.
#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    #[serde(default)]
    pub slug: String,
}

/// GET /api/shows - All shows.
pub async fn list_shows(State(state): State<SharedState>) -> Json<Vec<Show>> {
    Json(state.shows.list().await)
}

/// POST /api/shows - Create a show. Responds 201 with the assigned slug.
pub async fn create_show(State(state): State<SharedState>, Json(show): Json<Show>) -> Response {
    match state.shows.create(show).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "success": true, "slug": created.slug })),
        )
            .into_response(),
        Err(e) => store_error_response(e),
    }
}

/// PUT /api/shows - Replace the show with the body's slug.
pub async fn update_show(State(state): State<SharedState>, Json(show): Json<Show>) -> Response {
    match state.shows.update(show).await {
        Ok(_) => success().into_response(),
        Err(e) => store_error_response(e),
    }
}

/// DELETE /api/shows?slug=... - Remove a show.
pub async fn delete_show(
    State(state): State<SharedState>,
    Query(query): Query<SlugQuery>,
) -> Response {
    match state.shows.delete(&query.slug).await {
        Ok(()) => success().into_response(),
        Err(e) => store_error_response(e),
    }
}
