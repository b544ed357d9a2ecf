// ABOUTME: Music sample API handlers: CRUD plus whole-catalog reorder and single-step moves.
// ABOUTME: Reorder and move respond with the catalog in its new display order.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use yiyi_core::{MoveDirection, MusicSample};

use crate::api::{store_error_response, success};
use crate::app_state::SharedState;

/// Query string for DELETE /api/music-samples.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: String,
}

/// Request body for POST /api/music-samples/{id}/move.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// GET /api/music-samples - All samples in display order.
pub async fn list_samples(State(state): State<SharedState>) -> Json<Vec<MusicSample>> {
    Json(state.samples.list().await)
}

/// POST /api/music-samples - Create a sample. Responds 201 with the stored sample.
pub async fn create_sample(
    State(state): State<SharedState>,
    Json(sample): Json<MusicSample>,
) -> Response {
    match state.samples.create(sample).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// PUT /api/music-samples - Replace the sample with the body's id.
pub async fn update_sample(
    State(state): State<SharedState>,
    Json(sample): Json<MusicSample>,
) -> Response {
    match state.samples.update(sample).await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// DELETE /api/music-samples?id=... - Remove a sample.
pub async fn delete_sample(
    State(state): State<SharedState>,
    Query(query): Query<IdQuery>,
) -> Response {
    match state.samples.delete(&query.id).await {
        Ok(()) => success().into_response(),
        Err(e) => store_error_response(e),
    }
}

/// POST /api/music-samples/reorder - Persist the body's sequence as the display order.
pub async fn reorder_samples(
    State(state): State<SharedState>,
    Json(sequence): Json<Vec<MusicSample>>,
) -> Response {
    match state.samples.reorder(sequence).await {
        Ok(samples) => Json(samples).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// POST /api/music-samples/{id}/move - Swap a sample with its neighbour.
pub async fn move_sample(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Response {
    match state.samples.move_sample(&id, req.direction).await {
        Ok(samples) => Json(samples).into_response(),
        Err(e) => store_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::app_state::AppState;
    use crate::routes::create_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use yiyi_store::testing::MemoryKv;
    use yiyi_store::{HostedMedium, KvClient};

    fn app() -> axum::Router {
        let kv: Arc<dyn KvClient> = Arc::new(MemoryKv::new());
        let medium = Arc::new(HostedMedium::new(Some(kv), None));
        create_router(Arc::new(AppState::new(medium)), None)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create(app: &axum::Router, title: &str) -> Value {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/music-samples",
                &json!({
                    "title": title,
                    "description": "field recording",
                    "type": "audio",
                    "audioUrl": "https://cdn.example.com/song.mp3"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        json_body(resp).await
    }

    fn ids(list: &Value) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn create_assigns_ids_and_normalizes_video() {
        let app = app();
        assert_eq!(create(&app, "Field Song").await["id"], "field-song");
        assert_eq!(create(&app, "Field Song").await["id"], "field-song-1");

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/music-samples",
                &json!({
                    "title": "Live at Barbès",
                    "type": "video",
                    "videoUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"
                }),
            ))
            .await
            .unwrap();
        let json = json_body(resp).await;
        assert_eq!(json["videoUrl"], "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn update_and_delete() {
        let app = app();
        let mut sample = create(&app, "Lullaby").await;
        sample["description"] = json!("sung at dusk");

        let resp = app
            .clone()
            .oneshot(json_request("PUT", "/api/music-samples", &sample))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["description"], "sung at dusk");

        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/music-samples?id=lullaby"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(json_request("PUT", "/api/music-samples", &sample))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app
            .oneshot(empty_request("DELETE", "/api/music-samples"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reorder_and_move() {
        let app = app();
        for title in ["A", "B", "C"] {
            create(&app, title).await;
        }

        let resp = app
            .clone()
            .oneshot(empty_request("GET", "/api/music-samples"))
            .await
            .unwrap();
        let mut list = json_body(resp).await;
        list.as_array_mut().unwrap().reverse();

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/music-samples/reorder", &list))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let reordered = json_body(resp).await;
        assert_eq!(ids(&reordered), vec!["c", "b", "a"]);
        assert_eq!(reordered[0]["order"], 1);

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/music-samples/a/move",
                &json!({ "direction": "up" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ids(&json_body(resp).await), vec!["c", "a", "b"]);

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/music-samples/missing/move",
                &json!({ "direction": "down" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
