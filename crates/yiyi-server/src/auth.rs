// ABOUTME: Bearer token authentication middleware for the yiyi admin API.
// ABOUTME: Guards mutating requests under /api; reads and everything outside /api stay public.

use axum::Json;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::response::IntoResponse;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// A tower Layer that requires a bearer token on mutating API requests.
#[derive(Clone)]
pub struct AuthLayer {
    token: Arc<String>,
}

impl AuthLayer {
    /// Create a new AuthLayer with the expected bearer token.
    pub fn new(token: String) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            token: Arc::clone(&self.token),
        }
    }
}

/// The middleware service that checks bearer tokens.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    token: Arc<String>,
}

/// True for requests the token must cover: anything but a read under /api.
fn requires_token<B>(req: &Request<B>) -> bool {
    let path = req.uri().path();
    let is_api = path == "/api" || path.starts_with("/api/");
    let is_read = matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    is_api && !is_read
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if !requires_token(&req) {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        // Check for Authorization: Bearer <token>
        let authorized = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|t| t == self.token.as_str());

        if authorized {
            let mut inner = self.inner.clone();
            Box::pin(async move { inner.call(req).await })
        } else {
            tracing::warn!("rejected unauthenticated {} {}", req.method(), req.uri().path());
            Box::pin(async move {
                Ok((
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": "unauthorized" })),
                )
                    .into_response())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/api/shows", get(|| async { "shows" }).post(|| async { "created" }))
            .route("/api", get(|| async { "api root" }).post(|| async { "api post" }))
            .route("/health", get(|| async { "ok" }).post(|| async { "ok" }))
            .layer(AuthLayer::new("test-token-123".to_string()))
    }

    fn post(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri);
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn auth_middleware_rejects_writes_without_token() {
        let resp = test_router().oneshot(post("/api/shows", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "unauthorized");
    }

    #[tokio::test]
    async fn auth_middleware_allows_with_valid_token() {
        let resp = test_router()
            .oneshot(post("/api/shows", Some("Bearer test-token-123")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_middleware_rejects_with_wrong_token() {
        for header in ["Bearer wrong-token", "test-token-123", "Basic test-token-123"] {
            let resp = test_router()
                .oneshot(post("/api/shows", Some(header)))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {}", header);
        }
    }

    #[tokio::test]
    async fn auth_middleware_allows_public_reads() {
        let resp = test_router()
            .oneshot(Request::get("/api/shows").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_middleware_protects_api_without_trailing_slash() {
        let resp = test_router().oneshot(post("/api", None)).await.unwrap();
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "/api should be protected by auth"
        );
    }

    #[tokio::test]
    async fn auth_middleware_exempts_non_api_routes() {
        let resp = test_router().oneshot(post("/health", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
