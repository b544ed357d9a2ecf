// ABOUTME: HTTP server for yiyi, exposing the site settings, shows, and music samples over a JSON API.
// ABOUTME: Uses Axum with shared store state, bearer-token auth for writes, and env-based configuration.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, SiteConfig};
pub use routes::create_router;
