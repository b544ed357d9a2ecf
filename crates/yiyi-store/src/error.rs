// ABOUTME: Error taxonomy for store operations, shared by every medium and store.
// ABOUTME: Read paths never return these; write paths and lookups surface them to callers.

use thiserror::Error;
use yiyi_core::ModelError;

use crate::kv::KvError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("front-matter error: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("kv error: {0}")]
    Kv(#[from] KvError),
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
