// ABOUTME: Error type for the pure content rules in yiyi-core.
// ABOUTME: Raised when a record cannot be given a derived identity or is unsafe to persist.

use thiserror::Error;

/// Errors produced while validating or deriving identity for domain records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("show date is not a valid ISO-8601 timestamp: {0:?}")]
    InvalidDate(String),

    #[error("show title is required to derive a slug")]
    MissingTitle,

    #[error("slug {0:?} is not usable as an identifier")]
    UnsafeSlug(String),
}
