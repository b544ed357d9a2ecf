// ABOUTME: Key-value client abstraction for the hosted medium, plus the REST implementation.
// ABOUTME: Speaks the Redis-over-HTTP command protocol: POST a JSON command array, read {"result"}.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

/// Errors that can occur talking to the hosted key-value store.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("command rejected: {0}")]
    Command(String),

    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

/// Minimal flat key-value interface the hosted medium needs.
///
/// `get` returns the raw stored value. A REST backend hands back strings;
/// other backends may already hand back structured JSON, so callers must
/// cope with both.
#[async_trait]
pub trait KvClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    async fn del(&self, key: &str) -> Result<(), KvError>;

    /// Backend name for logging (e.g. "rest", "memory").
    fn backend_name(&self) -> &str;
}

/// REST client for a hosted Redis-compatible store.
pub struct RestKv {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl RestKv {
    /// Create a client for the given endpoint and bearer token. Every
    /// request is bounded by `timeout`.
    pub fn new(url: String, token: String, timeout: Duration) -> Result<Self, KvError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Send one command and return its `result` field.
    async fn command(&self, args: &[&str]) -> Result<Value, KvError> {
        tracing::debug!(command = args.first().copied().unwrap_or(""), "kv request");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&json!(args))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if let Some(error) = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.as_str())
        {
            return Err(KvError::Command(error.to_string()));
        }

        if !status.is_success() {
            return Err(KvError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        body.and_then(|mut b| b.get_mut("result").map(Value::take))
            .ok_or_else(|| KvError::InvalidResponse(format!("missing result in {:?}", text)))
    }
}

#[async_trait]
impl KvClient for RestKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        let result = self.command(&["GET", key]).await?;
        Ok((!result.is_null()).then_some(result))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.command(&["SET", key, value]).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), KvError> {
        self.command(&["DEL", key]).await?;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "rest"
    }
}
