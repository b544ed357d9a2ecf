// ABOUTME: Configuration loading and validation for the yiyi server.
// ABOUTME: Reads environment variables, selects the storage medium, and enforces the remote-access rules.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use yiyi_store::{HostedCredentials, MediumKind, StorageConfig};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_CONTENT_DIR: &str = "./content";
const DEFAULT_KV_TIMEOUT_SECS: u64 = 10;

/// Environment variables checked, in order, for the hosted store URL.
const KV_URL_VARS: [&str; 3] = ["KV_REST_API_URL", "UPSTASH_REDIS_REST_URL", "REDIS_URL"];
/// Environment variables checked, in order, for the hosted store token.
const KV_TOKEN_VARS: [&str; 2] = ["KV_REST_API_TOKEN", "UPSTASH_REDIS_REST_TOKEN"];

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YIYI_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("YIYI_KV_TIMEOUT_SECS is not a positive whole number: {0}")]
    InvalidTimeout(String),

    #[error("YIYI_ALLOW_REMOTE is true but YIYI_ADMIN_TOKEN is not set; refusing to start without authentication")]
    RemoteWithoutToken,

    #[error("bind address {0} is not loopback; set YIYI_ALLOW_REMOTE=true to listen on it")]
    RemoteNotAllowed(SocketAddr),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub bind: SocketAddr,
    pub allow_remote: bool,
    pub admin_token: Option<String>,
    pub storage: StorageConfig,
}

impl SiteConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - YIYI_BIND: socket address to bind (default: 127.0.0.1:3000)
    /// - YIYI_CONTENT_DIR: local content directory (default: ./content)
    /// - YIYI_ENV: `production` selects the hosted medium, anything else the file medium
    /// - KV_REST_API_URL / UPSTASH_REDIS_REST_URL / REDIS_URL: hosted store URL
    /// - KV_REST_API_TOKEN / UPSTASH_REDIS_REST_TOKEN: hosted store token
    /// - YIYI_KV_TIMEOUT_SECS: hosted store request timeout (default: 10)
    /// - YIYI_ADMIN_TOKEN: bearer token required for writes (optional)
    /// - YIYI_ALLOW_REMOTE: allow a non-loopback bind (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let first_of = |names: &[&str]| names.iter().find_map(|&name| var(name));

        let bind_str = var("YIYI_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let allow_remote = var("YIYI_ALLOW_REMOTE")
            .map(|v| v == "true" || v == "1" || v == "yes")
            .unwrap_or(false);

        let admin_token = var("YIYI_ADMIN_TOKEN");

        let content_dir = var("YIYI_CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR));

        let kind = match var("YIYI_ENV").as_deref() {
            Some("production") => MediumKind::Hosted,
            _ => MediumKind::File,
        };

        let hosted = match (first_of(&KV_URL_VARS), first_of(&KV_TOKEN_VARS)) {
            (Some(url), Some(token)) => Some(HostedCredentials { url, token }),
            _ => None,
        };

        let kv_timeout = match var("YIYI_KV_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_KV_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        let config = Self {
            bind,
            allow_remote,
            admin_token,
            storage: StorageConfig {
                kind,
                content_dir,
                hosted,
                kv_timeout,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the remote-access rules. Call again after overriding `bind`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allow_remote && self.admin_token.is_none() {
            return Err(ConfigError::RemoteWithoutToken);
        }
        if !self.allow_remote && !self.bind.ip().is_loopback() {
            return Err(ConfigError::RemoteNotAllowed(self.bind));
        }
        Ok(())
    }
}
