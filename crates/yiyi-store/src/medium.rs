// ABOUTME: The Medium trait abstracting the two persistence backends, and startup selection between them.
// ABOUTME: Reads always yield a usable document; writes overwrite the whole document or fail loudly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use yiyi_core::{SampleCatalog, Show, SiteSettings};

use crate::error::StoreError;
use crate::file::FileMedium;
use crate::hosted::HostedMedium;
use crate::kv::{KvClient, RestKv};

/// The three named documents every medium stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKey {
    Settings,
    MusicSamples,
    Shows,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 3] = [
        DocumentKey::Settings,
        DocumentKey::MusicSamples,
        DocumentKey::Shows,
    ];

    /// Key in the hosted store's flat namespace.
    pub fn hosted_key(self) -> &'static str {
        match self {
            DocumentKey::Settings => "site:settings",
            DocumentKey::MusicSamples => "site:music-samples",
            DocumentKey::Shows => "site:shows",
        }
    }
}

/// Which medium is active for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumKind {
    File,
    Hosted,
}

impl std::fmt::Display for MediumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediumKind::File => write!(f, "file"),
            MediumKind::Hosted => write!(f, "hosted"),
        }
    }
}

/// A persistence medium for the settings, shows, and music samples
/// documents.
///
/// Read methods never fail: missing, unreadable, or corrupted data degrades
/// to the document's default. Write methods replace the stored document in
/// full and return an error if it could not be persisted.
#[async_trait]
pub trait Medium: Send + Sync {
    fn kind(&self) -> MediumKind;

    async fn read_settings(&self) -> SiteSettings;

    async fn write_settings(&self, settings: &SiteSettings) -> Result<(), StoreError>;

    async fn read_shows(&self) -> Vec<Show>;

    async fn write_shows(&self, shows: &[Show]) -> Result<(), StoreError>;

    async fn read_samples(&self) -> SampleCatalog;

    async fn write_samples(&self, catalog: &SampleCatalog) -> Result<(), StoreError>;

    /// One-time startup preparation. Must be idempotent.
    async fn initialize(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Credentials for the hosted key-value store.
#[derive(Debug, Clone)]
pub struct HostedCredentials {
    pub url: String,
    pub token: String,
}

/// Everything needed to construct the active medium.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: MediumKind,
    /// Local content directory. The file medium stores everything here; the
    /// hosted medium seeds music samples from it on first start.
    pub content_dir: PathBuf,
    pub hosted: Option<HostedCredentials>,
    pub kv_timeout: Duration,
}

/// Build the medium selected by `config`.
///
/// Selecting the hosted medium without credentials is not an error here:
/// the resulting medium serves defaults and rejects writes, so the site can
/// still render while the operator fixes the configuration.
pub fn connect(config: &StorageConfig) -> Result<Arc<dyn Medium>, StoreError> {
    match config.kind {
        MediumKind::File => {
            tracing::info!("using file medium at {}", config.content_dir.display());
            Ok(Arc::new(FileMedium::new(config.content_dir.clone())))
        }
        MediumKind::Hosted => {
            let client: Option<Arc<dyn KvClient>> = match &config.hosted {
                Some(creds) => {
                    let rest = RestKv::new(
                        creds.url.clone(),
                        creds.token.clone(),
                        config.kv_timeout,
                    )?;
                    tracing::info!("using hosted medium at {}", creds.url);
                    Some(Arc::new(rest))
                }
                None => {
                    tracing::warn!(
                        "hosted medium selected but no store URL/token configured; \
                         reads will return defaults and writes will fail"
                    );
                    None
                }
            };
            Ok(Arc::new(HostedMedium::new(
                client,
                Some(config.content_dir.clone()),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_keys_are_namespaced() {
        let keys: Vec<_> = DocumentKey::ALL.iter().map(|k| k.hosted_key()).collect();
        assert_eq!(keys, vec!["site:settings", "site:music-samples", "site:shows"]);
    }

    #[test]
    fn connect_selects_medium_by_kind() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = StorageConfig {
            kind: MediumKind::File,
            content_dir: dir.path().to_path_buf(),
            hosted: None,
            kv_timeout: Duration::from_secs(1),
        };
        assert_eq!(connect(&config).unwrap().kind(), MediumKind::File);

        config.kind = MediumKind::Hosted;
        assert_eq!(connect(&config).unwrap().kind(), MediumKind::Hosted);

        config.hosted = Some(HostedCredentials {
            url: "http://127.0.0.1:9".to_string(),
            token: "t".to_string(),
        });
        assert_eq!(connect(&config).unwrap().kind(), MediumKind::Hosted);
    }

    #[tokio::test]
    async fn unconfigured_hosted_medium_serves_defaults_and_rejects_writes() {
        let config = StorageConfig {
            kind: MediumKind::Hosted,
            content_dir: PathBuf::from("/nonexistent"),
            hosted: None,
            kv_timeout: Duration::from_secs(1),
        };
        let medium = connect(&config).unwrap();

        assert_eq!(medium.read_settings().await, SiteSettings::default());
        assert!(medium.read_shows().await.is_empty());

        let err = medium.write_shows(&[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "got {:?}", err);
    }
}
