// ABOUTME: Hosted key-value medium: documents are JSON strings under fixed keys in a flat namespace.
// ABOUTME: Deletes corrupted entries on read, skips unreadable records, and seeds missing keys at startup.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use yiyi_core::{SampleCatalog, Show, SiteSettings};

use crate::decode::{Decoded, Document, decode_document, decode_value, is_corruption_marker};
use crate::error::StoreError;
use crate::file::SAMPLES_FILE;
use crate::kv::KvClient;
use crate::medium::{DocumentKey, Medium, MediumKind};

/// Medium backed by a hosted key-value store.
///
/// `client` is None when the hosted medium was selected without
/// credentials; reads then serve defaults and writes fail.
pub struct HostedMedium {
    client: Option<Arc<dyn KvClient>>,
    seed_dir: Option<PathBuf>,
}

impl HostedMedium {
    /// Create a hosted medium. `seed_dir` is the local content directory
    /// consulted once by `initialize` to seed music samples.
    pub fn new(client: Option<Arc<dyn KvClient>>, seed_dir: Option<PathBuf>) -> Self {
        Self { client, seed_dir }
    }

    fn writable_client(&self) -> Result<&Arc<dyn KvClient>, StoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("hosted store not configured".to_string()))
    }

    /// Read and decode one document. Every failure degrades to `default`.
    /// Corrupted entries are deleted so the next write starts clean; a
    /// document of the wrong shape is kept for inspection.
    async fn read_document<T>(&self, key: DocumentKey, default: impl FnOnce() -> T + Send) -> T
    where
        T: Document + Send,
    {
        let Some(client) = &self.client else {
            return default();
        };
        let name = key.hosted_key();

        let raw = match client.get(name).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("error reading {} from hosted store: {}", name, e);
                return default();
            }
        };

        match decode_document::<T>(raw) {
            Decoded::Value(doc) => doc,
            Decoded::Missing => default(),
            Decoded::Mismatched(reason) => {
                tracing::warn!("unexpected document under {} ({}), serving defaults", name, reason);
                default()
            }
            Decoded::Corrupted(reason) => {
                tracing::warn!("corrupted data under {} ({}), clearing", name, reason);
                if let Err(e) = client.del(name).await {
                    tracing::error!("error clearing corrupted {}: {}", name, e);
                }
                default()
            }
        }
    }

    async fn write_document<T>(&self, key: DocumentKey, doc: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let client = self.writable_client()?;
        let json = serde_json::to_string(doc)?;
        client.set(key.hosted_key(), &json).await.map_err(|e| {
            tracing::error!("error saving {} to hosted store: {}", key.hosted_key(), e);
            StoreError::from(e)
        })
    }

    /// Music samples to seed an empty store with: the local samples file if
    /// there is one, otherwise an empty catalog.
    fn seed_samples(&self) -> SampleCatalog {
        let Some(path) = self.seed_dir.as_ref().map(|d| d.join(SAMPLES_FILE)) else {
            return SampleCatalog::default();
        };
        if !path.exists() {
            return SampleCatalog::default();
        }
        let parsed = std::fs::read_to_string(&path)
            .map_err(StoreError::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(StoreError::from));
        match parsed.map(decode_value::<SampleCatalog>) {
            Ok(Decoded::Value(catalog)) => catalog,
            Ok(Decoded::Mismatched(reason) | Decoded::Corrupted(reason)) => {
                tracing::warn!("ignoring unexpected seed file {}: {}", path.display(), reason);
                SampleCatalog::default()
            }
            Ok(Decoded::Missing) => SampleCatalog::default(),
            Err(e) => {
                tracing::warn!("ignoring unreadable seed file {}: {}", path.display(), e);
                SampleCatalog::default()
            }
        }
    }

    fn seed_json(&self, key: DocumentKey) -> Result<String, StoreError> {
        let json = match key {
            DocumentKey::Settings => serde_json::to_string(&SiteSettings::default())?,
            DocumentKey::MusicSamples => serde_json::to_string(&self.seed_samples())?,
            DocumentKey::Shows => serde_json::to_string(&Vec::<Show>::new())?,
        };
        Ok(json)
    }
}

#[async_trait]
impl Medium for HostedMedium {
    fn kind(&self) -> MediumKind {
        MediumKind::Hosted
    }

    async fn read_settings(&self) -> SiteSettings {
        self.read_document(DocumentKey::Settings, SiteSettings::default)
            .await
    }

    async fn write_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.write_document(DocumentKey::Settings, settings).await
    }

    async fn read_shows(&self) -> Vec<Show> {
        self.read_document(DocumentKey::Shows, Vec::new).await
    }

    async fn write_shows(&self, shows: &[Show]) -> Result<(), StoreError> {
        self.write_document(DocumentKey::Shows, &shows).await
    }

    async fn read_samples(&self) -> SampleCatalog {
        self.read_document(DocumentKey::MusicSamples, SampleCatalog::default)
            .await
    }

    async fn write_samples(&self, catalog: &SampleCatalog) -> Result<(), StoreError> {
        self.write_document(DocumentKey::MusicSamples, catalog).await
    }

    /// Clear keys holding the corruption marker, then seed any key that is
    /// absent. Keys with other content are left alone.
    async fn initialize(&self) -> Result<(), StoreError> {
        let Some(client) = &self.client else {
            tracing::info!("hosted store not configured, skipping initialization");
            return Ok(());
        };

        for key in DocumentKey::ALL {
            let name = key.hosted_key();
            let present = match client.get(name).await? {
                None | Some(Value::Null) => false,
                Some(Value::String(text)) if is_corruption_marker(&text) => {
                    tracing::warn!("clearing corruption marker under {}", name);
                    client.del(name).await?;
                    false
                }
                Some(_) => true,
            };

            if !present {
                client.set(name, &self.seed_json(key)?).await?;
                tracing::info!("seeded {} in hosted store", name);
            }
        }

        tracing::info!("hosted store initialized via {} backend", client.backend_name());
        Ok(())
    }
}
