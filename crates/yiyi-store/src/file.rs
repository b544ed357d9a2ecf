// ABOUTME: File-backed medium for local development: JSON documents plus one front-matter file per show.
// ABOUTME: Missing documents are created with defaults on first read; writes use atomic rename.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use yiyi_core::show::validate_slug;
use yiyi_core::{SampleCatalog, Show, SiteSettings};

use crate::decode::{Decoded, Document, decode_value};
use crate::error::StoreError;
use crate::frontmatter::{load_show_dir, parse_show_file, render_show_file, show_slug};
use crate::medium::{Medium, MediumKind};

pub const SETTINGS_FILE: &str = "site-settings.json";
pub const SAMPLES_FILE: &str = "music-samples.json";
pub const SHOWS_DIR: &str = "shows";

/// Appended to the name of a file that failed to decode before it is
/// overwritten.
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Medium that keeps every document under a local content directory.
pub struct FileMedium {
    content_dir: PathBuf,
}

impl FileMedium {
    pub fn new(content_dir: PathBuf) -> Self {
        Self { content_dir }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    fn shows_dir(&self) -> PathBuf {
        self.content_dir.join(SHOWS_DIR)
    }

    /// Read a JSON document, creating it from `default` if the file does
    /// not exist yet. An unreadable file is logged and left in place until
    /// the next write moves it aside.
    fn read_json_or_create<T>(&self, file_name: &str, default: impl FnOnce() -> T) -> T
    where
        T: Document + Serialize,
    {
        let path = self.content_dir.join(file_name);
        if !path.exists() {
            let doc = default();
            let created = serde_json::to_string_pretty(&doc)
                .map_err(StoreError::from)
                .and_then(|json| write_atomic(&path, json.as_bytes()));
            match created {
                Ok(()) => tracing::info!("created default {}", path.display()),
                Err(e) => tracing::warn!("could not create {}: {}", path.display(), e),
            }
            return doc;
        }

        let loaded = fs::read_to_string(&path)
            .map_err(StoreError::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(StoreError::from));
        match loaded.map(decode_value::<T>) {
            Ok(Decoded::Value(doc)) => doc,
            Ok(Decoded::Mismatched(reason) | Decoded::Corrupted(reason)) => {
                tracing::error!("unexpected document in {}, serving defaults: {}", path.display(), reason);
                default()
            }
            Ok(Decoded::Missing) => default(),
            Err(e) => {
                tracing::error!("error reading {}, serving defaults: {}", path.display(), e);
                default()
            }
        }
    }

    /// Write a JSON document, first moving aside an existing file that
    /// does not decode cleanly so its contents survive the overwrite.
    fn write_json<T>(&self, file_name: &str, doc: &T) -> Result<(), StoreError>
    where
        T: Document + Serialize,
    {
        let path = self.content_dir.join(file_name);
        let json = serde_json::to_string_pretty(doc)?;
        let existing = match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        if let Some(text) = existing
            && !decodes_cleanly::<T>(&text)
        {
            set_aside(&path)?;
        }
        write_atomic(&path, json.as_bytes())
    }
}

/// True when `text` is JSON that builds a `T` without dropping records.
fn decodes_cleanly<T: Document>(text: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return false;
    };
    let mut skipped = Vec::new();
    T::from_json(value, &mut skipped).is_ok() && skipped.is_empty()
}

/// `path` with `suffix` appended to its file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Rename an unreadable file to `<name>.unreadable`, replacing any older
/// copy there.
fn set_aside(path: &Path) -> Result<(), StoreError> {
    let backup = with_suffix(path, UNREADABLE_SUFFIX);
    fs::rename(path, &backup)?;
    tracing::warn!("moved unreadable {} aside to {}", path.display(), backup.display());
    Ok(())
}

/// Write `contents` to `path` via a temp file, fsync, and rename. Creates
/// the parent directory if needed.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = with_suffix(path, ".tmp");

    let mut file = File::create(&tmp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[async_trait]
impl Medium for FileMedium {
    fn kind(&self) -> MediumKind {
        MediumKind::File
    }

    async fn read_settings(&self) -> SiteSettings {
        self.read_json_or_create(SETTINGS_FILE, SiteSettings::default)
    }

    async fn write_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.write_json(SETTINGS_FILE, settings)
    }

    async fn read_shows(&self) -> Vec<Show> {
        let dir = self.shows_dir();
        load_show_dir(&dir).unwrap_or_else(|e| {
            tracing::error!("error reading shows from {}: {}", dir.display(), e);
            Vec::new()
        })
    }

    /// Make the shows directory mirror `shows`: one `<slug>.mdx` per show,
    /// and no other show files. Show files that fail to parse were never
    /// part of the list, so they are moved aside rather than removed.
    async fn write_shows(&self, shows: &[Show]) -> Result<(), StoreError> {
        for show in shows {
            validate_slug(&show.slug)?;
        }

        let dir = self.shows_dir();
        fs::create_dir_all(&dir)?;

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(slug) = show_slug(&path) else {
                continue;
            };
            let parsed = fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|text| parse_show_file(slug, &text));
            if parsed.is_err() {
                set_aside(&path)?;
            }
        }

        let mut kept = HashSet::new();
        for show in shows {
            let file_name = format!("{}.mdx", show.slug);
            write_atomic(&dir.join(&file_name), render_show_file(show)?.as_bytes())?;
            kept.insert(file_name);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if show_slug(&path).is_none() {
                continue;
            }
            let keep = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| kept.contains(n));
            if !keep {
                fs::remove_file(&path)?;
                tracing::debug!("removed show file {}", path.display());
            }
        }
        Ok(())
    }

    async fn read_samples(&self) -> SampleCatalog {
        self.read_json_or_create(SAMPLES_FILE, SampleCatalog::default)
    }

    async fn write_samples(&self, catalog: &SampleCatalog) -> Result<(), StoreError> {
        self.write_json(SAMPLES_FILE, catalog)
    }
}
