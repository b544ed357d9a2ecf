// ABOUTME: Shared application state for the yiyi HTTP server.
// ABOUTME: Holds the three content stores, all built over the single medium chosen at startup.

use std::sync::Arc;

use yiyi_store::{Medium, MediumKind, SampleStore, SettingsStore, ShowStore};

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub settings: SettingsStore,
    pub shows: ShowStore,
    pub samples: SampleStore,
    pub medium_kind: MediumKind,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create the stores over `medium`.
    pub fn new(medium: Arc<dyn Medium>) -> Self {
        Self {
            medium_kind: medium.kind(),
            settings: SettingsStore::new(Arc::clone(&medium)),
            shows: ShowStore::new(Arc::clone(&medium)),
            samples: SampleStore::new(medium),
        }
    }
}
