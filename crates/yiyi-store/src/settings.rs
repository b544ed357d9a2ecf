// ABOUTME: Store for the singleton site settings document.
// ABOUTME: Replaces the document wholesale; the only validation is that the input is a JSON object.

use std::sync::Arc;

use serde_json::Value;
use yiyi_core::SiteSettings;

use crate::error::StoreError;
use crate::medium::Medium;

#[derive(Clone)]
pub struct SettingsStore {
    medium: Arc<dyn Medium>,
}

impl SettingsStore {
    pub fn new(medium: Arc<dyn Medium>) -> Self {
        Self { medium }
    }

    /// The current settings, or the built-in defaults.
    pub async fn get(&self) -> SiteSettings {
        self.medium.read_settings().await
    }

    /// Overwrite the settings with `document`, which must be a JSON object.
    pub async fn set(&self, document: Value) -> Result<SiteSettings, StoreError> {
        if !document.is_object() {
            return Err(StoreError::Validation(
                "settings must be a JSON object".to_string(),
            ));
        }
        let settings: SiteSettings = serde_json::from_value(document)
            .map_err(|e| StoreError::Validation(format!("invalid settings: {}", e)))?;

        self.medium.write_settings(&settings).await?;
        tracing::info!("site settings updated");
        Ok(settings)
    }
}
