// ABOUTME: Defines SiteSettings, the singleton document of display strings for the site.
// ABOUTME: Carries the built-in stock text used whenever no settings document exists yet.

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

/// The singleton settings document. Wraps the string bag under a `site` key
/// so the persisted shape matches `{ "site": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: SiteText,
}

/// Display strings shown across the public pages. Missing fields decode
/// as empty strings; no field-level validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteText {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hero_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hero_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub about_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub about_content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shows_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub footer_text: String,
}

impl Default for SiteSettings {
    /// The stock text the site ships with.
    fn default() -> Self {
        Self {
            site: SiteText {
                title: "yi yi".to_string(),
                tagline: "village polyphony".to_string(),
                hero_title: "Dissonant harmonies from the village, refracted through Brooklyn"
                    .to_string(),
                hero_description: "Three women excavating the raw polyphonic traditions of \
                    rural Ukraine: the kind of singing that uses chest voice like a weapon, \
                    where intervals clash on purpose, where \"beautiful\" was never the point. \
                    We're not here to make folk music palatable."
                    .to_string(),
                about_title: "The Circle".to_string(),
                about_content: "Yi Yi practices what ethnomusicologists call \"white voice\" \
                    singing (bilyi holos), an open-throat, chest-register technique that's been \
                    passed down in Ukrainian villages for centuries, sounding nothing like the \
                    trained voices you hear on opera stages."
                    .to_string(),
                shows_title: "Gatherings".to_string(),
                contact_title: "Join the Circle".to_string(),
                contact_email: "hello@yiyifolk.com".to_string(),
                footer_text: "yi yi • woven in brooklyn • 2024".to_string(),
            },
        }
    }
}
