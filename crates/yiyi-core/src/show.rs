// ABOUTME: Defines the Show record (one per event) and its slug rules.
// ABOUTME: Slugs are derived from the show's UTC date and a kebab-cased title when omitted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

use crate::error::ModelError;

/// A single show. `slug` is the primary key within the collection.
///
/// Every field defaults when missing so that partially written records
/// still decode instead of invalidating the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Show {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// ISO-8601 timestamp as entered by the admin.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
}

impl Show {
    /// Drop optional links that were submitted as empty strings.
    pub fn clear_empty_links(&mut self) {
        if self.ticket_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.ticket_url = None;
        }
        if self.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.url = None;
        }
    }

    /// The parsed show date, if `date` holds a recognizable timestamp.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_show_date(&self.date).ok()
    }

    /// Fill in `slug` from date and title if it is empty. Returns the slug.
    pub fn ensure_slug(&mut self) -> Result<&str, ModelError> {
        if self.slug.trim().is_empty() {
            self.slug = derive_slug(&self.title, &self.date)?;
        }
        Ok(&self.slug)
    }
}

/// Parse a show date. Accepts RFC 3339 timestamps, timestamps without an
/// offset (read as UTC), and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_show_date(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = day.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    Err(ModelError::InvalidDate(raw.to_string()))
}

/// Lower-case the title, turn whitespace runs into a single `-`, and drop
/// anything that is not an ASCII word character or `-`.
pub fn kebab_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        }
    }
    out
}

/// Derive `{YYYY-MM-DD}-{kebab(title)}` using the UTC calendar date.
pub fn derive_slug(title: &str, date: &str) -> Result<String, ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::MissingTitle);
    }
    let day = parse_show_date(date)?.format("%Y-%m-%d");
    Ok(format!("{}-{}", day, kebab_title(title)))
}

/// Reject slugs that would escape the shows directory or name nothing.
pub fn validate_slug(slug: &str) -> Result<(), ModelError> {
    let bad = slug.is_empty()
        || slug == "."
        || slug == ".."
        || slug.contains(['/', '\\', '\0']);
    if bad {
        return Err(ModelError::UnsafeSlug(slug.to_string()));
    }
    Ok(())
}
