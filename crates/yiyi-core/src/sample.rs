// ABOUTME: Defines MusicSample (a video, audio, or link item) and the catalog document wrapping them.
// ABOUTME: Holds the id derivation, order collision, display ordering, and renumbering rules.

use std::cmp::Ordering;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

use crate::video::normalize_video_url;

/// Which kind of media a sample points at. Exactly one URL field is active
/// for each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
    Audio,
    Link,
}

/// A single music sample. `id` is the primary key; `order` is an optional
/// manual display position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MusicSample {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl MusicSample {
    /// The URL field selected by `kind`.
    pub fn active_url(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Video => self.video_url.as_deref(),
            MediaKind::Audio => self.audio_url.as_deref(),
            MediaKind::Link => self.link_url.as_deref(),
        }
    }

    /// Rewrite a YouTube video URL to its embed form. Only applies to
    /// video samples.
    pub fn normalize_video(&mut self) {
        if self.kind != MediaKind::Video {
            return;
        }
        if let Some(url) = self.video_url.as_mut() {
            *url = normalize_video_url(url);
        }
    }
}

/// The persisted music samples document, `{ "samples": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCatalog {
    #[serde(default)]
    pub samples: Vec<MusicSample>,
}

/// Direction for a single-step manual reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Lower-case the title, collapse every run of characters outside
/// `[a-z0-9]` into one `-`, and trim hyphens from both ends.
pub fn sample_id_base(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Fallback id for samples whose title yields no usable characters.
pub fn timestamp_sample_id() -> String {
    format!("sample-{}", Utc::now().timestamp_millis())
}

/// Pick an id for a new sample: the title-derived base (or `fallback` when
/// that is empty), suffixed `-1`, `-2`, ... until no existing sample uses it.
pub fn assign_sample_id(
    title: &str,
    existing: &[MusicSample],
    fallback: impl FnOnce() -> String,
) -> String {
    let mut base = sample_id_base(title);
    if base.is_empty() {
        base = fallback();
    }

    let taken = |candidate: &str| existing.iter().any(|s| s.id == candidate);
    let mut candidate = base.clone();
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
    candidate
}

/// Smallest integer >= `requested` that no existing sample uses as its
/// order, or None if every such value up to `i64::MAX` is taken.
pub fn next_free_order(requested: i64, existing: &[MusicSample]) -> Option<i64> {
    let mut order = requested;
    while existing.iter().any(|s| s.order == Some(order)) {
        order = order.checked_add(1)?;
    }
    Some(order)
}

/// Display ordering: explicit `order` ascending first, then unordered
/// samples by case-insensitive title.
pub fn display_cmp(a: &MusicSample, b: &MusicSample) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Stable sort into display order.
pub fn sort_for_display(samples: &mut [MusicSample]) {
    samples.sort_by(display_cmp);
}

/// Set every sample's order to its 1-based position.
pub fn renumber(samples: &mut [MusicSample]) {
    for (index, sample) in samples.iter_mut().enumerate() {
        sample.order = Some(index as i64 + 1);
    }
}

/// Swap the sample with `id` and its neighbour in `direction`.
/// Returns None if `id` is absent, Some(false) if it already sits at that
/// end of the sequence, and Some(true) after a swap.
pub fn swap_with_neighbour(
    samples: &mut [MusicSample],
    id: &str,
    direction: MoveDirection,
) -> Option<bool> {
    let index = samples.iter().position(|s| s.id == id)?;
    let neighbour = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < samples.len() => index + 1,
        _ => return Some(false),
    };
    samples.swap(index, neighbour);
    Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, title: &str, order: Option<i64>) -> MusicSample {
        MusicSample {
            id: id.to_string(),
            title: title.to_string(),
            order,
            ..MusicSample::default()
        }
    }

    fn no_fallback() -> String {
        panic!("fallback should not be used")
    }

    #[test]
    fn id_base_collapses_and_trims() {
        assert_eq!(sample_id_base("Field Song"), "field-song");
        assert_eq!(sample_id_base("  --Hey!! Ho?? "), "hey-ho");
        assert_eq!(sample_id_base("Пісня 2"), "2");
        assert_eq!(sample_id_base("!!!"), "");
    }

    #[test]
    fn assign_id_suffixes_on_collision() {
        let mut existing = Vec::new();
        let first = assign_sample_id("Field Song", &existing, no_fallback);
        assert_eq!(first, "field-song");
        existing.push(sample(&first, "Field Song", None));

        let second = assign_sample_id("Field Song", &existing, no_fallback);
        assert_eq!(second, "field-song-1");
        existing.push(sample(&second, "Field Song", None));

        let third = assign_sample_id("field song", &existing, no_fallback);
        assert_eq!(third, "field-song-2");
    }

    #[test]
    fn assign_id_falls_back_for_empty_titles() {
        let id = assign_sample_id("???", &[], || "sample-42".to_string());
        assert_eq!(id, "sample-42");
    }

    #[test]
    fn timestamp_id_has_prefix() {
        assert!(timestamp_sample_id().starts_with("sample-"));
    }

    #[test]
    fn next_free_order_skips_taken_values() {
        let existing = vec![
            sample("a", "A", Some(1)),
            sample("b", "B", Some(2)),
            sample("c", "C", Some(4)),
            sample("d", "D", None),
        ];
        assert_eq!(next_free_order(1, &existing), Some(3));
        assert_eq!(next_free_order(3, &existing), Some(3));
        assert_eq!(next_free_order(4, &existing), Some(5));
    }

    #[test]
    fn next_free_order_stops_at_the_top_of_the_range() {
        let existing = vec![sample("a", "A", Some(i64::MAX))];
        assert_eq!(next_free_order(i64::MAX, &existing), None);
        assert_eq!(next_free_order(i64::MAX - 1, &existing), Some(i64::MAX - 1));
    }

    #[test]
    fn display_order_puts_unordered_last_by_title() {
        let mut samples = vec![
            sample("a", "Zed", Some(2)),
            sample("b", "Yak", Some(1)),
            sample("c", "beta", None),
            sample("d", "Alpha", None),
        ];
        sort_for_display(&mut samples);
        let ids: Vec<_> = samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn renumber_assigns_positions() {
        let mut samples = vec![sample("x", "X", Some(9)), sample("y", "Y", None)];
        renumber(&mut samples);
        assert_eq!(samples[0].order, Some(1));
        assert_eq!(samples[1].order, Some(2));
    }

    #[test]
    fn swap_with_neighbour_handles_edges() {
        let mut samples = vec![sample("a", "A", None), sample("b", "B", None)];
        assert_eq!(swap_with_neighbour(&mut samples, "a", MoveDirection::Up), Some(false));
        assert_eq!(swap_with_neighbour(&mut samples, "b", MoveDirection::Down), Some(false));
        assert_eq!(swap_with_neighbour(&mut samples, "zz", MoveDirection::Up), None);
        assert_eq!(swap_with_neighbour(&mut samples, "a", MoveDirection::Down), Some(true));
        assert_eq!(samples[0].id, "b");
    }

    #[test]
    fn normalize_video_only_touches_video_samples() {
        let mut video = MusicSample {
            kind: MediaKind::Video,
            video_url: Some("https://youtu.be/abc12345678".to_string()),
            ..MusicSample::default()
        };
        video.normalize_video();
        assert_eq!(
            video.active_url(),
            Some("https://www.youtube.com/embed/abc12345678")
        );

        let mut link = MusicSample {
            kind: MediaKind::Link,
            video_url: Some("https://youtu.be/abc12345678".to_string()),
            link_url: Some("https://bandcamp.com".to_string()),
            ..MusicSample::default()
        };
        link.normalize_video();
        assert_eq!(link.video_url.as_deref(), Some("https://youtu.be/abc12345678"));
        assert_eq!(link.active_url(), Some("https://bandcamp.com"));
    }

    #[test]
    fn sample_json_shape() {
        let json = serde_json::json!({
            "id": "field-song",
            "title": "Field Song",
            "description": "recorded live",
            "type": "audio",
            "audioUrl": "https://cdn/field.mp3",
            "videoUrl": "",
            "order": 3
        });
        let parsed: MusicSample = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.kind, MediaKind::Audio);
        assert_eq!(parsed.active_url(), Some("https://cdn/field.mp3"));
        assert_eq!(parsed.order, Some(3));

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["type"], "audio");
        assert!(back.get("linkUrl").is_none());
    }
}
