// ABOUTME: Normalizes YouTube links into the embeddable player URL form.
// ABOUTME: Extracts the 11-character video id from the common share/watch/embed URL shapes.

use std::sync::LazyLock;

use regex::Regex;

const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*((youtu\.be/)|(v/)|(/u/\w+/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*")
        .expect("video id regex is valid")
});

/// True when the URL points at a YouTube host.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Extract the 11-character video id, or None if the URL has no id in a
/// recognized position.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let caps = VIDEO_ID_REGEX.captures(url)?;
    let id = caps.get(7)?.as_str();
    (id.len() == 11).then_some(id)
}

/// Rewrite a YouTube URL to `https://www.youtube.com/embed/<id>`. Anything
/// that is not a YouTube URL, or whose id cannot be extracted, comes back
/// unchanged.
pub fn normalize_video_url(url: &str) -> String {
    if !is_youtube_url(url) {
        return url.to_string();
    }
    match extract_video_id(url) {
        Some(id) => format!("{}{}", EMBED_PREFIX, id),
        None => url.to_string(),
    }
}
