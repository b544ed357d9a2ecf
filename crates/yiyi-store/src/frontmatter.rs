// ABOUTME: Reads and writes show files: a YAML front-matter block followed by free-text content.
// ABOUTME: Loads a whole shows directory, keyed by file name, ordered newest-first by date.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use yiyi_core::Show;
use yiyi_core::de::null_as_default;

use crate::error::StoreError;

const FENCE: &str = "---";

/// Extensions recognized as show files. New files are written as `.mdx`.
pub const SHOW_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// The metadata stored in a show file's front-matter. The slug is the file
/// name and the content is the body, so neither appears here.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ShowFrontMatter {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    date: String,
    #[serde(deserialize_with = "null_as_default")]
    venue: String,
    #[serde(deserialize_with = "null_as_default")]
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// Split a document into its front-matter YAML and body. Documents without
/// an opening fence are all body.
fn split_front_matter(text: &str) -> (&str, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return ("", text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (yaml, body);
        }
        offset += line.len();
    }
    // Unterminated fence: treat the whole thing as metadata with no body.
    (rest, "")
}

/// Parse the text of one show file. `slug` comes from the file name.
pub fn parse_show_file(slug: &str, text: &str) -> Result<Show, StoreError> {
    let (yaml, body) = split_front_matter(text);
    let meta: ShowFrontMatter = if yaml.trim().is_empty() {
        ShowFrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let content = body.strip_suffix('\n').unwrap_or(body);
    let content = content.strip_suffix('\r').unwrap_or(content);

    let mut show = Show {
        slug: slug.to_string(),
        title: meta.title,
        date: meta.date,
        venue: meta.venue,
        location: meta.location,
        ticket_url: meta.ticket_url,
        url: meta.url,
        content: content.to_string(),
    };
    show.clear_empty_links();
    Ok(show)
}

/// Render a show as front-matter plus body.
pub fn render_show_file(show: &Show) -> Result<String, StoreError> {
    let meta = ShowFrontMatter {
        title: show.title.clone(),
        date: show.date.clone(),
        venue: show.venue.clone(),
        location: show.location.clone(),
        ticket_url: show.ticket_url.clone().filter(|u| !u.is_empty()),
        url: show.url.clone().filter(|u| !u.is_empty()),
    };
    let yaml = serde_yaml::to_string(&meta)?;
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n{}\n", show.content))
}

/// The slug for a show file path, if the path names a show file.
pub fn show_slug(path: &Path) -> Option<&str> {
    let ext = path.extension()?.to_str()?;
    if !SHOW_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem()?.to_str()
}

/// Load every show file in `dir`, newest first. A missing directory is an
/// empty list; files that fail to parse are logged and skipped. When both
/// `<slug>.mdx` and `<slug>.md` exist, the `.mdx` file wins.
pub fn load_show_dir(dir: &Path) -> Result<Vec<Show>, StoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut by_slug: HashMap<String, (bool, Show)> = HashMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(slug) = show_slug(&path) else {
            continue;
        };
        let is_mdx = path.extension().is_some_and(|ext| ext == SHOW_EXTENSIONS[0]);
        let parsed = fs::read_to_string(&path)
            .map_err(StoreError::from)
            .and_then(|text| parse_show_file(slug, &text));
        let show = match parsed {
            Ok(show) => show,
            Err(e) => {
                tracing::warn!("skipping unreadable show file {}: {}", path.display(), e);
                continue;
            }
        };

        match by_slug.get(slug) {
            Some((true, _)) => {
                tracing::warn!("ignoring {}, an .mdx file with the same slug exists", path.display());
            }
            Some((false, _)) if !is_mdx => {}
            Some((false, _)) => {
                tracing::warn!("show {} has both .md and .mdx files, using .mdx", slug);
                by_slug.insert(slug.to_string(), (is_mdx, show));
            }
            None => {
                by_slug.insert(slug.to_string(), (is_mdx, show));
            }
        }
    }

    let mut shows: Vec<Show> = by_slug.into_values().map(|(_, show)| show).collect();
    // Newest first; undated shows go last, then by slug for a stable order.
    shows.sort_by(|a, b| {
        b.starts_at()
            .cmp(&a.starts_at())
            .then_with(|| a.slug.cmp(&b.slug))
    });
    Ok(shows)
}
