// ABOUTME: Decode-with-fallback for raw stored documents, shared by both media.
// ABOUTME: Only unparseable or marker values count as corrupted; bad records are skipped one by one.

use serde::de::DeserializeOwned;
use serde_json::Value;
use yiyi_core::{SampleCatalog, Show, SiteSettings};

/// What an object looks like after being coerced to a string without
/// serialization. Values equal to this were written by an old bug.
pub const CORRUPTION_MARKER: &str = "[object Object]";

/// Outcome of decoding a raw stored value.
#[derive(Debug, PartialEq)]
pub enum Decoded<T> {
    /// A well-formed document, possibly with unreadable records dropped.
    Value(T),
    /// Nothing stored under the key.
    Missing,
    /// Valid JSON that is not shaped like this document. Served as the
    /// default, but the stored value is kept.
    Mismatched(String),
    /// Unparseable text, the corruption marker, or a raw value that is not
    /// a string, object, or array. Safe to clear.
    Corrupted(String),
}

impl<T> Decoded<T> {
    /// Collapse to a document, substituting `default` for anything that is
    /// not a usable value.
    pub fn or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Decoded::Value(v) => v,
            Decoded::Missing | Decoded::Mismatched(_) | Decoded::Corrupted(_) => default(),
        }
    }
}

/// A top-level stored document that can be built from parsed JSON.
pub trait Document: Sized {
    /// Build the document from `value`. Records that fail to decode are
    /// described in `skipped` and left out; only a container of the wrong
    /// shape is an error.
    fn from_json(value: Value, skipped: &mut Vec<String>) -> Result<Self, String>;
}

impl Document for SiteSettings {
    fn from_json(value: Value, _skipped: &mut Vec<String>) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected an object, found {}", value_kind(&value)));
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

impl Document for Vec<Show> {
    fn from_json(value: Value, skipped: &mut Vec<String>) -> Result<Self, String> {
        match value {
            Value::Array(items) => Ok(decode_records(items, skipped)),
            other => Err(format!("expected an array, found {}", value_kind(&other))),
        }
    }
}

impl Document for SampleCatalog {
    fn from_json(value: Value, skipped: &mut Vec<String>) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err(format!("expected an object, found {}", value_kind(&value)));
        };
        let samples = match fields.remove("samples") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => decode_records(items, skipped),
            Some(other) => {
                return Err(format!("expected a samples array, found {}", value_kind(&other)));
            }
        };
        Ok(SampleCatalog { samples })
    }
}

/// Decode each element on its own, collecting failures in `skipped`.
fn decode_records<T: DeserializeOwned>(items: Vec<Value>, skipped: &mut Vec<String>) -> Vec<T> {
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            skipped.push(format!("record {}: expected an object, found {}", index, value_kind(&item)));
            continue;
        }
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => skipped.push(format!("record {}: {}", index, e)),
        }
    }
    records
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// True for the literal corruption marker, ignoring surrounding whitespace
/// and a layer of JSON string quoting.
pub fn is_corruption_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed == CORRUPTION_MARKER || trimmed == format!("\"{}\"", CORRUPTION_MARKER)
}

/// Build `T` from already-parsed JSON, logging any records left out.
pub fn decode_value<T: Document>(value: Value) -> Decoded<T> {
    let mut skipped = Vec::new();
    match T::from_json(value, &mut skipped) {
        Ok(doc) => {
            for reason in &skipped {
                tracing::warn!("skipping unreadable record ({})", reason);
            }
            Decoded::Value(doc)
        }
        Err(reason) => Decoded::Mismatched(reason),
    }
}

/// Decode a raw stored value into `T`.
///
/// - `None` or JSON null is `Missing`.
/// - Objects and arrays are decoded directly (some backends deserialize
///   for us).
/// - Strings are parsed as JSON, unless they hold the corruption marker.
pub fn decode_document<T: Document>(raw: Option<Value>) -> Decoded<T> {
    let value = match raw {
        None | Some(Value::Null) => return Decoded::Missing,
        Some(Value::String(text)) => {
            if is_corruption_marker(&text) {
                return Decoded::Corrupted("corruption marker".to_string());
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(parsed) => parsed,
                Err(e) => return Decoded::Corrupted(format!("invalid json: {}", e)),
            }
        }
        Some(structured @ (Value::Object(_) | Value::Array(_))) => structured,
        Some(other) => {
            return Decoded::Corrupted(format!("unexpected value shape: {}", other));
        }
    };

    decode_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_are_missing() {
        assert_eq!(decode_document::<Vec<Show>>(None), Decoded::Missing);
        assert_eq!(decode_document::<Vec<Show>>(Some(Value::Null)), Decoded::Missing);
    }

    #[test]
    fn json_strings_decode() {
        let raw = Value::String(r#"[{"slug":"a","title":"A"}]"#.to_string());
        match decode_document::<Vec<Show>>(Some(raw)) {
            Decoded::Value(shows) => {
                assert_eq!(shows.len(), 1);
                assert_eq!(shows[0].slug, "a");
            }
            other => panic!("expected value, got {:?}", other),
        }
    }

    #[test]
    fn structured_values_decode_directly() {
        let raw = json!({ "samples": [{ "id": "x", "title": "X", "type": "link" }] });
        match decode_document::<SampleCatalog>(Some(raw)) {
            Decoded::Value(catalog) => assert_eq!(catalog.samples[0].id, "x"),
            other => panic!("expected value, got {:?}", other),
        }
    }

    #[test]
    fn corruption_marker_is_corrupted() {
        let raw = Value::String(CORRUPTION_MARKER.to_string());
        assert!(matches!(
            decode_document::<SiteSettings>(Some(raw)),
            Decoded::Corrupted(_)
        ));
        assert!(is_corruption_marker("\"[object Object]\""));
        assert!(!is_corruption_marker("{}"));
    }

    #[test]
    fn unparseable_text_and_scalar_values_are_corrupted() {
        for raw in [Value::String("{not json".to_string()), json!(42), json!(true)] {
            assert!(
                matches!(decode_document::<Vec<Show>>(Some(raw.clone())), Decoded::Corrupted(_)),
                "raw: {}",
                raw
            );
        }
    }

    #[test]
    fn wrong_document_shape_is_mismatched() {
        for raw in [
            // An object where the shows array belongs.
            Value::String(r#"{"shows":[]}"#.to_string()),
            // Valid JSON text holding a bare number.
            Value::String("42".to_string()),
        ] {
            assert!(
                matches!(decode_document::<Vec<Show>>(Some(raw.clone())), Decoded::Mismatched(_)),
                "raw: {}",
                raw
            );
        }
        assert!(matches!(
            decode_document::<SiteSettings>(Some(json!([{ "site": {} }]))),
            Decoded::Mismatched(_)
        ));
        assert!(matches!(
            decode_document::<SampleCatalog>(Some(json!({ "samples": "none" }))),
            Decoded::Mismatched(_)
        ));
    }

    #[test]
    fn one_bad_show_does_not_sink_the_rest() {
        let raw = json!([
            { "slug": "2025-01-01-gig", "title": "Gig", "venue": null },
            { "slug": "2025-02-01-other", "title": 7 },
            "stray",
            { "slug": "2025-03-01-fine", "title": "Fine", "venue": "Jalopy" }
        ]);
        match decode_document::<Vec<Show>>(Some(raw)) {
            Decoded::Value(shows) => {
                let slugs: Vec<_> = shows.iter().map(|s| s.slug.as_str()).collect();
                assert_eq!(slugs, vec!["2025-01-01-gig", "2025-03-01-fine"]);
                assert_eq!(shows[0].venue, "", "null fields read as empty");
            }
            other => panic!("expected value, got {:?}", other),
        }
    }

    #[test]
    fn one_bad_sample_does_not_sink_the_catalog() {
        let raw = json!({
            "samples": [
                { "id": "kept", "title": "Kept", "type": null, "description": null },
                { "id": "dropped", "type": "hologram" }
            ]
        });
        match decode_document::<SampleCatalog>(Some(raw)) {
            Decoded::Value(catalog) => {
                assert_eq!(catalog.samples.len(), 1);
                assert_eq!(catalog.samples[0].id, "kept");
            }
            other => panic!("expected value, got {:?}", other),
        }
        assert_eq!(
            decode_document::<SampleCatalog>(Some(json!({ "samples": null }))),
            Decoded::Value(SampleCatalog::default())
        );
    }

    #[test]
    fn or_else_substitutes_default() {
        let doc = decode_document::<Vec<Show>>(Some(json!("[object Object]"))).or_else(Vec::new);
        assert!(doc.is_empty());
        let doc = decode_document::<Vec<Show>>(Some(json!("{}"))).or_else(Vec::new);
        assert!(doc.is_empty());
    }
}
