// ABOUTME: Lenient serde helpers for records that were written by hand or by older clients.
// ABOUTME: Lets an explicit JSON or YAML null stand in for a field's default value.

use serde::{Deserialize, Deserializer};

/// Deserialize a field, treating an explicit null as `T::default()`.
///
/// `#[serde(default)]` only covers missing fields; stored records also
/// carry `"venue": null` and the like.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Record {
        #[serde(deserialize_with = "null_as_default")]
        name: String,
        #[serde(deserialize_with = "null_as_default")]
        count: i64,
    }

    #[test]
    fn null_becomes_default() {
        let record: Record = serde_json::from_value(json!({ "name": null, "count": null })).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.count, 0);
    }

    #[test]
    fn present_and_missing_values_behave_as_usual() {
        let record: Record = serde_json::from_value(json!({ "name": "Jalopy" })).unwrap();
        assert_eq!(record.name, "Jalopy");
        assert_eq!(record.count, 0);
    }

    #[test]
    fn wrong_types_still_fail() {
        assert!(serde_json::from_value::<Record>(json!({ "name": 5 })).is_err());
    }
}
