//! Serde helpers for timestamp fields

/// `Option<DateTime<Utc>>` as an ISO-8601 string with milliseconds.
///
/// Use together with `#[serde(default)]` so that a missing field
/// deserializes to `None`.
pub mod iso8601_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use utils::time::{format_iso8601, parse_iso8601};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&format_iso8601(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse_iso8601(&text)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("{:?}", e))),
            None => Ok(None),
        }
    }
}
