//! ISO-8601 timestamps used in REST API bodies

use chrono::{DateTime, SecondsFormat, Utc};
use error_stack::{Result, ResultExt};

#[derive(thiserror::Error, Debug)]
#[error("Invalid ISO-8601 timestamp")]
pub struct TimestampParsingError;

/// Format time like `2022-04-14T10:35:12.332Z`.
pub fn format_iso8601(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp and convert it to UTC.
pub fn parse_iso8601(text: &str) -> Result<DateTime<Utc>, TimestampParsingError> {
    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc))
        .change_context(TimestampParsingError)
        .attach_printable_lazy(|| text.to_string())
}
