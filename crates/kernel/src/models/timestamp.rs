//! Lenient timestamp deserialization for hand-written fixtures.
//!
//! Accepts Unix seconds, RFC 3339 date-times, or plain `YYYY-MM-DD` dates
//! (midnight UTC).

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Unix(i64),
    Text(String),
}

/// Deserialize a timestamp into Unix seconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Unix(ts) => Ok(ts),
        RawTimestamp::Text(text) => parse(&text).ok_or_else(|| {
            de::Error::custom(format!("invalid timestamp '{text}': expected RFC 3339 or YYYY-MM-DD"))
        }),
    }
}

/// Parse an RFC 3339 date-time or `YYYY-MM-DD` date into Unix seconds.
pub fn parse(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
