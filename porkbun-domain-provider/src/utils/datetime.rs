//! Date/time (de)serialization for Porkbun timestamps
//!
//! - Serialize: `DateTime<Utc>` -> RFC 3339 string
//! - Deserialize: `"YYYY-MM-DD HH:MM:SS"` (Porkbun), RFC 3339, or Unix timestamp -> `DateTime<Utc>`
//!
//! Porkbun does not send an offset; naive timestamps are read as UTC.
//! A value that cannot be parsed (such as `0000-00-00 00:00:00`) is logged and
//! read as absent, so one odd record does not fail a whole listing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const PORKBUN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize `Option<DateTime<Utc>>` as an optional RFC 3339 string.
#[allow(clippy::ref_option)]
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional timestamp; empty and unparsable values are treated as absent.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) if s.trim().is_empty() => Ok(None),
        Some(OptionalTimestamp::String(s)) => {
            let parsed = parse_timestamp(&s);
            if parsed.is_none() {
                log::warn!("Ignoring invalid timestamp: {s}");
            }
            Ok(parsed)
        }
        Some(OptionalTimestamp::I64(ts)) => {
            let parsed = DateTime::from_timestamp(ts, 0);
            if parsed.is_none() {
                log::warn!("Ignoring out-of-range Unix timestamp: {ts}");
            }
            Ok(parsed)
        }
        None => Ok(None),
    }
}

/// Parse a Porkbun or RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, PORKBUN_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
}
