//! Timestamp decoding for documents written by other services.
//!
//! Accepts RFC 3339 strings and epoch milliseconds (integer or float, the
//! shape of a JavaScript `Date.now()`). Serialization stays RFC 3339.

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    FractionalMillis(f64),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {:?}: {}", text, e))),
        RawTimestamp::Millis(ms) => from_millis(ms),
        RawTimestamp::FractionalMillis(ms) if ms.is_finite() => from_millis(ms.trunc() as i64),
        RawTimestamp::FractionalMillis(ms) => {
            Err(de::Error::custom(format!("invalid timestamp {}", ms)))
        }
    }
}

fn from_millis<E: de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| E::custom(format!("timestamp {} ms out of range", ms)))
}
