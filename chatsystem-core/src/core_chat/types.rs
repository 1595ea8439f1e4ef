/*
    types.rs - Common types for the chat core

    Defines:
    - Timestamps (wire format: RFC 3339, millisecond precision, UTC)
    - IDs for channels and messages
    - Principals (authors, owners, members)
*/

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from milliseconds since epoch
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Get milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Smallest timestamp strictly after this one
    pub fn next(&self) -> Self {
        Timestamp(self.0.saturating_add(1))
    }

    /// RFC 3339 rendering, e.g. `2024-05-01T12:00:00.125Z`
    pub fn to_rfc3339(&self) -> String {
        let millis = i64::try_from(self.0).unwrap_or(i64::MAX);
        match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.0.to_string(),
        }
    }
}

/// Failure to read a timestamp from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{input}': expected RFC 3339 or milliseconds since epoch")]
pub struct ParseTimestampError {
    pub input: String,
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    /// Accepts RFC 3339 (`2024-05-01T12:00:00.125Z`) or raw milliseconds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseTimestampError {
            input: s.to_string(),
        };

        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed.parse::<u64>().map(Timestamp).map_err(|_| err());
        }

        let parsed = DateTime::parse_from_rfc3339(trimmed).map_err(|_| err())?;
        u64::try_from(parsed.timestamp_millis())
            .map(Timestamp)
            .map_err(|_| err())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an RFC 3339 string or milliseconds since epoch")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                Ok(Timestamp(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                u64::try_from(v)
                    .map(Timestamp)
                    .map_err(|_| E::custom("timestamp before the Unix epoch"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// Unique identifier for a channel, chosen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        ChannelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        ChannelId(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        ChannelId(id)
    }
}

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        MessageId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of an author, owner or member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Principal(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        Principal(name.to_string())
    }
}

impl From<String> for Principal {
    fn from(name: String) -> Self {
        Principal(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_renders_rfc3339_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.123Z");
        assert_eq!(Timestamp(0).to_string(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_timestamp_parses_rfc3339_and_millis() {
        let ts: Timestamp = "2023-11-14T22:13:20.123Z".parse().unwrap();
        assert_eq!(ts.as_millis(), 1_700_000_000_123);

        let offset: Timestamp = "2023-11-14T23:13:20.123+01:00".parse().unwrap();
        assert_eq!(offset, ts);

        let raw: Timestamp = "1700000000123".parse().unwrap();
        assert_eq!(raw, ts);
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!("yesterday".parse::<Timestamp>().is_err());
        assert!("".parse::<Timestamp>().is_err());
        assert!("1960-01-01T00:00:00Z".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_timestamp_serde() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2023-11-14T22:13:20.123Z\"");

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
        let from_number: Timestamp = serde_json::from_str("1700000000123").unwrap();
        assert_eq!(from_number, ts);
    }

    #[test]
    fn test_timestamp_next() {
        assert_eq!(Timestamp(41).next(), Timestamp(42));
        assert_eq!(Timestamp(u64::MAX).next(), Timestamp(u64::MAX));
    }

    #[test]
    fn test_ids_are_transparent_in_json() {
        assert_eq!(serde_json::to_string(&ChannelId::new("C-1")).unwrap(), "\"C-1\"");
        assert_eq!(serde_json::to_string(&Principal::new("owner1")).unwrap(), "\"owner1\"");
        assert_ne!(MessageId::generate(), MessageId::generate());
    }
}
