//! Snowflake identifiers.
//!
//! Every user, guild, channel, message and interaction on the platform is
//! addressed by a 64-bit snowflake. The upper 42 bits hold milliseconds since
//! the platform epoch, which lets us derive when an object was created without
//! asking the API.

use crate::error::ProtoError;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Platform epoch (2015-01-01T00:00:00Z) in Unix milliseconds.
pub const PLATFORM_EPOCH_MS: u64 = 1_420_070_400_000;

/// A 64-bit platform identifier.
///
/// Serialized as a decimal string (JSON numbers cannot carry 64 bits safely);
/// deserialized from either a string or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Creation time in Unix milliseconds.
    #[inline]
    pub const fn timestamp_millis(self) -> u64 {
        (self.0 >> 22) + PLATFORM_EPOCH_MS
    }

    /// Creation time as a UTC timestamp.
    pub fn timestamp(self) -> DateTime<Utc> {
        // Any value >> 22 fits comfortably in an i64 millisecond range.
        Utc.timestamp_millis_opt(self.timestamp_millis() as i64)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Smallest snowflake that could have been minted at `at`.
    ///
    /// Useful for age comparisons against real identifiers.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let ms = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        Self(ms.saturating_sub(PLATFORM_EPOCH_MS) << 22)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ProtoError::InvalidSnowflake(s.to_string()))
    }
}

impl From<u64> for Snowflake {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a decimal string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Snowflake(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Snowflake)
            .map_err(|_| E::custom(format!("negative snowflake: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_matches_documented_example() {
        let id: Snowflake = "175928847299117063".parse().unwrap();
        assert_eq!(id.timestamp_millis(), 1_462_015_105_796);
        assert_eq!(id.timestamp().timestamp_millis(), 1_462_015_105_796);
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(matches!(
            "abc".parse::<Snowflake>(),
            Err(ProtoError::InvalidSnowflake(_))
        ));
        assert!("-5".parse::<Snowflake>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Snowflake::new(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn deserializes_from_string_or_integer() {
        let a: Snowflake = serde_json::from_str("\"80351110224678912\"").unwrap();
        let b: Snowflake = serde_json::from_str("80351110224678912").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Snowflake>("-1").is_err());
    }

    #[test]
    fn from_timestamp_orders_against_real_ids() {
        let id: Snowflake = "175928847299117063".parse().unwrap();
        let floor = Snowflake::from_timestamp(id.timestamp());
        assert!(floor <= id);
        assert_eq!(floor.timestamp_millis(), id.timestamp_millis());
    }
}
