//! 12-byte store identifiers
//!
//! Layout: 4-byte big-endian unix timestamp, 5 bytes of per-process
//! randomness, 3-byte big-endian counter. Text form is 24 lowercase hex
//! characters.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::errors::{StoreError, StoreResult};

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
static HEX_PATTERN: OnceLock<Regex> = OnceLock::new();

fn hex_pattern() -> &'static Regex {
    HEX_PATTERN.get_or_init(|| Regex::new("^[0-9a-fA-F]{24}$").expect("static pattern"))
}

/// Store-generated record identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generates a fresh identifier
    pub fn new() -> Self {
        let timestamp = Utc::now().timestamp() as u32;
        let process = PROCESS_UNIQUE.get_or_init(|| rand::thread_rng().gen());
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x00ff_ffff)))
            .fetch_add(1, Ordering::Relaxed)
            & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parses the 24-character hex form
    pub fn parse_str(s: &str) -> StoreResult<Self> {
        if !hex_pattern().is_match(s) {
            return Err(StoreError::cast("ObjectId", &Value::String(s.to_string()), "_id"));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| StoreError::cast("ObjectId", &Value::String(s.to_string()), "_id"))?;
        }
        Ok(Self(bytes))
    }

    /// Returns true if `s` is a well-formed hex identifier
    pub fn is_valid(s: &str) -> bool {
        hex_pattern().is_match(s)
    }

    /// Creation time embedded in the identifier
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::String(id.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_valid() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert!(ObjectId::is_valid(&a.to_hex()));
        assert_eq!(a.to_hex().len(), 24);
    }

    #[test]
    fn test_parse_hex() {
        let id = ObjectId::parse_str("5f8d0d55b54764421b7156c9").unwrap();
        assert_eq!(id.to_string(), "5f8d0d55b54764421b7156c9");

        let upper: ObjectId = "5F8D0D55B54764421B7156C9".parse().unwrap();
        assert_eq!(upper, id);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ObjectId::parse_str("1").unwrap_err().is_cast());
        assert!(ObjectId::parse_str("zz8d0d55b54764421b7156c9").is_err());
        assert!(ObjectId::parse_str("5f8d0d55b54764421b7156c9aa").is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let before = Utc::now().timestamp();
        let id = ObjectId::new();
        assert!(id.timestamp().timestamp() >= before - 1);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = ObjectId::parse_str("5f8d0d55b54764421b7156c9").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, Value::String("5f8d0d55b54764421b7156c9".into()));

        let back: ObjectId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }
}
