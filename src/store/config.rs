//! Store Configuration
//!
//! Per-collection settings: version key stamped on inserts and the default
//! time limit for queries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Collection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Field stamped with `0` on insert (default: "__v"). `null` disables it.
    #[serde(default = "default_version_key")]
    pub version_key: Option<String>,

    /// Time limit applied to every query, in milliseconds (default: none)
    #[serde(default)]
    pub max_time_ms: Option<u64>,
}

fn default_version_key() -> Option<String> {
    Some("__v".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version_key: default_version_key(),
            max_time_ms: None,
        }
    }
}

impl StoreConfig {
    /// Parse a config from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a config with a query time limit
    pub fn with_max_time_ms(max_time_ms: u64) -> Self {
        Self {
            max_time_ms: Some(max_time_ms),
            ..Default::default()
        }
    }

    /// Query time limit as a duration
    pub fn max_time(&self) -> Option<Duration> {
        self.max_time_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.version_key.as_deref(), Some("__v"));
        assert!(config.max_time().is_none());
    }

    #[test]
    fn test_from_json_defaults() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_from_json_overrides() {
        let config = StoreConfig::from_json(r#"{"version_key": null, "max_time_ms": 250}"#).unwrap();
        assert!(config.version_key.is_none());
        assert_eq!(config.max_time(), Some(Duration::from_millis(250)));
    }
}
