//! Resolver Configuration

use serde::{Deserialize, Serialize};

/// Naming of a generated operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Operation name (default: "findByIdLean")
    #[serde(default = "default_name")]
    pub name: String,

    /// Operation description shown by the API layer
    #[serde(default = "default_description")]
    pub description: Option<String>,
}

fn default_name() -> String {
    "findByIdLean".to_string()
}

fn default_description() -> Option<String> {
    Some("Find a record by its _id and return it as a plain object".to_string())
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: default_description(),
        }
    }
}

impl ResolverConfig {
    /// Parse a config from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a config with a custom operation name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.name, "findByIdLean");
        assert!(config.description.is_some());
    }

    #[test]
    fn test_from_json() {
        let config = ResolverConfig::from_json(r#"{"name": "userById"}"#).unwrap();
        assert_eq!(config.name, "userById");
        assert_eq!(config.description, ResolverConfig::default().description);
    }
}
