//! World configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Pre-reservation hints for a [`World`](crate::World).
///
/// ```
/// use rcube_ecs::WorldConfig;
///
/// let config = WorldConfig::from_toml_str("entity_capacity = 64").unwrap();
/// assert_eq!(config.entity_capacity, 64);
/// assert_eq!(config.store_capacity, WorldConfig::default().store_capacity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of entities the registry reserves room for
    pub entity_capacity: usize,
    /// Number of values each component store reserves room for
    pub store_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 1024,
            store_capacity: 1024,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML text. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn test_parse_values() {
        let config = WorldConfig::from_toml_str("entity_capacity = 10\nstore_capacity = 20\n").unwrap();
        assert_eq!(config.entity_capacity, 10);
        assert_eq!(config.store_capacity, 20);
    }

    #[test]
    fn test_parse_error() {
        let err = WorldConfig::from_toml_str("entity_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_string_is_readable_back() {
        let config = WorldConfig {
            entity_capacity: 3,
            store_capacity: 4,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(WorldConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = WorldConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
