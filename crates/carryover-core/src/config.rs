//! Migration configuration

use crate::path::KeyPath;
use serde::{Deserialize, Serialize};

/// Default version key
pub const DEFAULT_VERSION_KEY: &str = "config-version";

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Key whose value always comes from the template
    pub version_key: KeyPath,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With version key
    #[inline]
    #[must_use]
    pub fn with_version_key(mut self, version_key: KeyPath) -> Self {
        self.version_key = version_key;
        self
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            version_key: KeyPath::single(DEFAULT_VERSION_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_version_key() {
        assert_eq!(
            MigrationConfig::new().version_key.to_string(),
            DEFAULT_VERSION_KEY
        );
    }

    #[test]
    fn builder_overrides_version_key() {
        let config = MigrationConfig::new().with_version_key("meta.schema".parse().unwrap());
        assert_eq!(config.version_key.depth(), 2);
    }
}
