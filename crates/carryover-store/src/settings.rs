//! Loading migration settings from YAML

use crate::error::{DocumentError, StoreError, StoreResult};
use carryover_core::MigrationConfig;
use std::path::Path;

/// Parse migration settings
///
/// Missing fields keep their defaults.
///
/// # Errors
/// Returns `DocumentError::Syntax` if the text is not valid settings YAML.
pub fn parse_settings(text: &str) -> Result<MigrationConfig, DocumentError> {
    if text.trim().is_empty() {
        return Ok(MigrationConfig::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Read migration settings from a file
///
/// # Errors
/// - `StoreError::Read` if the file cannot be read
/// - `StoreError::Document` if its content is invalid
pub fn load_settings(path: impl AsRef<Path>) -> StoreResult<MigrationConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
    parse_settings(&text).map_err(|e| StoreError::document(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_are_default() {
        assert_eq!(parse_settings("").unwrap(), MigrationConfig::default());
        assert_eq!(parse_settings("{}").unwrap(), MigrationConfig::default());
    }

    #[test]
    fn version_key_override() {
        let config = parse_settings("version_key: meta.schema\n").unwrap();
        assert_eq!(config.version_key.to_string(), "meta.schema");
    }

    #[test]
    fn invalid_version_key_is_rejected() {
        assert!(parse_settings("version_key: 'a..b'\n").is_err());
    }
}
