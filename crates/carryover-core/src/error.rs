//! Error types for carryover migrations
//!
//! Only three conditions are errors at all:
//! - the raw template text cannot be read (degrades, never aborts)
//! - the migrated output cannot be persisted (aborts)
//! - the template cannot enumerate its keys (aborts)
//!
//! A missing value is not an error; lookups return `Option`.

use std::path::PathBuf;

/// Template document could not list its keys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template keys unavailable: {0}")]
pub struct KeyEnumerationError(pub String);

impl KeyEnumerationError {
    /// Create from any displayable cause
    pub fn new(cause: impl Into<String>) -> Self {
        Self(cause.into())
    }
}

/// Migration errors
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Raw template text could not be opened or read
    #[error("template source unavailable: {source}")]
    SourceUnavailable {
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Migrated output could not be written
    #[error("cannot write migrated config to {path}: {source}")]
    SinkUnavailable {
        /// Destination that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Template document cannot enumerate its keys
    #[error("missing template key enumeration: {0}")]
    MissingTemplateKeyEnumeration(String),
}

impl MigrationError {
    /// Create sink error for path
    pub fn sink_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SinkUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether the run can still produce output after this error
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

impl From<KeyEnumerationError> for MigrationError {
    fn from(err: KeyEnumerationError) -> Self {
        Self::MissingTemplateKeyEnumeration(err.0)
    }
}

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumeration_error_conversion() {
        let err: MigrationError = KeyEnumerationError::new("not a mapping").into();
        assert!(matches!(err, MigrationError::MissingTemplateKeyEnumeration(_)));
        assert_eq!(
            err.to_string(),
            "missing template key enumeration: not a mapping"
        );
        assert!(!err.is_degradable());
    }

    #[test]
    fn sink_error_display() {
        let err = MigrationError::sink_unavailable(
            "/tmp/config.yml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/config.yml"));
        assert!(!err.is_degradable());
    }

    #[test]
    fn source_error_is_degradable() {
        let err = MigrationError::SourceUnavailable {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_degradable());
    }
}
