//! Error types for the store
//!
//! Provides error handling for:
//! - Document parsing (text → lookup)
//! - Reading config and template files
//! - Migration failures surfaced from the engine

use carryover_core::MigrationError;
use std::path::PathBuf;

/// Errors turning text into a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Text is not valid YAML
    #[error("yaml syntax error: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// Document root is not a mapping
    #[error("document root must be a mapping, found {0}")]
    NotAMapping(&'static str),

    /// Line does not fit the migrated `key: value` layout
    #[error("line {line}: {message}")]
    Layout {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },
}

impl DocumentError {
    /// Create layout error for line
    pub fn layout(line: usize, message: impl Into<String>) -> Self {
        Self::Layout {
            line,
            message: message.into(),
        }
    }
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// File content is not a usable document
    #[error("invalid document {path}: {source}")]
    Document {
        /// File that failed
        path: PathBuf,
        /// Parse failure
        #[source]
        source: DocumentError,
    },

    /// Migrated output would not read back as a document
    #[error("migrated output for {path} does not read back: {source}")]
    UnreadableOutput {
        /// Config file that was left untouched
        path: PathBuf,
        /// Parse failure on the output
        #[source]
        source: DocumentError,
    },

    /// Migration failed
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

impl StoreError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create document error for path
    pub fn document(path: impl Into<PathBuf>, source: DocumentError) -> Self {
        Self::Document {
            path: path.into(),
            source,
        }
    }

    /// Create unreadable-output error for path
    pub fn unreadable_output(path: impl Into<PathBuf>, source: DocumentError) -> Self {
        Self::UnreadableOutput {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
