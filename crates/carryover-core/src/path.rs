//! Key paths for addressing values within configuration documents
//!
//! Provides [`KeyPath`] for hierarchical addressing of document keys.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path of a key within a configuration document
///
/// Segments are ordered root to leaf. A path is built by splitting a dotted
/// key on every `.`, so a key name that itself contains a dot yields more
/// segments than the document nesting it came from.
///
/// # Examples
/// - `tag-duration` → `["tag-duration"]`
/// - `duration-words.hours` → `["duration-words", "hours"]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create new path from segments
    ///
    /// # Errors
    /// Returns [`PathError::Empty`] when `segments` is empty and
    /// [`PathError::EmptySegment`] when any segment is empty.
    pub fn new(segments: Vec<String>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(segments.join(".")));
        }
        Ok(Self(segments))
    }

    /// Create path from a single segment
    ///
    /// The segment is taken verbatim, even when it contains a dot.
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Nesting depth, 1 for a top-level key
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Get parent path (if not top-level)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Append a segment, returning new path
    ///
    /// The segment is taken verbatim, even when it contains a dot.
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Get last segment
    #[inline]
    #[must_use]
    pub fn last(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Dotted form of the path
    #[inline]
    #[must_use]
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        Self::new(s.split('.').map(str::to_string).collect())
    }
}

impl TryFrom<String> for KeyPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.dotted()
    }
}

/// Path construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// No segments at all
    #[error("key path is empty")]
    Empty,

    /// A segment between two dots is empty
    #[error("empty segment in key path '{0}'")]
    EmptySegment(String),
}
