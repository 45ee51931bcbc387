//! Schema entries
//!
//! One entry per distinct template key, in template order. Built fresh for
//! every migration run.

use crate::format::FormattedKey;
use crate::path::KeyPath;
use crate::resolve::{Resolved, ValueOrigin};
use crate::value::ConfigValue;

/// A resolved (key, value, comments) tuple destined for output
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    path: KeyPath,
    key: FormattedKey,
    resolved: Option<Resolved>,
    comments: Vec<String>,
}

impl SchemaEntry {
    /// Create entry for `path` with its resolved value
    #[must_use]
    pub fn new(path: KeyPath, resolved: Option<Resolved>) -> Self {
        let key = FormattedKey::format(&path);
        Self {
            path,
            key,
            resolved,
            comments: Vec::new(),
        }
    }

    /// Key path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Formatted `"<indent><key>: "` prefix
    #[inline]
    #[must_use]
    pub fn key(&self) -> &FormattedKey {
        &self.key
    }

    /// Effective value, `None` when the entry is skipped on output
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&ConfigValue> {
        self.resolved.as_ref().map(|r| &r.value)
    }

    /// Origin of the effective value
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<ValueOrigin> {
        self.resolved.as_ref().map(|r| r.origin)
    }

    /// Comment lines written above the key
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Attach comment lines
    pub fn set_comments(&mut self, comments: Vec<String>) {
        self.comments = comments;
    }

    /// Whether the entry is written at all
    #[inline]
    #[must_use]
    pub fn is_emitted(&self) -> bool {
        self.resolved.is_some()
    }
}
