//! Key formatting for single-line `key: value` output
//!
//! A [`FormattedKey`] is the exact prefix written in front of a value and the
//! prefix searched for when scanning raw template text for comments.

use crate::path::KeyPath;
use std::fmt::{self, Display, Formatter};

/// Spaces per nesting level
pub const INDENT_UNIT: &str = "  ";

/// Separator written between a key and its value
pub const KEY_SEPARATOR: &str = ": ";

/// Indented `"<key>: "` prefix for one key path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormattedKey(String);

impl FormattedKey {
    /// Format a key path
    ///
    /// Depth is counted by splitting the dotted key on `.`, so a segment
    /// containing a literal dot indents deeper than its real nesting.
    /// Top-level keys are flush left; every further level adds
    /// [`INDENT_UNIT`].
    #[must_use]
    pub fn format(path: &KeyPath) -> Self {
        let dotted = path.dotted();
        let depth = dotted.split('.').count();
        let mut out = INDENT_UNIT.repeat(depth.saturating_sub(1));
        out.push_str(&dotted);
        out.push_str(KEY_SEPARATOR);
        Self(out)
    }

    /// Full formatted prefix, including the trailing `": "`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used to recognise this key in raw template lines
    ///
    /// Drops only the trailing space, keeping the colon, so `foo:` never
    /// matches a `foo-bar:` line.
    #[inline]
    #[must_use]
    pub fn match_prefix(&self) -> &str {
        self.0.strip_suffix(' ').unwrap_or(&self.0)
    }

    /// Number of leading spaces
    #[inline]
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.0.len() - self.0.trim_start_matches(' ').len()
    }
}

impl Display for FormattedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormattedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
