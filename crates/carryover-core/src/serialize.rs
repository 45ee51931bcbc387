//! Document serialization
//!
//! Renders schema entries back to text, one `key: value` line per entry:
//!
//! ```text
//! # seconds before untag
//! tag-duration: 30
//!
//! command-blacklist:
//!   - 'fly'
//!   - 'home'
//! ```

use crate::schema::SchemaEntry;
use crate::value::ConfigValue;
use std::fmt::Write as _;

/// Line break used in output
pub const LINE_BREAK: &str = "\n";

/// Separator written between two emitted entries
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Renders ordered schema entries to text
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSerializer;

impl DocumentSerializer {
    /// Create serializer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize entries in order, skipping those without a value
    #[must_use]
    pub fn serialize(&self, entries: &[SchemaEntry]) -> String {
        let mut out = String::new();
        let mut first = true;

        for entry in entries {
            let Some(value) = entry.value() else {
                continue;
            };

            if !first {
                out.push_str(ENTRY_SEPARATOR);
            }
            first = false;

            for comment in entry.comments() {
                out.push_str(comment);
                out.push_str(LINE_BREAK);
            }

            out.push_str(entry.key().as_str());
            Self::write_value(&mut out, value, entry.key().indent_width());
        }

        out
    }

    fn write_value(out: &mut String, value: &ConfigValue, indent: usize) {
        match value {
            ConfigValue::Text(text) => out.push_str(&quote(text)),
            ConfigValue::List(items) if items.is_empty() => out.push_str("[]"),
            ConfigValue::List(items) => {
                let pad = " ".repeat(indent + 2);
                for item in items {
                    out.push_str(LINE_BREAK);
                    // Writing to a String cannot fail.
                    let _ = write!(out, "{pad}- {}", quote(item));
                }
            }
            ConfigValue::Number(n) => {
                let _ = write!(out, "{n}");
            }
            ConfigValue::Boolean(b) => {
                let _ = write!(out, "{b}");
            }
        }
    }
}

/// Quote a scalar so it reads back as the same text
///
/// Single quotes with embedded quotes doubled, unless the text holds a line
/// break or another character that cannot appear literally on one line. Such
/// text is double-quoted with backslash escapes instead.
#[must_use]
pub fn quote(text: &str) -> String {
    if !text.chars().any(needs_escape) {
        return format!("'{}'", text.replace('\'', "''"));
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Control characters plus the separators YAML treats as line breaks or
/// rejects outright
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Resolved, ValueOrigin};
    use pretty_assertions::assert_eq;

    fn entry(key: &str, value: Option<ConfigValue>) -> SchemaEntry {
        SchemaEntry::new(
            key.parse().unwrap(),
            value.map(|value| Resolved {
                value,
                origin: ValueOrigin::TemplateDefault,
            }),
        )
    }

    #[test]
    fn scalars_by_kind() {
        let entries = vec![
            entry("name", Some("Bob".into())),
            entry("count", Some(3.into())),
            entry("ratio", Some(0.5.into())),
            entry("enabled", Some(true.into())),
        ];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(
            out,
            "name: 'Bob'\n\ncount: 3\n\nratio: 0.5\n\nenabled: true"
        );
    }

    #[test]
    fn nested_list_indents_items() {
        let entries = vec![entry("x.y", Some(vec!["a", "b"].into()))];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "  x.y: \n    - 'a'\n    - 'b'");
    }

    #[test]
    fn top_level_list() {
        let entries = vec![entry("disabled-worlds", Some(vec!["nether"].into()))];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "disabled-worlds: \n  - 'nether'");
    }

    #[test]
    fn empty_list_is_inline() {
        let entries = vec![entry("command-blacklist", Some(ConfigValue::List(Vec::new())))];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "command-blacklist: []");
    }

    #[test]
    fn absent_values_are_skipped_without_separator() {
        let entries = vec![
            entry("section", None),
            entry("a", Some(1.into())),
            entry("gone", None),
            entry("b", Some(2.into())),
            entry("tail", None),
        ];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "a: 1\n\nb: 2");
    }

    #[test]
    fn comments_precede_key() {
        let mut e = entry("tag-duration", Some(30.into()));
        e.set_comments(vec!["# seconds before untag".to_string()]);
        let out = DocumentSerializer::new().serialize(&[e]);
        assert_eq!(out, "# seconds before untag\ntag-duration: 30");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote("it's"), "'it''s'");
        let entries = vec![entry("msg", Some("&cDon't log out".into()))];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "msg: '&cDon''t log out'");
    }

    #[test]
    fn line_breaks_are_escaped() {
        assert_eq!(quote("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(quote("tab\there"), "\"tab\\there\"");
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote("a\\b\r"), "\"a\\\\b\\r\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\u0007\"");
        // Backslashes alone need no escaping inside single quotes.
        assert_eq!(quote("C:\\dir"), "'C:\\dir'");

        let entries = vec![entry("msg", Some("line1\nline2".into()))];
        let out = DocumentSerializer::new().serialize(&entries);
        assert_eq!(out, "msg: \"line1\\nline2\"");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn empty_input() {
        assert_eq!(DocumentSerializer::new().serialize(&[]), "");
    }
}
