//! Comment association
//!
//! Scans the raw template text once, collecting runs of comment lines and
//! handing each run to the key declared on the line right after it.
//!
//! # Rules
//! - A comment line is optional whitespace followed by `#`.
//! - Any other line, blank ones included, ends the current run.
//! - A line declares the first not-yet-matched key (template order) whose
//!   match prefix it starts with. That key is consumed even when no comments
//!   precede it.

use crate::format::FormattedKey;
use crate::schema::SchemaEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;

static COMMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#").expect("comment pattern is valid"));

/// Comment lines per formatted key
pub type CommentMap = HashMap<FormattedKey, Vec<String>>;

/// Attaches template comment blocks to keys
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentAssociator;

impl CommentAssociator {
    /// Create associator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether `line` is a comment line
    #[inline]
    #[must_use]
    pub fn is_comment(line: &str) -> bool {
        COMMENT_LINE.is_match(line)
    }

    /// Associate comments from already-read lines
    #[must_use]
    pub fn associate<I>(&self, lines: I, keys: &[FormattedKey]) -> CommentMap
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut pending: Vec<String> = Vec::new();
        let mut matched = vec![false; keys.len()];
        let mut map = CommentMap::new();

        for line in lines {
            let line = line.as_ref();
            if Self::is_comment(line) {
                pending.push(line.to_string());
                continue;
            }

            let hit = keys
                .iter()
                .enumerate()
                .find(|(i, key)| !matched[*i] && line.starts_with(key.match_prefix()));

            if let Some((i, key)) = hit {
                matched[i] = true;
                if !pending.is_empty() {
                    map.insert(key.clone(), pending.clone());
                }
            }

            pending.clear();
        }

        map
    }

    /// Associate comments read from `reader`
    ///
    /// # Errors
    /// Any I/O error while reading; nothing is associated in that case.
    pub fn associate_reader<R: BufRead>(
        &self,
        reader: R,
        keys: &[FormattedKey],
    ) -> std::io::Result<CommentMap> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(self.associate(lines, keys))
    }

    /// Move associated comments onto their entries
    ///
    /// Returns the number of entries that received comments.
    pub fn apply(&self, mut map: CommentMap, entries: &mut [SchemaEntry]) -> usize {
        let mut attached = 0;
        for entry in entries.iter_mut() {
            if let Some(comments) = map.remove(entry.key()) {
                entry.set_comments(comments);
                attached += 1;
            }
        }
        attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::KeyPath;

    fn keys(names: &[&str]) -> Vec<FormattedKey> {
        names
            .iter()
            .map(|n| FormattedKey::format(&n.parse::<KeyPath>().unwrap()))
            .collect()
    }

    fn comments_for<'a>(map: &'a CommentMap, name: &str) -> Option<&'a Vec<String>> {
        map.get(&FormattedKey::format(&name.parse::<KeyPath>().unwrap()))
    }

    #[test]
    fn comment_pattern() {
        assert!(CommentAssociator::is_comment("# top"));
        assert!(CommentAssociator::is_comment("   # indented"));
        assert!(CommentAssociator::is_comment("\t#tab"));
        assert!(CommentAssociator::is_comment("#"));
        assert!(!CommentAssociator::is_comment("key: '#not'"));
        assert!(!CommentAssociator::is_comment(""));
    }

    #[test]
    fn attaches_adjacent_block() {
        let raw = "# seconds before untag\n# (whole seconds)\ntag-duration: 15\n";
        let keys = keys(&["tag-duration"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);

        assert_eq!(
            comments_for(&map, "tag-duration").unwrap(),
            &vec![
                "# seconds before untag".to_string(),
                "# (whole seconds)".to_string()
            ]
        );
    }

    #[test]
    fn blank_line_breaks_adjacency() {
        let raw = "# orphaned\n\ntag-duration: 15\n";
        let keys = keys(&["tag-duration"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);
        assert!(map.is_empty());
    }

    #[test]
    fn content_line_breaks_adjacency() {
        let raw = "# about a\nother: 1\nb: 2\n";
        let keys = keys(&["b"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);
        assert!(map.is_empty());
    }

    #[test]
    fn first_matching_line_consumes_key() {
        // The first declaration has no comments; the later duplicate-looking
        // line must not claim the key.
        let raw = "tag-duration: 15\n# late\ntag-duration: 20\n";
        let keys = keys(&["tag-duration"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);
        assert!(map.is_empty());
    }

    #[test]
    fn stem_prefix_does_not_collide() {
        let raw = "# about foo-bar\nfoo-bar: 1\n# about foo\nfoo: 2\n";
        let keys = keys(&["foo", "foo-bar"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);

        assert_eq!(comments_for(&map, "foo").unwrap(), &vec!["# about foo".to_string()]);
        assert_eq!(
            comments_for(&map, "foo-bar").unwrap(),
            &vec!["# about foo-bar".to_string()]
        );
    }

    #[test]
    fn nested_template_lines_do_not_match_dotted_keys() {
        let raw = "duration-words:\n  # hour suffix\n  hours: 'h'\n";
        let keys = keys(&["duration-words", "duration-words.hours"]);
        let map = CommentAssociator::new().associate(raw.lines(), &keys);
        assert!(comments_for(&map, "duration-words.hours").is_none());
    }

    #[test]
    fn reader_error_propagates() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }

        let reader = std::io::BufReader::new(Broken);
        let result = CommentAssociator::new().associate_reader(reader, &keys(&["a"]));
        assert!(result.is_err());
    }

    #[test]
    fn apply_moves_comments_onto_entries() {
        let mut entries = vec![
            SchemaEntry::new("a".parse().unwrap(), None),
            SchemaEntry::new("b".parse().unwrap(), None),
        ];
        let keys: Vec<_> = entries.iter().map(|e| e.key().clone()).collect();
        let map = CommentAssociator::new().associate(["# about b", "b: 1"], &keys);

        let attached = CommentAssociator::new().apply(map, &mut entries);
        assert_eq!(attached, 1);
        assert!(entries[0].comments().is_empty());
        assert_eq!(entries[1].comments(), &["# about b".to_string()]);
    }
}
