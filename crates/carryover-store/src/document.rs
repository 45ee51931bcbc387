//! YAML-backed document lookups
//!
//! Uses `serde_yaml` for parsing, then flattens the mapping tree into dotted
//! keys in declaration order:
//! - section keys are listed but hold no value
//! - dotted keys at the root (`a.b: 1`) are read as nested paths, which is
//!   how migrated output writes them
//! - dotted keys inside a section keep their dots; only the real enclosing
//!   sections are listed
//! - lists keep the textual form of their scalar items

use crate::error::DocumentError;
use crate::layout;
use carryover_core::{ConfigLookup, ConfigValue, KeyEnumerationError, KeyPath, Number, TemplateDocument};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Flattened configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlDocument {
    entries: IndexMap<String, Option<ConfigValue>>,
}

impl YamlDocument {
    /// Create empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML, falling back to the migrated line layout
    ///
    /// Migrated output indents dotted nested keys under flush-left scalars,
    /// which YAML rejects; such text is read with the layout reader instead.
    ///
    /// # Errors
    /// Returns the YAML error when neither reader accepts the text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        match Self::from_yaml_str(text) {
            Ok(doc) => Ok(doc),
            Err(yaml_err) => match layout::parse_migrated(text) {
                Ok(doc) => {
                    tracing::debug!("Read document with migrated layout reader: {}", yaml_err);
                    Ok(doc)
                }
                Err(layout_err) => {
                    tracing::debug!("Migrated layout reader rejected document: {}", layout_err);
                    Err(yaml_err)
                }
            },
        }
    }

    /// Parse strict YAML
    ///
    /// # Errors
    /// - `DocumentError::Syntax` if the text is not YAML
    /// - `DocumentError::NotAMapping` if the root is a scalar or sequence
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        let root: Value = serde_yaml::from_str(text)?;
        let mut doc = Self::new();
        match root {
            Value::Null => {}
            Value::Mapping(map) => doc.flatten(None, &map),
            Value::Tagged(tagged) => match tagged.value {
                Value::Mapping(map) => doc.flatten(None, &map),
                other => return Err(DocumentError::NotAMapping(kind_of(&other))),
            },
            other => return Err(DocumentError::NotAMapping(kind_of(&other))),
        }
        Ok(doc)
    }

    /// Number of keys, sections included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at a dotted key
    #[must_use]
    pub fn get_dotted(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Whether `key` is listed, as a value or a section
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set the value at a dotted key, listing missing parents as sections
    ///
    /// Keys with an empty segment are ignored.
    pub fn insert(&mut self, key: &str, value: Option<ConfigValue>) {
        if key.split('.').any(str::is_empty) {
            tracing::debug!("Skipping key with empty segment: '{}'", key);
            return;
        }

        let mut end = 0;
        while let Some(offset) = key[end..].find('.') {
            end += offset;
            self.entries.entry(key[..end].to_string()).or_insert(None);
            end += 1;
        }

        self.entries.insert(key.to_string(), value);
    }

    /// Set a value under a section without splitting `key` any further
    fn insert_literal(&mut self, key: String, value: Option<ConfigValue>) {
        if key.split('.').any(str::is_empty) {
            tracing::debug!("Skipping key with empty segment: '{}'", key);
            return;
        }
        self.entries.insert(key, value);
    }

    /// Append one item to the list at `key`, creating the list if needed
    pub(crate) fn push_item(&mut self, key: &str, item: String) {
        match self.entries.get_mut(key) {
            Some(Some(ConfigValue::List(items))) => items.push(item),
            _ => self.insert(key, Some(ConfigValue::List(vec![item]))),
        }
    }

    fn flatten(&mut self, prefix: Option<&str>, map: &Mapping) {
        for (k, v) in map {
            let Some(name) = scalar_text(k) else {
                tracing::debug!("Skipping non-scalar mapping key under {:?}", prefix);
                continue;
            };
            let key = match prefix {
                Some(p) => format!("{p}.{name}"),
                None => name,
            };
            let section = match untag(v) {
                Value::Mapping(child) => Some(child),
                _ => None,
            };
            let value = if section.is_some() { None } else { convert(v) };

            // A bare section never clears a value already listed.
            if value.is_some() || !self.contains(&key) {
                if prefix.is_some() {
                    self.insert_literal(key.clone(), value);
                } else {
                    self.insert(&key, value);
                }
            }

            if let Some(child) = section {
                self.flatten(Some(&key), child);
            }
        }
    }
}

impl ConfigLookup for YamlDocument {
    fn get(&self, path: &KeyPath) -> Option<ConfigValue> {
        self.get_dotted(&path.dotted()).cloned()
    }
}

impl TemplateDocument for YamlDocument {
    fn keys(&self, include_nested: bool) -> Result<Vec<KeyPath>, KeyEnumerationError> {
        self.entries
            .keys()
            .filter(|k| include_nested || !k.contains('.'))
            .map(|k| {
                k.parse()
                    .map_err(|e| KeyEnumerationError::new(format!("'{k}': {e}")))
            })
            .collect()
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Convert a YAML leaf into a config value; `None` for null
fn convert(value: &Value) -> Option<ConfigValue> {
    match untag(value) {
        Value::Null | Value::Mapping(_) => None,
        Value::Bool(b) => Some(ConfigValue::Boolean(*b)),
        Value::Number(n) => Some(ConfigValue::Number(number(n))),
        Value::String(s) => Some(ConfigValue::Text(s.clone())),
        Value::Sequence(items) => Some(ConfigValue::List(
            items.iter().filter_map(scalar_text).collect(),
        )),
        Value::Tagged(_) => None,
    }
}

fn number(n: &serde_yaml::Number) -> Number {
    match n.as_i64() {
        Some(i) => Number::Integer(i),
        None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Textual form of a scalar; `None` for null and collections
fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number(n).to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(doc: &YamlDocument) -> Vec<String> {
        doc.keys(true)
            .unwrap()
            .iter()
            .map(KeyPath::dotted)
            .collect()
    }

    #[test]
    fn flattens_in_declaration_order() {
        let doc = YamlDocument::from_yaml_str(
            r"
config-version: 2
duration-words:
  hours: 'h'
  minutes: 'm'
tag-duration: 15
",
        )
        .unwrap();

        assert_eq!(
            keys(&doc),
            vec![
                "config-version",
                "duration-words",
                "duration-words.hours",
                "duration-words.minutes",
                "tag-duration"
            ]
        );
        assert_eq!(doc.get_dotted("duration-words"), None);
        assert_eq!(
            doc.get_dotted("duration-words.hours"),
            Some(&ConfigValue::from("h"))
        );
    }

    #[test]
    fn top_level_keys_only() {
        let doc = YamlDocument::from_yaml_str("a:\n  b: 1\nc: 2\n").unwrap();
        let top: Vec<_> = doc.keys(false).unwrap().iter().map(KeyPath::dotted).collect();
        assert_eq!(top, vec!["a", "c"]);
    }

    #[test]
    fn classifies_scalars() {
        let doc = YamlDocument::from_yaml_str(
            "text: hello\ncount: 3\nratio: 0.5\nflag: true\nnothing: ~\nlist: [a, 1, false]\n",
        )
        .unwrap();

        assert_eq!(doc.get_dotted("text"), Some(&ConfigValue::from("hello")));
        assert_eq!(doc.get_dotted("count"), Some(&ConfigValue::from(3)));
        assert_eq!(doc.get_dotted("ratio"), Some(&ConfigValue::from(0.5)));
        assert_eq!(doc.get_dotted("flag"), Some(&ConfigValue::from(true)));
        assert_eq!(doc.get_dotted("nothing"), None);
        assert!(doc.contains("nothing"));
        assert_eq!(
            doc.get_dotted("list"),
            Some(&ConfigValue::from(vec!["a", "1", "false"]))
        );
    }

    #[test]
    fn dotted_keys_become_nested_paths() {
        let doc = YamlDocument::from_yaml_str("a.b: 1\na.c: 2\n").unwrap();
        assert_eq!(keys(&doc), vec!["a", "a.b", "a.c"]);

        let path: KeyPath = "a.b".parse().unwrap();
        assert_eq!(doc.get(&path), Some(ConfigValue::from(1)));
    }

    #[test]
    fn literal_dots_inside_sections_add_no_sections() {
        let doc = YamlDocument::from_yaml_str("servers:\n  eu.example.com: 1\n").unwrap();
        assert_eq!(keys(&doc), vec!["servers", "servers.eu.example.com"]);
        assert_eq!(
            doc.get_dotted("servers.eu.example.com"),
            Some(&ConfigValue::from(1))
        );
    }

    #[test]
    fn empty_text_is_empty_document() {
        assert!(YamlDocument::from_yaml_str("").unwrap().is_empty());
        assert!(YamlDocument::from_yaml_str("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mapping_root() {
        assert!(matches!(
            YamlDocument::from_yaml_str("- a\n- b\n"),
            Err(DocumentError::NotAMapping("sequence"))
        ));
    }

    #[test]
    fn parse_falls_back_to_migrated_layout() {
        let text = "tag-duration: 30\n\n  duration-words.hours: 'h'";
        assert!(YamlDocument::from_yaml_str(text).is_err());

        let doc = YamlDocument::parse(text).unwrap();
        assert_eq!(doc.get_dotted("tag-duration"), Some(&ConfigValue::from(30)));
        assert_eq!(
            doc.get_dotted("duration-words.hours"),
            Some(&ConfigValue::from("h"))
        );
        assert!(doc.contains("duration-words"));
    }

    #[test]
    fn parse_reports_yaml_error_when_both_readers_fail() {
        let result = YamlDocument::parse("a: [unclosed\n  - 'x'\n");
        assert!(matches!(result, Err(DocumentError::Syntax(_))));
    }

    #[test]
    fn insert_skips_empty_segments() {
        let mut doc = YamlDocument::new();
        doc.insert("a..b", Some(1.into()));
        doc.insert("", Some(1.into()));
        assert!(doc.is_empty());
    }
}
