//! Collaborator traits
//!
//! The engine never parses documents or opens files. Callers supply:
//! - [`ConfigLookup`] over the user's current configuration
//! - [`TemplateDocument`] over the packaged default configuration
//! - [`RawTemplateSource`] yielding the template's literal text

use crate::error::KeyEnumerationError;
use crate::path::KeyPath;
use crate::value::ConfigValue;
use std::io::BufRead;

/// Read-only key → value lookup
pub trait ConfigLookup {
    /// Value at `path`, or `None` when absent or a section
    fn get(&self, path: &KeyPath) -> Option<ConfigValue>;
}

/// Template lookup that can also list its keys
pub trait TemplateDocument: ConfigLookup {
    /// All keys in declaration order
    ///
    /// With `include_nested`, section keys are followed depth-first by
    /// their children; otherwise only top-level keys are listed.
    ///
    /// # Errors
    /// Returns [`KeyEnumerationError`] when the document has no key
    /// structure to enumerate.
    fn keys(&self, include_nested: bool) -> Result<Vec<KeyPath>, KeyEnumerationError>;
}

/// Source of the template's literal text
pub trait RawTemplateSource {
    /// Open a fresh reader over the text
    ///
    /// # Errors
    /// Any I/O failure opening the underlying resource.
    fn open(&self) -> std::io::Result<Box<dyn BufRead + '_>>;
}

impl<T: ConfigLookup + ?Sized> ConfigLookup for &T {
    fn get(&self, path: &KeyPath) -> Option<ConfigValue> {
        (**self).get(path)
    }
}

impl<T: TemplateDocument + ?Sized> TemplateDocument for &T {
    fn keys(&self, include_nested: bool) -> Result<Vec<KeyPath>, KeyEnumerationError> {
        (**self).keys(include_nested)
    }
}

impl RawTemplateSource for str {
    fn open(&self) -> std::io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(self.as_bytes()))
    }
}

impl RawTemplateSource for String {
    fn open(&self) -> std::io::Result<Box<dyn BufRead + '_>> {
        self.as_str().open()
    }
}

impl<T: RawTemplateSource + ?Sized> RawTemplateSource for &T {
    fn open(&self) -> std::io::Result<Box<dyn BufRead + '_>> {
        (**self).open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn str_source_reads_text() {
        let text = String::from("a: 1\nb: 2\n");
        let mut out = String::new();
        text.open().unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, text);
    }
}
