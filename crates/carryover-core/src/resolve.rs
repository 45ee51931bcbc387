//! Value resolution
//!
//! Decides which value each template key carries into the output:
//! 1. the version key always takes the template's value
//! 2. otherwise the user's value, when present
//! 3. otherwise the template's default, which may be absent

use crate::lookup::ConfigLookup;
use crate::path::KeyPath;
use crate::value::ConfigValue;
use serde::Serialize;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Version key, stamped from the template
    TemplateVersion,
    /// Kept from the user's document
    Preserved,
    /// Template default for a new or unset key
    TemplateDefault,
}

/// A value together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Effective value
    pub value: ConfigValue,
    /// Which document supplied it
    pub origin: ValueOrigin,
}

/// Resolves effective values against the old and template documents
#[derive(Debug, Clone)]
pub struct ValueResolver {
    version_key: KeyPath,
}

impl ValueResolver {
    /// Create resolver stamping `version_key` from the template
    #[inline]
    #[must_use]
    pub fn new(version_key: KeyPath) -> Self {
        Self { version_key }
    }

    /// The key whose value always tracks the template
    #[inline]
    #[must_use]
    pub fn version_key(&self) -> &KeyPath {
        &self.version_key
    }

    /// Effective value at `path`, or `None` when neither document has one
    pub fn resolve<O, T>(&self, path: &KeyPath, old: &O, template: &T) -> Option<ConfigValue>
    where
        O: ConfigLookup + ?Sized,
        T: ConfigLookup + ?Sized,
    {
        self.resolve_traced(path, old, template).map(|r| r.value)
    }

    /// Same as [`resolve`](Self::resolve), also reporting the origin
    pub fn resolve_traced<O, T>(&self, path: &KeyPath, old: &O, template: &T) -> Option<Resolved>
    where
        O: ConfigLookup + ?Sized,
        T: ConfigLookup + ?Sized,
    {
        if *path == self.version_key {
            return template.get(path).map(|value| Resolved {
                value,
                origin: ValueOrigin::TemplateVersion,
            });
        }

        if let Some(value) = old.get(path) {
            return Some(Resolved {
                value,
                origin: ValueOrigin::Preserved,
            });
        }

        template.get(path).map(|value| Resolved {
            value,
            origin: ValueOrigin::TemplateDefault,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Doc(HashMap<String, ConfigValue>);

    impl Doc {
        fn of(pairs: &[(&str, ConfigValue)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
            )
        }
    }

    impl ConfigLookup for Doc {
        fn get(&self, path: &KeyPath) -> Option<ConfigValue> {
            self.0.get(&path.dotted()).cloned()
        }
    }

    fn path(s: &str) -> KeyPath {
        s.parse().unwrap()
    }

    fn resolver() -> ValueResolver {
        ValueResolver::new(path("config-version"))
    }

    #[test]
    fn version_key_comes_from_template() {
        let old = Doc::of(&[("config-version", 3.into())]);
        let template = Doc::of(&[("config-version", 7.into())]);

        let resolved = resolver()
            .resolve_traced(&path("config-version"), &old, &template)
            .unwrap();
        assert_eq!(resolved.value, ConfigValue::from(7));
        assert_eq!(resolved.origin, ValueOrigin::TemplateVersion);
    }

    #[test]
    fn version_key_absent_in_template_stays_absent() {
        let old = Doc::of(&[("config-version", 3.into())]);
        let template = Doc::of(&[]);
        assert!(resolver()
            .resolve(&path("config-version"), &old, &template)
            .is_none());
    }

    #[test]
    fn user_value_wins_over_default() {
        let old = Doc::of(&[("tag-duration", 30.into())]);
        let template = Doc::of(&[("tag-duration", 15.into())]);

        let resolved = resolver()
            .resolve_traced(&path("tag-duration"), &old, &template)
            .unwrap();
        assert_eq!(resolved.value, ConfigValue::from(30));
        assert_eq!(resolved.origin, ValueOrigin::Preserved);
    }

    #[test]
    fn default_fills_new_key() {
        let old = Doc::of(&[]);
        let template = Doc::of(&[("spawn-npc", false.into())]);

        let resolved = resolver()
            .resolve_traced(&path("spawn-npc"), &old, &template)
            .unwrap();
        assert_eq!(resolved.value, ConfigValue::from(false));
        assert_eq!(resolved.origin, ValueOrigin::TemplateDefault);
    }

    #[test]
    fn section_key_without_values_is_absent() {
        let old = Doc::of(&[]);
        let template = Doc::of(&[("duration-words.hours", "h".into())]);
        assert!(resolver()
            .resolve(&path("duration-words"), &old, &template)
            .is_none());
    }
}
