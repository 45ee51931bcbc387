//! Testing utilities for carryover workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use carryover_core::{ConfigLookup, ConfigValue, KeyEnumerationError, KeyPath, TemplateDocument};
use indexmap::IndexMap;

/// Ordered in-memory document
///
/// Keys mapped to `None` are sections: they are enumerated but hold no value.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    entries: IndexMap<String, Option<ConfigValue>>,
}

impl MapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.entries.insert(key.to_string(), Some(value.into()));
        self
    }

    pub fn with_section(mut self, key: &str) -> Self {
        self.entries.insert(key.to_string(), None);
        self
    }

    pub fn set(&mut self, key: &str, value: Option<ConfigValue>) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigLookup for MapDocument {
    fn get(&self, path: &KeyPath) -> Option<ConfigValue> {
        self.entries.get(&path.dotted()).cloned().flatten()
    }
}

impl TemplateDocument for MapDocument {
    fn keys(&self, include_nested: bool) -> Result<Vec<KeyPath>, KeyEnumerationError> {
        self.entries
            .keys()
            .filter(|k| include_nested || !k.contains('.'))
            .map(|k| k.parse().map_err(|e| KeyEnumerationError::new(format!("{k}: {e}"))))
            .collect()
    }
}

/// Template text in the style of a shipped default config
pub const SAMPLE_TEMPLATE: &str = "\
# Do not change this value
config-version: 3

# Seconds before a player is untagged
tag-duration: 15

# Spawn an NPC when a tagged player logs out
spawn-npc: false

# Message shown when tagged
tag-message: '&cYou are now in combat!'

# Commands blocked while tagged
command-blacklist:
  - 'fly'
  - 'home'

duration-words:
  # Suffix for hours
  hours: 'h'
  minutes: 'm'
";

/// Values of [`SAMPLE_TEMPLATE`], in declaration order
pub fn sample_template() -> MapDocument {
    MapDocument::new()
        .with("config-version", 3)
        .with("tag-duration", 15)
        .with("spawn-npc", false)
        .with("tag-message", "&cYou are now in combat!")
        .with("command-blacklist", vec!["fly", "home"])
        .with_section("duration-words")
        .with("duration-words.hours", "h")
        .with("duration-words.minutes", "m")
}

/// A user config written against version 2 of the template
pub fn sample_user_config() -> MapDocument {
    MapDocument::new()
        .with("config-version", 2)
        .with("tag-duration", 30)
        .with("tag-message", "&4Combat!")
        .with("command-blacklist", vec!["spawn"])
        .with("barapi", true)
}

/// Expected result of migrating [`sample_user_config`] onto the sample template
pub const SAMPLE_MIGRATED: &str = concat!(
    "# Do not change this value\n",
    "config-version: 3\n\n",
    "# Seconds before a player is untagged\n",
    "tag-duration: 30\n\n",
    "# Spawn an NPC when a tagged player logs out\n",
    "spawn-npc: false\n\n",
    "# Message shown when tagged\n",
    "tag-message: '&4Combat!'\n\n",
    "# Commands blocked while tagged\n",
    "command-blacklist: \n",
    "  - 'spawn'\n\n",
    "  duration-words.hours: 'h'\n\n",
    "  duration-words.minutes: 'm'",
);
