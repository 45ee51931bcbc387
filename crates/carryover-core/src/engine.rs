//! Migration engine - main entry point
//!
//! Runs one migration in three phases:
//! - **BuildSchema**: one entry per template key, values resolved
//! - **AssociateComments**: template comment blocks attached to keys
//! - **Serialize**: entries rendered to the output text
//!
//! Only BuildSchema can fail the run. A template source that cannot be read
//! leaves every entry without comments and the run carries on.

use crate::comments::CommentAssociator;
use crate::config::MigrationConfig;
use crate::error::{MigrationError, MigrationResult};
use crate::lookup::{ConfigLookup, RawTemplateSource, TemplateDocument};
use crate::resolve::{ValueOrigin, ValueResolver};
use crate::schema::SchemaEntry;
use crate::serialize::DocumentSerializer;
use crate::value::ConfigValue;
use serde::Serialize;
use std::collections::HashSet;

/// Counters describing one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Template keys enumerated
    pub template_keys: usize,
    /// Entries carrying the user's value
    pub preserved: usize,
    /// Entries filled from template defaults
    pub defaulted: usize,
    /// Whether the version key was stamped from the template
    pub version_stamped: bool,
    /// Entries without any value, left out of the output
    pub skipped: usize,
    /// Entries that received comments
    pub commented: usize,
    /// Whether comment association was abandoned
    pub comments_degraded: bool,
}

impl MigrationReport {
    /// Number of entries written to the output
    #[inline]
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.template_keys - self.skipped
    }
}

/// Output of a migration run
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migrated document text
    pub output: String,
    /// Entries in output order, skipped ones included
    pub entries: Vec<SchemaEntry>,
    /// Run counters
    pub report: MigrationReport,
}

/// Migrates a configuration document to a template's schema
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    config: MigrationConfig,
    resolver: ValueResolver,
    associator: CommentAssociator,
    serializer: DocumentSerializer,
}

impl Default for MigrationEngine {
    fn default() -> Self {
        Self::new(MigrationConfig::default())
    }
}

impl MigrationEngine {
    /// Create engine from configuration
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            resolver: ValueResolver::new(config.version_key.clone()),
            config,
            associator: CommentAssociator::new(),
            serializer: DocumentSerializer::new(),
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Run a full migration
    ///
    /// # Arguments
    /// * `old` - User's current configuration
    /// * `template` - Packaged default configuration
    /// * `source` - Literal text of the template, scanned for comments
    ///
    /// # Errors
    /// - `MigrationError::MissingTemplateKeyEnumeration` if the template
    ///   cannot list its keys
    pub fn migrate<O, T, S>(&self, old: &O, template: &T, source: &S) -> MigrationResult<Migration>
    where
        O: ConfigLookup + ?Sized,
        T: TemplateDocument + ?Sized,
        S: RawTemplateSource + ?Sized,
    {
        let mut entries = self.build_schema(old, template)?;
        tracing::debug!("Built {} schema entries", entries.len());

        let mut report = Self::tally(&entries);

        match self.associate_comments(source, &mut entries) {
            Ok(commented) => report.commented = commented,
            Err(e) => {
                tracing::warn!("Comment association skipped, writing without comments: {}", e);
                report.comments_degraded = true;
            }
        }

        let output = self.serializer.serialize(&entries);
        tracing::info!(
            "Migrated config: {} preserved, {} defaulted, {} skipped",
            report.preserved,
            report.defaulted,
            report.skipped
        );

        Ok(Migration {
            output,
            entries,
            report,
        })
    }

    /// Phase 1: one entry per distinct template key, in template order
    ///
    /// # Errors
    /// - `MigrationError::MissingTemplateKeyEnumeration` if the template
    ///   cannot list its keys
    pub fn build_schema<O, T>(&self, old: &O, template: &T) -> MigrationResult<Vec<SchemaEntry>>
    where
        O: ConfigLookup + ?Sized,
        T: TemplateDocument + ?Sized,
    {
        let keys = template.keys(true).map_err(|e| {
            tracing::error!("Template key enumeration failed: {}", e);
            MigrationError::from(e)
        })?;

        let mut seen = HashSet::with_capacity(keys.len());
        let mut entries = Vec::with_capacity(keys.len());
        for path in keys {
            if !seen.insert(path.clone()) {
                tracing::debug!("Ignoring repeated template key: {}", path);
                continue;
            }
            let resolved = self.resolver.resolve_traced(&path, old, template);
            entries.push(SchemaEntry::new(path, resolved));
        }

        Ok(entries)
    }

    /// Phase 2: attach template comments, returning how many entries got some
    ///
    /// # Errors
    /// - `MigrationError::SourceUnavailable` if the template text cannot be
    ///   opened or read; entries are left untouched
    pub fn associate_comments<S>(&self, source: &S, entries: &mut [SchemaEntry]) -> MigrationResult<usize>
    where
        S: RawTemplateSource + ?Sized,
    {
        let keys: Vec<_> = entries.iter().map(|e| e.key().clone()).collect();
        let map = source
            .open()
            .and_then(|reader| self.associator.associate_reader(reader, &keys))
            .map_err(|e| MigrationError::SourceUnavailable { source: e })?;

        Ok(self.associator.apply(map, entries))
    }

    /// Whether `old` carries an older version than `template`
    ///
    /// A missing or non-integer version counts as 0.
    pub fn is_outdated<O, T>(&self, old: &O, template: &T) -> bool
    where
        O: ConfigLookup + ?Sized,
        T: ConfigLookup + ?Sized,
    {
        let key = &self.config.version_key;
        let version = |value: Option<ConfigValue>| value.and_then(|v| v.as_i64()).unwrap_or(0);
        version(old.get(key)) < version(template.get(key))
    }

    fn tally(entries: &[SchemaEntry]) -> MigrationReport {
        let mut report = MigrationReport {
            template_keys: entries.len(),
            ..MigrationReport::default()
        };
        for entry in entries {
            match entry.origin() {
                Some(ValueOrigin::Preserved) => report.preserved += 1,
                Some(ValueOrigin::TemplateDefault) => report.defaulted += 1,
                Some(ValueOrigin::TemplateVersion) => report.version_stamped = true,
                None => report.skipped += 1,
            }
        }
        report
    }
}
