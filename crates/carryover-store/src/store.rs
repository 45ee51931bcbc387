//! Config store - file-backed migration entry point
//!
//! Owns the two file locations involved in a migration:
//! - the user's config file (read, then replaced atomically)
//! - the packaged template file (read only)
//!
//! Readers never see a half-written config: output goes to a temporary file
//! in the same directory and is renamed over the config only once complete.

use crate::document::YamlDocument;
use crate::error::{StoreError, StoreResult};
use crate::source::FileTemplateSource;
use carryover_core::{
    ConfigLookup, ConfigValue, KeyPath, Migration, MigrationEngine, MigrationError, MigrationReport,
    MigrationResult,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Immutable view of the config as last loaded
///
/// Cheap to clone; rebuilt only by [`ConfigStore::reload`].
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    config: Arc<YamlDocument>,
    template: Arc<YamlDocument>,
    version_key: KeyPath,
}

impl ConfigSnapshot {
    /// Value at a dotted key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get_dotted(key)
    }

    /// The user's document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &YamlDocument {
        &self.config
    }

    /// The template document
    #[inline]
    #[must_use]
    pub fn template(&self) -> &YamlDocument {
        &self.template
    }

    /// Version stamped in the user's config, 0 when missing
    #[must_use]
    pub fn config_version(&self) -> i64 {
        version_of(self.config.as_ref(), &self.version_key)
    }

    /// Version of the template, 0 when missing
    #[must_use]
    pub fn latest_version(&self) -> i64 {
        version_of(self.template.as_ref(), &self.version_key)
    }

    /// Whether the user's config predates the template
    #[inline]
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        self.config_version() < self.latest_version()
    }
}

fn version_of(doc: &YamlDocument, key: &KeyPath) -> i64 {
    doc.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
}

/// Result of a persisted migration
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Run counters
    pub report: MigrationReport,
    /// Config as reloaded from disk after the write
    pub snapshot: ConfigSnapshot,
}

/// File-backed config with template migration
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    template_path: PathBuf,
    engine: MigrationEngine,
}

impl ConfigStore {
    /// Create store with the default engine
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            template_path: template_path.into(),
            engine: MigrationEngine::default(),
        }
    }

    /// With a configured engine
    #[inline]
    #[must_use]
    pub fn with_engine(mut self, engine: MigrationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// User config path
    #[inline]
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Template path
    #[inline]
    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Read both documents into a fresh snapshot
    ///
    /// A missing config file reads as an empty document.
    ///
    /// # Errors
    /// - `StoreError::Read` / `StoreError::Document` for an unreadable or
    ///   invalid config file
    /// - `StoreError::Migration` if the template cannot be read as a document
    pub fn reload(&self) -> StoreResult<ConfigSnapshot> {
        let template = self.read_template()?;
        let config = self.read_config()?;
        Ok(ConfigSnapshot {
            config: Arc::new(config),
            template: Arc::new(template),
            version_key: self.engine.config().version_key.clone(),
        })
    }

    /// Run the migration without writing anything
    ///
    /// # Errors
    /// Same as [`reload`](Self::reload).
    pub fn preview(&self) -> StoreResult<Migration> {
        let snapshot = self.reload()?;
        self.run(&snapshot)
    }

    /// Migrate the config file onto the template and reload it
    ///
    /// # Errors
    /// - any [`reload`](Self::reload) error; nothing is written
    /// - `StoreError::UnreadableOutput` if the migrated text would not read
    ///   back as a document; nothing is written
    /// - `MigrationError::SinkUnavailable` if the output cannot be persisted;
    ///   the existing config file is left as it was
    pub fn migrate(&self) -> StoreResult<MigrationOutcome> {
        let snapshot = self.reload()?;
        self.migrate_snapshot(&snapshot)
    }

    /// Migrate only when the config's version is behind the template's
    ///
    /// # Errors
    /// Same as [`migrate`](Self::migrate).
    pub fn migrate_if_outdated(&self) -> StoreResult<Option<MigrationOutcome>> {
        let snapshot = self.reload()?;
        if !snapshot.is_outdated() {
            tracing::debug!(
                "Config {} is current (version {})",
                self.config_path.display(),
                snapshot.config_version()
            );
            return Ok(None);
        }
        tracing::info!(
            "Config {} is outdated: version {} < {}",
            self.config_path.display(),
            snapshot.config_version(),
            snapshot.latest_version()
        );
        self.migrate_snapshot(&snapshot).map(Some)
    }

    fn migrate_snapshot(&self, snapshot: &ConfigSnapshot) -> StoreResult<MigrationOutcome> {
        let migration = self.run(snapshot)?;
        // Never replace a readable config with one that cannot be reloaded.
        if let Err(e) = YamlDocument::parse(&migration.output) {
            tracing::error!(
                "Migrated output for {} does not read back, keeping existing file: {}",
                self.config_path.display(),
                e
            );
            return Err(StoreError::unreadable_output(&self.config_path, e));
        }
        self.persist(&migration.output)?;
        let snapshot = self.reload()?;
        Ok(MigrationOutcome {
            report: migration.report,
            snapshot,
        })
    }

    fn run(&self, snapshot: &ConfigSnapshot) -> StoreResult<Migration> {
        let source = FileTemplateSource::new(&self.template_path);
        Ok(self
            .engine
            .migrate(snapshot.document(), snapshot.template(), &source)?)
    }

    fn read_template(&self) -> MigrationResult<YamlDocument> {
        let path = &self.template_path;
        let text = std::fs::read_to_string(path).map_err(|e| {
            MigrationError::MissingTemplateKeyEnumeration(format!("{}: {e}", path.display()))
        })?;
        YamlDocument::parse(&text).map_err(|e| {
            MigrationError::MissingTemplateKeyEnumeration(format!("{}: {e}", path.display()))
        })
    }

    fn read_config(&self) -> StoreResult<YamlDocument> {
        let path = &self.config_path;
        match std::fs::read_to_string(path) {
            Ok(text) => YamlDocument::parse(&text).map_err(|e| StoreError::document(path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, migrating from defaults", path.display());
                Ok(YamlDocument::new())
            }
            Err(e) => Err(StoreError::read(path, e)),
        }
    }

    fn persist(&self, output: &str) -> MigrationResult<()> {
        let path = &self.config_path;
        let sink = |e: std::io::Error| {
            tracing::error!("Failed to write migrated config to {}: {}", path.display(), e);
            MigrationError::sink_unavailable(path, e)
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(sink)?;

        let mut file = NamedTempFile::new_in(dir).map_err(sink)?;
        file.write_all(output.as_bytes()).map_err(sink)?;
        file.as_file().sync_all().map_err(sink)?;
        file.persist(path).map_err(|e| sink(e.error))?;

        tracing::info!("Wrote migrated config to {}", path.display());
        Ok(())
    }
}
