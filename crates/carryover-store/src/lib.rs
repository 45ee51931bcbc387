//! Carryover Store
//!
//! The boundary between config files on disk and the migration engine.
//!
//! # Core Operations
//!
//! - **Read**: parse config and template files into [`YamlDocument`] lookups
//! - **Migrate**: run the engine with the template file as comment source
//! - **Persist**: replace the config file atomically, then reload it
//!
//! # Example
//!
//! ```rust,ignore
//! use carryover_store::ConfigStore;
//!
//! let store = ConfigStore::new("plugins/ctplus/config.yml", "defaults/config.yml");
//! if let Some(outcome) = store.migrate_if_outdated()? {
//!     println!("{} values kept", outcome.report.preserved);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod layout;
pub mod settings;
pub mod source;
pub mod store;

// Re-exports for convenience
pub use document::YamlDocument;
pub use error::{DocumentError, StoreError, StoreResult};
pub use settings::{load_settings, parse_settings};
pub use source::FileTemplateSource;
pub use store::{ConfigSnapshot, ConfigStore, MigrationOutcome};
