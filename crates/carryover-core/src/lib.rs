//! Carryover Core
//!
//! Migrates a user's configuration document onto a newer template while
//! keeping the user's values and the template's comments.
//!
//! # Core Operations
//!
//! - **Format**: dotted key path → indented `key: ` prefix
//! - **Resolve**: pick the version stamp, the user's value, or the default
//! - **Associate**: attach template comment blocks to the keys they precede
//! - **Serialize**: render the entries back to text
//!
//! # Architecture
//!
//! ```text
//! TemplateDocument ─┐
//!                   ├─→ BuildSchema → AssociateComments → Serialize → String
//! ConfigLookup ─────┘          ↑
//!                     RawTemplateSource
//! ```
//!
//! The engine does no file I/O; callers supply the lookups and the raw
//! template text and persist the returned output themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use carryover_core::MigrationEngine;
//!
//! let engine = MigrationEngine::default();
//! let migration = engine.migrate(&user_config, &template, template_text)?;
//! std::fs::write("config.yml", &migration.output)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod comments;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod lookup;
pub mod path;
pub mod resolve;
pub mod schema;
pub mod serialize;
pub mod value;

// Re-exports for convenience
pub use comments::{CommentAssociator, CommentMap};
pub use config::{MigrationConfig, DEFAULT_VERSION_KEY};
pub use engine::{Migration, MigrationEngine, MigrationReport};
pub use error::{KeyEnumerationError, MigrationError, MigrationResult};
pub use format::FormattedKey;
pub use lookup::{ConfigLookup, RawTemplateSource, TemplateDocument};
pub use path::{KeyPath, PathError};
pub use resolve::{Resolved, ValueOrigin, ValueResolver};
pub use schema::SchemaEntry;
pub use serialize::DocumentSerializer;
pub use value::{ConfigValue, Number};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running migrations
    pub use crate::config::MigrationConfig;
    pub use crate::engine::{Migration, MigrationEngine, MigrationReport};
    pub use crate::error::{MigrationError, MigrationResult};
    pub use crate::lookup::{ConfigLookup, RawTemplateSource, TemplateDocument};
    pub use crate::path::KeyPath;
    pub use crate::value::ConfigValue;
}
