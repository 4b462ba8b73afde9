//! # Hearth Config
//!
//! Per-tenant configuration for Hearth Bot.
//!
//! This crate owns the persisted multi-tenant document: loading it, migrating
//! older records to the current schema, and writing it back atomically. It
//! also loads the process settings the binary starts from.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod loader;
pub mod migrate;
pub mod schema;
pub mod settings;
pub mod store;

pub use defaults::*;
pub use error::ConfigError;
pub use loader::{ConfigDocument, DocumentLoader, TENANTS_KEY};
pub use migrate::{new_rule_id, DefaultingMigrator};
pub use schema::*;
pub use settings::{BotSettings, LogSettings, SettingsError};
pub use store::ConfigStore;
