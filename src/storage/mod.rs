//! Storage layer for munch-rs.
//!
//! Synchronous `SQLite` access to the `lists` and `foodspots` tables,
//! including per-table schema versions and destructive upgrades.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{FOODSPOTS_SCHEMA, LISTS_SCHEMA, TableSchema};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageStats};

/// Default database file name.
pub const DEFAULT_DB_NAME: &str = "munch.db";

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".munch/munch.db";
