//! Database schema definitions.
//!
//! Each table owns its schema version. When the stored version is older
//! than the compiled-in one the table is dropped and recreated; there are
//! no incremental migrations.

/// SQL for the version bookkeeping table.
pub const SCHEMA_INFO_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// SQL to check if schema bookkeeping exists.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name='schema_info';
";

/// SQL to get a table's schema version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = ?;
";

/// SQL to set a table's schema version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES (?, ?);
";

/// Schema definition for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub table: &'static str,
    /// Current schema version.
    pub version: u32,
    /// `CREATE TABLE` statement.
    pub create_sql: &'static str,
}

/// What `init` has to do for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// No version recorded: create from scratch.
    Create,
    /// Stored version is older: drop and recreate.
    Recreate {
        /// Version found in `schema_info`.
        from: u32,
    },
    /// Stored version is newer than this build understands.
    Unsupported {
        /// Version found in `schema_info`.
        found: u32,
    },
    /// Nothing to do.
    UpToDate,
}

impl TableSchema {
    /// Key under which the version is kept in `schema_info`.
    #[must_use]
    pub fn version_key(&self) -> String {
        format!("{}_version", self.table)
    }

    /// `DROP TABLE` statement.
    #[must_use]
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {};", self.table)
    }

    /// Decides what to do given the stored version.
    #[must_use]
    pub fn action_for(&self, stored: Option<u32>) -> SchemaAction {
        match stored {
            None => SchemaAction::Create,
            Some(v) if v < self.version => SchemaAction::Recreate { from: v },
            Some(v) if v > self.version => SchemaAction::Unsupported { found: v },
            Some(_) => SchemaAction::UpToDate,
        }
    }
}

/// The `lists` table.
pub const LISTS_SCHEMA: TableSchema = TableSchema {
    table: "lists",
    version: 9,
    create_sql: r"
CREATE TABLE lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    owner TEXT NOT NULL,
    icon TEXT NOT NULL
);

-- Names are looked up on every existence check
CREATE INDEX IF NOT EXISTS idx_lists_name ON lists(name);
",
};

/// The `foodspots` table.
pub const FOODSPOTS_SCHEMA: TableSchema = TableSchema {
    table: "foodspots",
    version: 5,
    create_sql: r"
CREATE TABLE foodspots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    rating INTEGER NOT NULL,
    comment TEXT,
    date_added TEXT,
    category TEXT,
    menu TEXT,
    list_id INTEGER NOT NULL,
    FOREIGN KEY (list_id) REFERENCES lists(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_foodspots_list ON foodspots(list_id);
",
};

/// All tables, parents before children.
pub const TABLES: &[TableSchema] = &[LISTS_SCHEMA, FOODSPOTS_SCHEMA];
