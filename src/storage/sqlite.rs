//! `SQLite` storage implementation.
//!
//! Both tables live in one database file so the `foodspots.list_id`
//! foreign key, and with it the cascade on list deletion, is enforced.

// SQLite stores all integers as i64. Counts and versions are non-negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::timestamp::{self, TimestampPolicy};
use crate::core::{FoodSpot, FoodSpotList};
use crate::error::{IoError, Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, GET_VERSION_SQL, SCHEMA_INFO_SQL, SET_VERSION_SQL, SchemaAction, TABLES,
    TableSchema,
};
use crate::storage::traits::{Storage, StorageStats};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

const SPOT_COLUMNS: &str =
    "id, name, address, rating, comment, date_added, category, menu, list_id";

/// SQLite-based storage implementation.
///
/// # Examples
///
/// ```no_run
/// use munch_rs::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::open("munch.db").unwrap();
/// storage.init().unwrap();
/// ```
pub struct SqliteStorage {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
    /// How unreadable `date_added` values are handled.
    timestamp_policy: TimestampPolicy,
}

/// A `foodspots` row before its timestamp is decoded.
struct SpotRow {
    id: i64,
    name: String,
    address: String,
    rating: i64,
    comment: Option<String>,
    date_added: Option<String>,
    category: Option<String>,
    menu: Option<String>,
    list_id: i64,
}

impl SpotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            rating: row.get(3)?,
            comment: row.get(4)?,
            date_added: row.get(5)?,
            category: row.get(6)?,
            menu: row.get(7)?,
            list_id: row.get(8)?,
        })
    }

    fn into_spot(self, policy: TimestampPolicy) -> Result<FoodSpot> {
        let (date_added, date_recovered) =
            timestamp::decode_timestamp(policy, self.id, self.date_added.as_deref())?;

        let rating = u8::try_from(self.rating).unwrap_or_else(|_| {
            let clamped = self.rating.clamp(0, i64::from(u8::MAX)) as u8;
            tracing::warn!(
                spot_id = self.id,
                stored = self.rating,
                rating = clamped,
                "stored rating out of range, clamped"
            );
            clamped
        });

        Ok(FoodSpot {
            id: Some(self.id),
            name: self.name,
            address: self.address,
            rating,
            comment: self.comment.unwrap_or_default(),
            list_id: self.list_id,
            date_added,
            category: self.category.unwrap_or_default(),
            menu: self.menu.unwrap_or_default(),
            date_recovered,
        })
    }
}

impl SqliteStorage {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;
        Self::configure(&conn)?;

        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        tracing::debug!(path = %path.display(), "opened database");

        Ok(Self {
            conn,
            path: Some(path),
            timestamp_policy: TimestampPolicy::default(),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::configure(&conn)?;

        Ok(Self {
            conn,
            path: None,
            timestamp_policy: TimestampPolicy::default(),
        })
    }

    fn configure(conn: &Connection) -> Result<()> {
        // Off by default in SQLite; the cascade depends on it
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Sets how unreadable timestamps are handled on read.
    #[must_use]
    pub const fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    /// Returns the timestamp policy.
    #[must_use]
    pub const fn timestamp_policy(&self) -> TimestampPolicy {
        self.timestamp_policy
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the connection, reporting errors from the final flush.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` fails to close the handle.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::from(e))?;
        Ok(())
    }

    fn has_schema_info(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    /// Gets the stored schema version of a table.
    fn table_version(&self, schema: &TableSchema) -> Result<Option<u32>> {
        if !self.has_schema_info()? {
            return Ok(None);
        }

        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, params![schema.version_key()], |row| {
                row.get(0)
            })
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    fn spot_rows(&self, sql: &str, arg: i64) -> Result<Vec<SpotRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(StorageError::from)?;
        let rows = stmt
            .query_map(params![arg], SpotRow::from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;
        Ok(rows)
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        let tx = self.conn.transaction().map_err(StorageError::from)?;
        tx.execute_batch(SCHEMA_INFO_SQL)
            .map_err(StorageError::from)?;

        for schema in TABLES {
            let stored: Option<u32> = tx
                .query_row(GET_VERSION_SQL, params![schema.version_key()], |row| {
                    row.get::<_, String>(0)
                })
                .optional()
                .map_err(StorageError::from)?
                .and_then(|v| v.parse().ok());

            match schema.action_for(stored) {
                SchemaAction::UpToDate => continue,
                SchemaAction::Unsupported { found } => {
                    return Err(StorageError::Migration(format!(
                        "table {} has schema version {found}, newest supported is {}",
                        schema.table, schema.version
                    ))
                    .into());
                }
                SchemaAction::Create => {
                    tracing::info!(table = schema.table, version = schema.version, "creating table");
                }
                SchemaAction::Recreate { from } => {
                    tracing::warn!(
                        table = schema.table,
                        from,
                        to = schema.version,
                        "schema upgrade drops existing rows"
                    );
                }
            }

            tx.execute_batch(&schema.drop_sql())
                .and_then(|()| tx.execute_batch(schema.create_sql))
                .map_err(|e| StorageError::Migration(format!("{}: {e}", schema.table)))?;
            tx.execute(
                SET_VERSION_SQL,
                params![schema.version_key(), schema.version.to_string()],
            )
            .map_err(StorageError::from)?;
        }

        tx.commit().map_err(StorageError::from)?;
        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        for schema in TABLES {
            if self.table_version(schema)?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM foodspots;
            DELETE FROM lists;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn stats(&self) -> Result<StorageStats> {
        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StorageStats {
            list_count: self.count("lists")?,
            spot_count: self.count("foodspots")?,
            lists_version: self.table_version(&TABLES[0])?,
            foodspots_version: self.table_version(&TABLES[1])?,
            db_size,
        })
    }

    // ==================== List Operations ====================

    fn insert_list(&mut self, name: &str, owner: &str, icon: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO lists (name, owner, icon) VALUES (?, ?, ?)",
                params![name, owner, icon],
            )
            .map_err(StorageError::from)?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name, "inserted list");
        Ok(id)
    }

    fn all_lists(&self) -> Result<Vec<FoodSpotList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, owner, icon FROM lists ORDER BY id")
            .map_err(StorageError::from)?;

        let lists = stmt
            .query_map([], |row| {
                Ok(FoodSpotList {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    owner: row.get(2)?,
                    icon: row.get(3)?,
                    spots: Vec::new(),
                })
            })
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(lists)
    }

    fn delete_list(&mut self, name: &str) -> Result<usize> {
        // Spots are deleted automatically via CASCADE
        let deleted = self
            .conn
            .execute("DELETE FROM lists WHERE name = ?", params![name])
            .map_err(StorageError::from)?;
        tracing::debug!(name, deleted, "deleted list");
        Ok(deleted)
    }

    fn delete_all_lists(&mut self) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM lists", [])
            .map_err(StorageError::from)?;
        Ok(deleted)
    }

    fn update_list(
        &mut self,
        old_name: &str,
        new_name: &str,
        owner: &str,
        icon: &str,
    ) -> Result<usize> {
        let updated = self
            .conn
            .execute(
                "UPDATE lists SET name = ?, owner = ?, icon = ? WHERE name = ?",
                params![new_name, owner, icon, old_name],
            )
            .map_err(StorageError::from)?;

        if updated > 1 {
            tracing::warn!(old_name, updated, "renamed several lists sharing one name");
        }
        Ok(updated)
    }

    fn list_exists(&self, name: &str) -> Result<bool> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM lists WHERE name = ?)",
                params![name],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(exists)
    }

    fn list_id_for(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM lists WHERE name = ? ORDER BY id LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;
        Ok(id)
    }

    // ==================== Spot Operations ====================

    fn insert_spot(&mut self, spot: &FoodSpot) -> Result<i64> {
        self.conn
            .execute(
                r"
            INSERT INTO foodspots (
                name, address, rating, comment, date_added, category, menu, list_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
                params![
                    spot.name,
                    spot.address,
                    spot.rating,
                    spot.comment,
                    timestamp::format_timestamp(&spot.date_added),
                    spot.category,
                    spot.menu,
                    spot.list_id,
                ],
            )
            .map_err(StorageError::from)?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, list_id = spot.list_id, "inserted spot");
        Ok(id)
    }

    fn spots_for_list(&self, list_id: i64) -> Result<Vec<FoodSpot>> {
        let sql = format!("SELECT {SPOT_COLUMNS} FROM foodspots WHERE list_id = ? ORDER BY id");
        self.spot_rows(&sql, list_id)?
            .into_iter()
            .map(|row| row.into_spot(self.timestamp_policy))
            .collect()
    }

    fn delete_spots_for_list(&mut self, list_id: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM foodspots WHERE list_id = ?", params![list_id])
            .map_err(StorageError::from)?;
        Ok(deleted)
    }

    fn delete_spot(&mut self, id: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM foodspots WHERE id = ?", params![id])
            .map_err(StorageError::from)?;
        Ok(deleted)
    }

    fn update_spot(&mut self, spot: &FoodSpot) -> Result<usize> {
        let Some(id) = spot.id else {
            tracing::debug!(name = %spot.name, "update of unsaved spot ignored");
            return Ok(0);
        };

        // A recovered date is a placeholder; the stored text is kept as is.
        let updated = if spot.date_recovered {
            self.conn.execute(
                r"
            UPDATE foodspots SET
                name = ?, address = ?, rating = ?, comment = ?,
                category = ?, menu = ?, list_id = ?
            WHERE id = ?
        ",
                params![
                    spot.name,
                    spot.address,
                    spot.rating,
                    spot.comment,
                    spot.category,
                    spot.menu,
                    spot.list_id,
                    id,
                ],
            )
        } else {
            self.conn.execute(
                r"
            UPDATE foodspots SET
                name = ?, address = ?, rating = ?, comment = ?, date_added = ?,
                category = ?, menu = ?, list_id = ?
            WHERE id = ?
        ",
                params![
                    spot.name,
                    spot.address,
                    spot.rating,
                    spot.comment,
                    timestamp::format_timestamp(&spot.date_added),
                    spot.category,
                    spot.menu,
                    spot.list_id,
                    id,
                ],
            )
        }
        .map_err(StorageError::from)?;
        Ok(updated)
    }

    fn spot_by_id(&self, id: i64) -> Result<Option<FoodSpot>> {
        let sql = format!("SELECT {SPOT_COLUMNS} FROM foodspots WHERE id = ?");
        self.spot_rows(&sql, id)?
            .into_iter()
            .next()
            .map(|row| row.into_spot(self.timestamp_policy))
            .transpose()
    }
}
