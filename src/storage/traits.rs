//! Storage trait definition.
//!
//! Synchronous key-column access to the `lists` and `foodspots` tables.
//! The async repositories in [`crate::repository`] run these calls on a
//! blocking thread.

use crate::core::{FoodSpot, FoodSpotList};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent storage backends.
///
/// Missing rows are reported as `None`, `false` or a zero count, never as
/// errors. Errors are reserved for the storage engine itself.
pub trait Storage: Send {
    /// Creates or upgrades the schema.
    ///
    /// Idempotent. Tables whose stored version is older than the current one
    /// are dropped and recreated, losing their rows.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails or a stored version is
    /// newer than this build supports.
    fn init(&mut self) -> Result<()>;

    /// Checks if every table has a recorded schema version.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes all lists and spots but keeps the schema.
    fn reset(&mut self) -> Result<()>;

    /// Gets storage statistics.
    fn stats(&self) -> Result<StorageStats>;

    // ==================== List Operations ====================

    /// Inserts a list and returns its ID.
    ///
    /// Does not check name uniqueness.
    fn insert_list(&mut self, name: &str, owner: &str, icon: &str) -> Result<i64>;

    /// Returns all lists in insertion order, without their spots.
    fn all_lists(&self) -> Result<Vec<FoodSpotList>>;

    /// Deletes every list with this name. Their spots cascade.
    ///
    /// Returns the number of deleted lists.
    fn delete_list(&mut self, name: &str) -> Result<usize>;

    /// Deletes all lists. Their spots cascade.
    fn delete_all_lists(&mut self) -> Result<usize>;

    /// Rewrites every list named `old_name`.
    ///
    /// Returns the number of rows changed. When duplicate names slipped in,
    /// all of them are renamed.
    fn update_list(&mut self, old_name: &str, new_name: &str, owner: &str, icon: &str)
    -> Result<usize>;

    /// Checks whether a list with this name exists.
    fn list_exists(&self, name: &str) -> Result<bool>;

    /// Returns the ID of the first list with this name.
    fn list_id_for(&self, name: &str) -> Result<Option<i64>>;

    // ==================== Spot Operations ====================

    /// Inserts a spot and returns its ID. The spot's own `id` is ignored.
    fn insert_spot(&mut self, spot: &FoodSpot) -> Result<i64>;

    /// Returns all spots of a list ordered by ID.
    fn spots_for_list(&self, list_id: i64) -> Result<Vec<FoodSpot>>;

    /// Deletes all spots of a list.
    fn delete_spots_for_list(&mut self, list_id: i64) -> Result<usize>;

    /// Deletes one spot by ID.
    fn delete_spot(&mut self, id: i64) -> Result<usize>;

    /// Rewrites every column of the spot with `spot.id`.
    ///
    /// A spot without ID changes nothing.
    fn update_spot(&mut self, spot: &FoodSpot) -> Result<usize>;

    /// Retrieves a spot by ID.
    fn spot_by_id(&self, id: i64) -> Result<Option<FoodSpot>>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of lists stored.
    pub list_count: usize,
    /// Number of spots across all lists.
    pub spot_count: usize,
    /// Schema version of `lists`.
    pub lists_version: Option<u32>,
    /// Schema version of `foodspots`.
    pub foodspots_version: Option<u32>,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
