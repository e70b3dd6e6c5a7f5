//! Spot repository.

use super::Database;
use crate::core::FoodSpot;
use crate::error::Result;
use crate::storage::Storage;
use async_trait::async_trait;

/// Repository for spot persistence. Spots are addressed by ID.
#[async_trait]
pub trait FoodSpotRepository: Send + Sync {
    /// Inserts a spot and returns the assigned ID.
    async fn insert(&self, spot: &FoodSpot) -> Result<i64>;

    /// All spots of a list, oldest first.
    async fn spots_for_list(&self, list_id: i64) -> Result<Vec<FoodSpot>>;

    /// Deletes every spot of a list.
    async fn delete_all_for_list(&self, list_id: i64) -> Result<usize>;

    /// Deletes the spot with `spot.id`. Unsaved spots delete nothing.
    async fn delete(&self, spot: &FoodSpot) -> Result<usize>;

    /// Rewrites the spot with `spot.id`.
    async fn update(&self, spot: &FoodSpot) -> Result<usize>;

    /// Looks a spot up by ID.
    async fn by_id(&self, id: i64) -> Result<Option<FoodSpot>>;
}

/// [`FoodSpotRepository`] backed by the shared [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteFoodSpotRepository {
    db: Database,
}

impl SqliteFoodSpotRepository {
    /// Creates a repository on `db`.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodSpotRepository for SqliteFoodSpotRepository {
    async fn insert(&self, spot: &FoodSpot) -> Result<i64> {
        let spot = spot.clone();
        self.db.run(move |s| s.insert_spot(&spot)).await
    }

    async fn spots_for_list(&self, list_id: i64) -> Result<Vec<FoodSpot>> {
        self.db.run(move |s| s.spots_for_list(list_id)).await
    }

    async fn delete_all_for_list(&self, list_id: i64) -> Result<usize> {
        self.db.run(move |s| s.delete_spots_for_list(list_id)).await
    }

    async fn delete(&self, spot: &FoodSpot) -> Result<usize> {
        let Some(id) = spot.id else {
            return Ok(0);
        };
        self.db.run(move |s| s.delete_spot(id)).await
    }

    async fn update(&self, spot: &FoodSpot) -> Result<usize> {
        let spot = spot.clone();
        self.db.run(move |s| s.update_spot(&spot)).await
    }

    async fn by_id(&self, id: i64) -> Result<Option<FoodSpot>> {
        self.db.run(move |s| s.spot_by_id(id)).await
    }
}
