//! Async repositories over the storage layer.
//!
//! Repositories are traits so view-models and tests can swap in fakes.
//! The `SQLite` implementations share one [`Database`] handle and run every
//! statement on tokio's blocking pool.

mod database;
mod list;
mod spot;

pub use database::Database;
pub use list::{ListRepository, SqliteListRepository};
pub use spot::{FoodSpotRepository, SqliteFoodSpotRepository};
