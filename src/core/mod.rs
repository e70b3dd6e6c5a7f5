//! Core domain models for munch-rs.
//!
//! Lists, spots and timestamp encoding. Pure data with no I/O.

pub mod list;
pub mod spot;
pub mod timestamp;

pub use list::{DEFAULT_ICON, FoodSpotList};
pub use spot::{FoodSpot, RATING_RANGE};
pub use timestamp::TimestampPolicy;
