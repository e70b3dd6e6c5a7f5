//! # munch-rs
//!
//! Named lists of food spots, kept in a local `SQLite` database.
//!
//! Each list has a unique name, an owner and an icon. Each spot belongs to
//! exactly one list and carries an address, a rating from 1 to 5, a
//! comment, a category, a menu reference and the time it was added.
//!
//! ## Layers
//!
//! - [`storage`]: synchronous table access and schema versioning
//! - [`repository`]: async repositories over a shared [`Database`] handle
//! - [`viewmodel`]: screen state machines driven by user intents
//! - [`location`]: geocoding, device location and great-circle distance
//! - [`cli`]: the `munch` command-line front end

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod location;
pub mod repository;
pub mod storage;
pub mod viewmodel;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{DEFAULT_ICON, FoodSpot, FoodSpotList, RATING_RANGE, TimestampPolicy};

// Re-export storage and repository types
pub use repository::{
    Database, FoodSpotRepository, ListRepository, SqliteFoodSpotRepository, SqliteListRepository,
};
pub use storage::{DEFAULT_DB_PATH, SqliteStorage, Storage};

// Re-export view-models
pub use viewmodel::{
    FoodSpotViewModel, FoodSpotViewModelApi, ListViewModel, ListViewModelApi, LocationViewModel,
};

// Re-export location types
pub use location::{GeoPoint, Geocoder, LocationProvider, distance_km};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
