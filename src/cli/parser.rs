//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::DEFAULT_ICON;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// munch: named lists of food spots.
///
/// Keeps lists of restaurants, cafés and street food with ratings,
/// categories and menus, and estimates how far away they are.
#[derive(Parser, Debug)]
#[command(name = "munch")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file.
    ///
    /// Defaults to `.munch/munch.db` in the current directory.
    #[arg(short, long, env = "MUNCH_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Owner recorded on new lists.
    ///
    /// Defaults to the OS user name.
    #[arg(long, env = "MUNCH_OWNER", global = true)]
    pub owner: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Fail on unreadable stored timestamps instead of substituting now.
    #[arg(long, global = true)]
    pub strict_timestamps: bool,

    /// JSON file mapping addresses to coordinates.
    #[arg(long, env = "MUNCH_GAZETTEER", global = true)]
    pub gazetteer: Option<PathBuf>,

    /// Device latitude used for distances.
    #[arg(long, requires = "device_lon", allow_negative_numbers = true, global = true)]
    pub device_lat: Option<f64>,

    /// Device longitude used for distances.
    #[arg(long, requires = "device_lat", allow_negative_numbers = true, global = true)]
    pub device_lon: Option<f64>,

    /// Geocoding timeout in milliseconds.
    #[arg(long, default_value = "3000", global = true)]
    pub geocode_timeout_ms: u64,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Show database status.
    Status,

    /// Delete all lists and spots.
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage lists.
    #[command(subcommand)]
    List(ListCommands),

    /// Manage the spots of a list.
    #[command(subcommand)]
    Spot(SpotCommands),

    /// Request the device location once.
    Locate,

    /// Great-circle distance between two points.
    Distance {
        /// Latitude of the first point.
        #[arg(allow_negative_numbers = true)]
        lat1: f64,

        /// Longitude of the first point.
        #[arg(allow_negative_numbers = true)]
        lon1: f64,

        /// Latitude of the second point.
        #[arg(allow_negative_numbers = true)]
        lat2: f64,

        /// Longitude of the second point.
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

/// List subcommands.
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a list.
    Add {
        /// List name (must be unique).
        name: String,

        /// Icon tag.
        #[arg(short, long, default_value = DEFAULT_ICON)]
        icon: String,
    },

    /// Show all lists.
    #[command(alias = "list")]
    Ls {
        /// Only lists whose name contains this text.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Rename a list or change its icon.
    Edit {
        /// Current name.
        old_name: String,

        /// New name.
        new_name: String,

        /// New icon tag (keeps the current one if omitted).
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a list and its spots.
    #[command(alias = "delete")]
    Rm {
        /// List name.
        name: String,
    },
}

/// Spot subcommands.
#[derive(Subcommand, Debug)]
pub enum SpotCommands {
    /// Add a spot to a list.
    Add {
        /// List name.
        list: String,

        /// Spot name.
        name: String,

        /// Postal address.
        #[arg(short, long)]
        address: String,

        /// Rating from 1 to 5.
        #[arg(short, long, default_value = "1")]
        rating: u8,

        /// Free-text comment.
        #[arg(short, long, default_value = "")]
        comment: String,

        /// Cuisine or venue category.
        #[arg(long, default_value = "")]
        category: String,

        /// Menu reference, e.g. a URL.
        #[arg(short, long, default_value = "")]
        menu: String,
    },

    /// Show the spots of a list.
    #[command(alias = "list")]
    Ls {
        /// List name.
        list: String,

        /// Only spots whose name contains this text.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one spot.
    Show {
        /// Spot ID.
        id: i64,
    },

    /// Change fields of a spot.
    Edit {
        /// Spot ID.
        id: i64,

        /// New name.
        #[arg(short, long)]
        name: Option<String>,

        /// New address.
        #[arg(short, long)]
        address: Option<String>,

        /// New rating from 1 to 5.
        #[arg(short, long)]
        rating: Option<u8>,

        /// New comment.
        #[arg(short, long)]
        comment: Option<String>,

        /// New category.
        #[arg(long)]
        category: Option<String>,

        /// New menu reference.
        #[arg(short, long)]
        menu: Option<String>,
    },

    /// Delete one spot.
    #[command(alias = "delete")]
    Rm {
        /// Spot ID.
        id: i64,
    },

    /// Delete every spot of a list.
    Clear {
        /// List name.
        list: String,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
