//! Error types for munch-rs operations.
//!
//! One error hierarchy built with `thiserror` covers storage, form
//! validation, location lookups, file I/O and CLI commands.

use thiserror::Error;

/// Result type alias for munch-rs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Form validation errors surfaced by the view-models.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Geocoding and device-location errors.
    #[error("location error: {0}")]
    Location(#[from] LocationError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Schema has not been created yet.
    #[error("database not initialized. Run: munch init")]
    NotInitialized,

    /// The database handle was closed.
    #[error("database handle is closed")]
    Closed,

    /// List not found by name.
    #[error("list not found: {name}")]
    ListNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// Spot not found by ID.
    #[error("spot not found: {id}")]
    SpotNotFound {
        /// Spot ID that was looked up.
        id: i64,
    },

    /// A stored `date_added` value could not be parsed.
    #[error("invalid timestamp {raw:?} on spot {spot_id}")]
    InvalidTimestamp {
        /// Spot whose timestamp is unreadable.
        spot_id: i64,
        /// Raw column text.
        raw: String,
    },

    /// Schema creation or upgrade error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Background task failed to complete.
    #[error("background task failed: {0}")]
    Task(String),
}

/// Validation failures for the list form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Submitted name was empty or whitespace.
    #[error("the list name must not be empty")]
    BlankName,

    /// A list with the submitted name already exists.
    #[error("a list with this name already exists")]
    DuplicateName,

    /// Rating outside of 1..=5.
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(i64),
}

/// Location-specific errors.
#[derive(Error, Debug)]
pub enum LocationError {
    /// Permission to read the device location was denied.
    #[error("location permission denied")]
    PermissionDenied,

    /// Geocoding did not finish in time.
    #[error("geocoding timed out after {millis} ms")]
    Timeout {
        /// Timeout that elapsed.
        millis: u64,
    },

    /// Geocoder backend failure.
    #[error("geocoder failed: {0}")]
    Geocoder(String),

    /// Invalid coordinate pair.
    #[error("invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates {
        /// Latitude given.
        latitude: f64,
        /// Longitude given.
        longitude: f64,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Storage(StorageError::from(err))
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::OutputFormat(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Command(CommandError::from(err))
    }
}
