//! Shared database handle.
//!
//! A [`Database`] owns one [`SqliteStorage`] behind a mutex. Clones share
//! the same connection. Every call runs on tokio's blocking pool and is
//! awaited by the caller.

use crate::core::TimestampPolicy;
use crate::error::{Result, StorageError};
use crate::storage::{SqliteStorage, Storage};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Explicitly constructed storage handle with an open/close lifecycle.
///
/// # Examples
///
/// ```
/// use munch_rs::repository::Database;
///
/// #[tokio::main]
/// async fn main() -> munch_rs::Result<()> {
///     let db = Database::in_memory()?;
///     assert!(db.is_open());
///     db.close().await?;
///     assert!(!db.is_open());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<Mutex<Option<SqliteStorage>>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("open", &self.is_open())
            .finish()
    }
}

impl Database {
    /// Wraps an already opened storage.
    #[must_use]
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(storage))),
        }
    }

    /// Opens the database file and creates or upgrades the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// brought up to date.
    pub fn open<P: AsRef<Path>>(path: P, policy: TimestampPolicy) -> Result<Self> {
        let mut storage = SqliteStorage::open(path)?.with_timestamp_policy(policy);
        storage.init()?;
        Ok(Self::new(storage))
    }

    /// Creates an initialized in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let mut storage = SqliteStorage::in_memory()?;
        storage.init()?;
        Ok(Self::new(storage))
    }

    /// Whether the handle still holds a connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_ok_and(|guard| guard.is_some())
    }

    /// Closes the connection. Later calls on any clone fail with
    /// [`StorageError::Closed`]. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` reports a failure while closing.
    pub async fn close(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let storage = inner
                .lock()
                .map_err(|_| StorageError::Task("database lock poisoned".to_string()))?
                .take();
            match storage {
                Some(storage) => {
                    tracing::debug!("closing database");
                    storage.close()
                }
                None => Ok(()),
            }
        })
        .await?
    }

    /// Runs `f` against the storage on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Closed`] after [`Database::close`], or
    /// whatever `f` returns.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteStorage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner
                .lock()
                .map_err(|_| StorageError::Task("database lock poisoned".to_string()))?;
            let storage = guard.as_mut().ok_or(StorageError::Closed)?;
            f(storage)
        })
        .await?
    }
}
