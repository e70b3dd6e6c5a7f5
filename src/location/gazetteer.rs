//! Table-driven geocoder.
//!
//! Resolves addresses from a fixed address → coordinate table, typically
//! loaded from a JSON file. Deterministic and offline; a network geocoder
//! can replace it through the [`Geocoder`] trait.

use super::{GeoPoint, Geocoder};
use crate::error::{Error, IoError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Geocoder backed by an in-memory address table.
///
/// Lookups ignore case and collapse runs of whitespace.
///
/// # Examples
///
/// ```
/// use munch_rs::location::{GazetteerGeocoder, GeoPoint};
///
/// let geocoder = GazetteerGeocoder::new().with_entry(
///     "Alexanderplatz 1, Berlin",
///     GeoPoint { latitude: 52.5219, longitude: 13.4132 },
/// );
/// assert!(geocoder.lookup("alexanderplatz 1,  BERLIN").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    entries: HashMap<String, GeoPoint>,
}

impl GazetteerGeocoder {
    /// Creates an empty gazetteer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use]
    pub fn with_entry(mut self, address: &str, point: GeoPoint) -> Self {
        self.insert(address, point);
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, address: &str, point: GeoPoint) {
        self.entries.insert(normalize(address), point);
    }

    /// Loads a JSON object mapping addresses to `{latitude, longitude}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed, or if
    /// an entry lies outside the valid coordinate range.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let table: HashMap<String, GeoPoint> =
            serde_json::from_str(&raw).map_err(|e| Error::Config {
                message: format!("gazetteer {}: {e}", path.display()),
            })?;

        let mut geocoder = Self::new();
        for (address, point) in &table {
            let point = GeoPoint::new(point.latitude, point.longitude).map_err(|e| {
                Error::Config {
                    message: format!("gazetteer {}: entry {address:?}: {e}", path.display()),
                }
            })?;
            geocoder.insert(address, point);
        }
        tracing::debug!(path = %path.display(), entries = geocoder.len(), "loaded gazetteer");
        Ok(geocoder)
    }

    /// Synchronous lookup.
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<GeoPoint> {
        self.entries.get(&normalize(address)).copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    async fn locate(&self, address: &str) -> Result<Option<GeoPoint>> {
        Ok(self.lookup(address))
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
