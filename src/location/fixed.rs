//! Location provider with a configured position.

use super::{GeoPoint, LocationProvider};
use crate::error::Result;
use async_trait::async_trait;

/// Reports a fixed position, or none.
///
/// Stands in for platform location services: the position comes from
/// configuration and the permission flag can be switched off to exercise
/// the denied path.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    position: Option<GeoPoint>,
    permission: bool,
}

impl FixedLocationProvider {
    /// Creates a provider with permission granted.
    #[must_use]
    pub const fn new(position: Option<GeoPoint>) -> Self {
        Self {
            position,
            permission: true,
        }
    }

    /// Sets the permission flag.
    #[must_use]
    pub const fn with_permission(mut self, granted: bool) -> Self {
        self.permission = granted;
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn permission_granted(&self) -> bool {
        self.permission
    }

    async fn last_known(&self) -> Result<Option<GeoPoint>> {
        Ok(self.position)
    }

    async fn single_update(&self) -> Result<Option<GeoPoint>> {
        Ok(self.position)
    }
}
