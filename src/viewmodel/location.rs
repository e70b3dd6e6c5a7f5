//! Device location state.

use crate::error::LocationError;
use crate::location::{GeoPoint, LocationProvider};
use std::sync::Arc;
use tokio::sync::watch;

/// Publishes the device position after an explicit request.
pub struct LocationViewModel {
    provider: Arc<dyn LocationProvider>,
    device_location: watch::Sender<Option<GeoPoint>>,
}

impl std::fmt::Debug for LocationViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationViewModel")
            .field("device_location", &*self.device_location.borrow())
            .finish_non_exhaustive()
    }
}

impl LocationViewModel {
    /// Creates the view-model with no known position.
    #[must_use]
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        let (device_location, _) = watch::channel(None);
        Self {
            provider,
            device_location,
        }
    }

    /// Asks for one fix if permission is granted and publishes it.
    ///
    /// Without permission nothing is requested. Provider errors and updates
    /// without a fix leave the previous value in place.
    pub async fn request_single_location_update(&self) -> Option<GeoPoint> {
        if !self.provider.permission_granted() {
            tracing::debug!(error = %LocationError::PermissionDenied, "no location update");
            return self.device_location();
        }

        match self.provider.single_update().await {
            Ok(Some(point)) => {
                self.device_location.send_replace(Some(point));
                Some(point)
            }
            Ok(None) => {
                tracing::debug!("no location fix");
                self.device_location()
            }
            Err(e) => {
                tracing::warn!(error = %e, "location update failed");
                self.device_location()
            }
        }
    }

    /// Last published position.
    #[must_use]
    pub fn device_location(&self) -> Option<GeoPoint> {
        *self.device_location.borrow()
    }

    /// Receiver for position changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<GeoPoint>> {
        self.device_location.subscribe()
    }
}
