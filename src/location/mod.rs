//! Coordinates, geocoding and device location.
//!
//! Platform services sit behind the [`Geocoder`] and [`LocationProvider`]
//! traits. The helpers here collapse every failure to `None` after logging
//! it: a missing position is shown as "location unavailable", never as an
//! error.

mod fixed;
mod gazetteer;

pub use fixed::FixedLocationProvider;
pub use gazetteer::GazetteerGeocoder;

use crate::core::FoodSpot;
use crate::error::{LocationError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded wait for a geocoding call.
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(3);

/// Mean earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Text shown when no distance can be computed.
pub const LOCATION_UNAVAILABLE: &str = "location unavailable";

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::InvalidCoordinates {
                latitude,
                longitude,
            }
            .into());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Address-to-coordinate lookup.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns the best match for `address`, if any.
    async fn locate(&self, address: &str) -> Result<Option<GeoPoint>>;
}

/// Source of the device position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the user granted location access.
    fn permission_granted(&self) -> bool;

    /// Best-effort last known position.
    async fn last_known(&self) -> Result<Option<GeoPoint>>;

    /// Waits for one fresh fix.
    async fn single_update(&self) -> Result<Option<GeoPoint>>;
}

/// Geocodes `address`, giving up after `timeout`.
///
/// Timeouts and geocoder errors are logged and yield `None`.
pub async fn coordinates_for_address(
    geocoder: &dyn Geocoder,
    address: &str,
    timeout: Duration,
) -> Option<GeoPoint> {
    match tokio::time::timeout(timeout, geocoder.locate(address)).await {
        Ok(Ok(point)) => point,
        Ok(Err(e)) => {
            tracing::warn!(address, error = %e, "geocoding failed");
            None
        }
        Err(_) => {
            let err = LocationError::Timeout {
                millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
            tracing::warn!(address, error = %err, "geocoding abandoned");
            None
        }
    }
}

/// Last known device position, or `None` without permission or fix.
pub async fn last_known_location(provider: &dyn LocationProvider) -> Option<GeoPoint> {
    if !provider.permission_granted() {
        tracing::debug!(error = %LocationError::PermissionDenied, "skipping last known location");
        return None;
    }

    match provider.last_known().await {
        Ok(point) => point,
        Err(e) => {
            tracing::warn!(error = %e, "last known location unavailable");
            None
        }
    }
}

/// Great-circle distance between two points in kilometres (haversine).
#[must_use]
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().clamp(0.0, 1.0).asin()
}

/// Distance from `device` to the geocoded address of `spot`.
pub async fn spot_distance(
    geocoder: &dyn Geocoder,
    device: Option<GeoPoint>,
    spot: &FoodSpot,
    timeout: Duration,
) -> Option<f64> {
    let device = device?;
    let target = coordinates_for_address(geocoder, &spot.address, timeout).await?;
    Some(distance_km(device, target))
}

/// Formats a distance for display.
#[must_use]
pub fn format_distance(km: Option<f64>) -> String {
    km.map_or_else(|| LOCATION_UNAVAILABLE.to_string(), |km| format!("{km:.2} km"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const BERLIN: GeoPoint = GeoPoint {
        latitude: 52.5200,
        longitude: 13.4050,
    };
    const HAMBURG: GeoPoint = GeoPoint {
        latitude: 53.5511,
        longitude: 9.9937,
    };

    struct SlowGeocoder;

    #[async_trait]
    impl Geocoder for SlowGeocoder {
        async fn locate(&self, _address: &str) -> Result<Option<GeoPoint>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(BERLIN))
        }
    }

    struct BrokenGeocoder;

    #[async_trait]
    impl Geocoder for BrokenGeocoder {
        async fn locate(&self, _address: &str) -> Result<Option<GeoPoint>> {
            Err(LocationError::Geocoder("service unavailable".to_string()).into())
        }
    }

    #[test]
    fn test_berlin_hamburg() {
        let d = distance_km(BERLIN, HAMBURG);
        assert!((250.0..=300.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        assert!((distance_km(BERLIN, HAMBURG) - distance_km(HAMBURG, BERLIN)).abs() < 1e-9);
        assert!(distance_km(BERLIN, BERLIN).abs() < 1e-9);
    }

    #[test_case(91.0, 0.0 ; "latitude too high")]
    #[test_case(-91.0, 0.0 ; "latitude too low")]
    #[test_case(0.0, 181.0 ; "longitude too high")]
    #[test_case(f64::NAN, 0.0 ; "not a number")]
    fn test_invalid_points(lat: f64, lon: f64) {
        assert!(GeoPoint::new(lat, lon).is_err());
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some(12.345)), "12.35 km");
        assert_eq!(format_distance(None), LOCATION_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_geocode_timeout_yields_none() {
        let point =
            coordinates_for_address(&SlowGeocoder, "Alexanderplatz", Duration::from_millis(20))
                .await;
        assert!(point.is_none());
    }

    #[tokio::test]
    async fn test_geocode_error_yields_none() {
        let point =
            coordinates_for_address(&BrokenGeocoder, "Alexanderplatz", DEFAULT_GEOCODE_TIMEOUT)
                .await;
        assert!(point.is_none());
    }

    #[tokio::test]
    async fn test_last_known_without_permission() {
        let provider = FixedLocationProvider::new(Some(BERLIN)).with_permission(false);
        assert!(last_known_location(&provider).await.is_none());

        let provider = FixedLocationProvider::new(Some(BERLIN));
        assert_eq!(last_known_location(&provider).await, Some(BERLIN));
    }

    #[tokio::test]
    async fn test_spot_distance() {
        let geocoder = GazetteerGeocoder::new().with_entry("Jungfernstieg, Hamburg", HAMBURG);
        let spot = FoodSpot::new(1, "Fischbrötchen", "Jungfernstieg, Hamburg");

        let d = spot_distance(&geocoder, Some(BERLIN), &spot, DEFAULT_GEOCODE_TIMEOUT).await;
        assert!(d.is_some_and(|d| (250.0..=300.0).contains(&d)));

        let d = spot_distance(&geocoder, None, &spot, DEFAULT_GEOCODE_TIMEOUT).await;
        assert!(d.is_none());
    }
}
