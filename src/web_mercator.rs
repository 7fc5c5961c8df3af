//! Spherical (Web) Mercator, EPSG:3857.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use core::f64::consts::FRAC_PI_4;

use crate::math::RAD;
use crate::{CoordinateError, ObserverLocation};

/// Radius of the projection sphere, metres.
const SPHERE_RADIUS: f64 = 6_378_137.0;
/// Latitude at which the projection becomes square.
pub const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_78;
/// Largest absolute easting or northing, metres.
pub const WEB_MERCATOR_MAX_EXTENT: f64 = 20_037_508.342_789_244;

/// Easting and northing on the Web Mercator plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebMercator {
    easting: f64,
    northing: f64,
}

fn within_extent(value: f64) -> bool {
    value.abs() <= WEB_MERCATOR_MAX_EXTENT
}

impl WebMercator {
    /// # Errors
    ///
    /// [`CoordinateError::WebMercatorOutOfRange`] when either value exceeds the projection's extent.
    pub fn new(easting: f64, northing: f64) -> Result<Self, CoordinateError> {
        if !within_extent(easting) || !within_extent(northing) {
            return Err(CoordinateError::WebMercatorOutOfRange);
        }
        Ok(Self { easting, northing })
    }

    /// Projects a location.
    ///
    /// # Errors
    ///
    /// [`CoordinateError::WebMercatorOutOfRange`] for latitudes beyond ±85.05112878°.
    ///
    /// # Example
    ///
    /// ```
    /// use geocelestial::{ObserverLocation, WebMercator};
    ///
    /// let corner = ObserverLocation::new(0.0, 180.0).unwrap();
    /// let projected = WebMercator::from_location(corner).unwrap();
    /// assert!((projected.easting() - 20_037_508.342789244).abs() < 1e-6);
    /// assert!(WebMercator::from_location(ObserverLocation::new(89.0, 0.0).unwrap()).is_err());
    /// ```
    pub fn from_location(location: ObserverLocation) -> Result<Self, CoordinateError> {
        let latitude = location.latitude();
        if latitude.abs() > WEB_MERCATOR_MAX_LATITUDE {
            return Err(CoordinateError::WebMercatorOutOfRange);
        }
        let easting = SPHERE_RADIUS * RAD * location.longitude();
        let northing = SPHERE_RADIUS * (FRAC_PI_4 + RAD * latitude / 2.0).tan().ln();
        Ok(Self {
            easting: easting.clamp(-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT),
            northing: northing.clamp(-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT),
        })
    }

    pub fn to_location(&self) -> ObserverLocation {
        let longitude = self.easting / SPHERE_RADIUS / RAD;
        let latitude = (2.0 * (self.northing / SPHERE_RADIUS).exp().atan() - 2.0 * FRAC_PI_4) / RAD;
        ObserverLocation::new_unchecked(latitude, longitude.clamp(-180.0, 180.0))
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }
}
