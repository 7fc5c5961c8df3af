//! Unit-sphere Cartesian vectors.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::math::{normalize_longitude, RAD};
use crate::ObserverLocation;

/// Direction from the Earth's centre on a unit sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    pub fn from_location(location: ObserverLocation) -> Self {
        let (sin_lat, cos_lat) = (RAD * location.latitude()).sin_cos();
        let (sin_lon, cos_lon) = (RAD * location.longitude()).sin_cos();
        Cartesian {
            x: cos_lat * cos_lon,
            y: cos_lat * sin_lon,
            z: sin_lat,
        }
    }

    /// Direction back to latitude/longitude. The vector need not be normalised.
    ///
    /// # Example
    ///
    /// ```
    /// use geocelestial::{Cartesian, ObserverLocation};
    ///
    /// let north = Cartesian { x: 0.0, y: 0.0, z: 2.0 }.to_location();
    /// assert_eq!(north.latitude(), 90.0);
    /// ```
    pub fn to_location(&self) -> ObserverLocation {
        let latitude = self.z.atan2(self.x.hypot(self.y)) / RAD;
        let longitude = normalize_longitude(self.y.atan2(self.x) / RAD);
        ObserverLocation::new_unchecked(latitude, longitude)
    }
}
