//! Earth-centred, Earth-fixed Cartesian coordinates.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::config::GeoConfig;
use crate::math::{normalize_longitude, RAD};
use crate::ObserverLocation;

const LATITUDE_TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 50;

/// A position in metres relative to the Earth's centre.
///
/// X points to the prime meridian on the equator, Y to 90°E, Z to the north pole.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    /// Converts a geodetic position and ellipsoidal height in metres.
    ///
    /// # Example
    ///
    /// ```
    /// use geocelestial::{Ecef, GeoConfig, ObserverLocation};
    ///
    /// let origin = ObserverLocation::new(0.0, 0.0).unwrap();
    /// let ecef = Ecef::from_geodetic(origin, 0.0, &GeoConfig::DEFAULT);
    /// assert!((ecef.x - 6_378_137.0).abs() < 1e-6);
    /// assert!(ecef.y.abs() < 1e-6 && ecef.z.abs() < 1e-6);
    /// ```
    pub fn from_geodetic(location: ObserverLocation, height: f64, config: &GeoConfig) -> Self {
        let ellipsoid = config.ellipsoid;
        let es = ellipsoid.eccentricity_squared();
        let (sin_lat, cos_lat) = (RAD * location.latitude()).sin_cos();
        let (sin_lon, cos_lon) = (RAD * location.longitude()).sin_cos();
        let n = ellipsoid.equatorial_radius / (1.0 - es * sin_lat * sin_lat).sqrt();

        Ecef {
            x: (n + height) * cos_lat * cos_lon,
            y: (n + height) * cos_lat * sin_lon,
            z: (n * (1.0 - es) + height) * sin_lat,
        }
    }

    /// Converts back to a geodetic position and ellipsoidal height in metres.
    ///
    /// Latitude is refined by fixed-point iteration until it moves less than
    /// 1e-12 rad, with a bounded number of rounds.
    pub fn to_geodetic(&self, config: &GeoConfig) -> (ObserverLocation, f64) {
        let ellipsoid = config.ellipsoid;
        let a = ellipsoid.equatorial_radius;
        let es = ellipsoid.eccentricity_squared();
        let p = self.x.hypot(self.y);
        let longitude = normalize_longitude(self.y.atan2(self.x) / RAD);

        if p < 1e-9 {
            // On the polar axis.
            let latitude = if self.z >= 0.0 { 90.0 } else { -90.0 };
            let height = self.z.abs() - ellipsoid.polar_radius();
            return (ObserverLocation::new_unchecked(latitude, 0.0), height);
        }

        let mut phi = self.z.atan2(p * (1.0 - es));
        let mut n = a;
        for _ in 0..MAX_ITERATIONS {
            let sin_phi = phi.sin();
            n = a / (1.0 - es * sin_phi * sin_phi).sqrt();
            let next = (self.z + es * n * sin_phi).atan2(p);
            let step = (next - phi).abs();
            phi = next;
            if step < LATITUDE_TOLERANCE {
                break;
            }
        }

        let height = p / phi.cos() - n;
        let latitude = (phi / RAD).clamp(-90.0, 90.0);
        (ObserverLocation::new_unchecked(latitude, longitude), height)
    }
}
