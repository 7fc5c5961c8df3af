//! Reference ellipsoids and the configuration value handed to projection calls.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::CoordinateError;

/// A reference ellipsoid described by its equatorial radius and inverse flattening.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub equatorial_radius: f64,
    /// Reciprocal of the flattening (298.257223563 for WGS84).
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        equatorial_radius: 6_378_137.0,
        inverse_flattening: 298.257_223_563,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        equatorial_radius: 6_378_137.0,
        inverse_flattening: 298.257_222_101,
    };

    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        equatorial_radius: 6_378_206.4,
        inverse_flattening: 294.978_698_2,
    };

    pub const INTERNATIONAL_1924: Ellipsoid = Ellipsoid {
        equatorial_radius: 6_378_388.0,
        inverse_flattening: 297.0,
    };

    /// Builds a custom ellipsoid.
    ///
    /// # Errors
    ///
    /// [`CoordinateError::InvalidEllipsoid`] unless the radius is positive and
    /// the inverse flattening is greater than 1.
    pub fn new(equatorial_radius: f64, inverse_flattening: f64) -> Result<Self, CoordinateError> {
        if !(equatorial_radius > 0.0 && equatorial_radius.is_finite()) {
            return Err(CoordinateError::InvalidEllipsoid);
        }
        if !(inverse_flattening > 1.0 && inverse_flattening.is_finite()) {
            return Err(CoordinateError::InvalidEllipsoid);
        }
        Ok(Self {
            equatorial_radius,
            inverse_flattening,
        })
    }

    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// First eccentricity squared, e² = f(2 − f).
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Semi-minor axis in metres.
    pub fn polar_radius(&self) -> f64 {
        self.equatorial_radius * (1.0 - self.flattening())
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Settings shared by the grid transforms.
///
/// Pass [`GeoConfig::DEFAULT`] unless a non-WGS84 datum is required.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoConfig {
    pub ellipsoid: Ellipsoid,
}

impl GeoConfig {
    pub const DEFAULT: GeoConfig = GeoConfig {
        ellipsoid: Ellipsoid::WGS84,
    };

    pub const fn with_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        GeoConfig { ellipsoid }
    }
}
