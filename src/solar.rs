//! Low-precision solar position.
//!
//! The sun is placed on the ecliptic from its mean anomaly, the equation of the
//! centre and the longitude of Earth's perihelion. Accuracy is on the order of
//! a hundredth of a degree, which is plenty for rise/set work.

use chrono::{DateTime, Utc};

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::math::{normalize_degrees_360, normalize_longitude, RAD};
use crate::sky::{self, Equatorial};
use crate::time::{days_since_j2000, julian_century, J2000};
use crate::ObserverLocation;

/// Longitude of Earth's perihelion, radians.
const PERIHELION: f64 = RAD * 102.9372;

/// Altitude and compass azimuth of a body, degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalPosition {
    /// Degrees above (positive) or below (negative) the horizon.
    pub altitude: f64,
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth: f64,
}

/// Raw solar ephemeris values for an instant, degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarCoordinates {
    pub declination: f64,
    /// In [0, 360).
    pub right_ascension: f64,
    /// Apparent ecliptic longitude, in [0, 360).
    pub ecliptic_longitude: f64,
    /// Mean anomaly, in [0, 360).
    pub mean_anomaly: f64,
    /// Geometric mean longitude, in [0, 360).
    pub geometric_mean_longitude: f64,
}

impl SolarCoordinates {
    /// The point on Earth where the sun is at the zenith at `instant`.
    pub fn subsolar_point(&self, instant: DateTime<Utc>) -> ObserverLocation {
        let d = days_since_j2000(instant);
        let greenwich = sky::sidereal_time(d, 0.0) / RAD;
        let longitude = normalize_longitude(self.right_ascension - greenwich);
        // Declination never leaves ±23.44° and the wrapped longitude stays in range.
        ObserverLocation::new_unchecked(self.declination, longitude)
    }
}

pub(crate) fn solar_mean_anomaly(d: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * d)
}

/// Equation of the centre.
fn center_correction(m: f64) -> f64 {
    RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin())
}

pub(crate) fn ecliptic_longitude(m: f64) -> f64 {
    m + center_correction(m) + PERIHELION + core::f64::consts::PI
}

/// Sun's right ascension and declination `d` days after J2000.0.
pub(crate) fn sun_equatorial(d: f64) -> Equatorial {
    let l = ecliptic_longitude(solar_mean_anomaly(d));
    Equatorial {
        ra: sky::right_ascension(l, 0.0),
        dec: sky::declination(l, 0.0),
    }
}

/// Raw solar coordinates for `instant`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geocelestial::solar_coordinates;
///
/// // Near the June solstice the declination peaks at the obliquity.
/// let solstice = Utc.with_ymd_and_hms(2024, 6, 20, 20, 51, 0).unwrap();
/// let coords = solar_coordinates(solstice);
/// assert!((coords.declination - 23.44).abs() < 0.05);
/// ```
pub fn solar_coordinates(instant: DateTime<Utc>) -> SolarCoordinates {
    let d = days_since_j2000(instant);
    let m = solar_mean_anomaly(d);
    let l = ecliptic_longitude(m);
    let t = julian_century(d + J2000);
    SolarCoordinates {
        declination: sky::declination(l, 0.0) / RAD,
        right_ascension: normalize_degrees_360(sky::right_ascension(l, 0.0) / RAD),
        ecliptic_longitude: normalize_degrees_360(l / RAD),
        mean_anomaly: normalize_degrees_360(m / RAD),
        geometric_mean_longitude: normalize_degrees_360(280.46646 + t * (36_000.769_83 + 0.000_303_2 * t)),
    }
}

/// Sun altitude and azimuth for an observer at `instant`.
///
/// Always defined; polar day or night only matters to the rise/set solver.
pub fn sun_position(location: ObserverLocation, instant: DateTime<Utc>) -> HorizontalPosition {
    let d = days_since_j2000(instant);
    let lw = -RAD * location.longitude();
    let phi = RAD * location.latitude();
    let (_, altitude, azimuth) = sky::horizontal(sun_equatorial(d), d, lw, phi);
    HorizontalPosition {
        altitude: altitude / RAD,
        azimuth: sky::compass_azimuth_degrees(azimuth),
    }
}
