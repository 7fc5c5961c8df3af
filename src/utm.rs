//! Geodetic ⇄ UTM/UPS grid coordinates.
//!
//! Transverse Mercator uses the USGS series with terms to the eighth order in
//! the longitude difference; the inverse uses the footpoint latitude series.
//! Positions south of 80°S or north of 84°N go to the polar stereographic grid.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::config::{Ellipsoid, GeoConfig};
use crate::math::{normalize_longitude, RAD};
use crate::ups::{is_north_letter, ups_forward, ups_inverse};
use crate::{CoordinateError, ObserverLocation};

/// Central meridian scale factor.
pub(crate) const UTM_SCALE: f64 = 0.9996;
pub(crate) const UTM_FALSE_EASTING: f64 = 500_000.0;
/// Added to southern-hemisphere northings.
pub(crate) const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude band letters from 80°S, 8° each (X spans 12°).
pub(crate) const LATITUDE_BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

const UTM_EASTING_BOUNDS: (f64, f64) = (160_000.0, 834_000.0);
const UTM_NORTHING_BOUNDS: (f64, f64) = (0.0, 10_000_000.0);
const UPS_BOUNDS: (f64, f64) = (0.0, 4_000_000.0);

/// Southern and northern latitude limits of the UTM grid.
pub const UTM_SOUTH_LIMIT: f64 = -80.0;
pub const UTM_NORTH_LIMIT: f64 = 84.0;

/// Which projection a grid coordinate belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridSystem {
    Utm,
    /// Universal Polar Stereographic; zone number is always 0.
    Ups,
}

/// A position on the UTM or UPS grid.
///
/// Eastings and northings outside the usual ranges are accepted but flagged
/// through [`UtmCoordinate::within_bounds`].
///
/// # Example
///
/// ```
/// use geocelestial::{GeoConfig, GridSystem, ObserverLocation, UtmCoordinate};
///
/// let liberty = ObserverLocation::new(40.6892, -74.0445).unwrap();
/// let utm = UtmCoordinate::from_location(liberty, &GeoConfig::DEFAULT);
/// assert_eq!(utm.zone_number(), 18);
/// assert_eq!(utm.zone_letter(), 'T');
/// assert_eq!(utm.system(), GridSystem::Utm);
/// assert!((utm.easting() - 580_735.87).abs() < 0.05);
/// assert!((utm.northing() - 4_504_695.17).abs() < 0.05);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmCoordinate {
    zone_number: u8,
    zone_letter: char,
    easting: f64,
    northing: f64,
    ellipsoid: Ellipsoid,
    system: GridSystem,
    within_bounds: bool,
}

/// Latitude band letter for a UTM latitude, clamped to C..X.
pub(crate) fn latitude_band(latitude: f64) -> char {
    let index = ((latitude + 80.0) / 8.0).floor().clamp(0.0, 19.0) as usize;
    LATITUDE_BANDS[index] as char
}

/// Longitude zone, including the widened zones around Norway and Svalbard.
pub(crate) fn longitude_zone(latitude: f64, longitude: f64) -> u8 {
    let zone = (((longitude + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;
    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        return 32;
    }
    if (72.0..=84.0).contains(&latitude) && longitude >= 0.0 {
        if longitude < 9.0 {
            return 31;
        } else if longitude < 21.0 {
            return 33;
        } else if longitude < 33.0 {
            return 35;
        } else if longitude < 42.0 {
            return 37;
        }
    }
    zone
}

fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Meridian arc length from the equator to `phi`.
fn meridian_arc(phi: f64, a: f64, es: f64) -> f64 {
    let es2 = es * es;
    let es3 = es2 * es;
    a * ((1.0 - es / 4.0 - 3.0 * es2 / 64.0 - 5.0 * es3 / 256.0) * phi
        - (3.0 * es / 8.0 + 3.0 * es2 / 32.0 + 45.0 * es3 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * es2 / 256.0 + 45.0 * es3 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * es3 / 3072.0) * (6.0 * phi).sin())
}

fn tm_forward(latitude: f64, longitude: f64, zone: u8, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let a = ellipsoid.equatorial_radius;
    let es = ellipsoid.eccentricity_squared();
    let ep = es / (1.0 - es);

    let phi = RAD * latitude;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let n = a / (1.0 - es * sin_phi * sin_phi).sqrt();
    let t = phi.tan() * phi.tan();
    let c = ep * cos_phi * cos_phi;
    let big_a = cos_phi * RAD * (longitude - central_meridian(zone));
    let m = meridian_arc(phi, a, es);

    let easting = UTM_SCALE
        * n
        * (big_a
            + (1.0 - t + c) * big_a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep) * big_a.powi(5) / 120.0
            + (61.0 - 479.0 * t + 179.0 * t * t - t * t * t) * big_a.powi(7) / 5040.0)
        + UTM_FALSE_EASTING;
    let mut northing = UTM_SCALE
        * (m + n
            * phi.tan()
            * (big_a * big_a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * big_a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep) * big_a.powi(6) / 720.0
                + (1385.0 - 3111.0 * t + 543.0 * t * t - t * t * t) * big_a.powi(8) / 40320.0));
    if latitude < 0.0 {
        northing += UTM_FALSE_NORTHING_SOUTH;
    }
    (easting, northing)
}

fn tm_inverse(zone: u8, north: bool, easting: f64, northing: f64, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let a = ellipsoid.equatorial_radius;
    let es = ellipsoid.eccentricity_squared();
    let ep = es / (1.0 - es);

    let x = easting - UTM_FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - UTM_FALSE_NORTHING_SOUTH
    };

    let mu = y / UTM_SCALE / (a * (1.0 - es / 4.0 - 3.0 * es * es / 64.0 - 5.0 * es * es * es / 256.0));
    let e1 = (1.0 - (1.0 - es).sqrt()) / (1.0 + (1.0 - es).sqrt());
    let footpoint = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_f, cos_f) = footpoint.sin_cos();
    let tan_f = footpoint.tan();
    let c1 = ep * cos_f * cos_f;
    let t1 = tan_f * tan_f;
    let n1 = a / (1.0 - es * sin_f * sin_f).sqrt();
    let r1 = a * (1.0 - es) / (1.0 - es * sin_f * sin_f).powf(1.5);
    let d = x / (n1 * UTM_SCALE);

    let phi = footpoint
        - (n1 * tan_f / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep - 3.0 * c1 * c1) * d.powi(6) / 720.0
                - (1385.0 + 3633.0 * t1 + 4095.0 * t1 * t1 + 1575.0 * t1.powi(3)) * d.powi(8) / 40320.0);
    let lambda = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep + 24.0 * t1 * t1) * d.powi(5) / 120.0
        - (61.0 + 662.0 * t1 + 1320.0 * t1 * t1 + 720.0 * t1.powi(3)) * d.powi(7) / 5040.0)
        / cos_f;

    (phi / RAD, central_meridian(zone) + lambda / RAD)
}

fn bounds_check(system: GridSystem, easting: f64, northing: f64) -> bool {
    let ((e_min, e_max), (n_min, n_max)) = match system {
        GridSystem::Utm => (UTM_EASTING_BOUNDS, UTM_NORTHING_BOUNDS),
        GridSystem::Ups => (UPS_BOUNDS, UPS_BOUNDS),
    };
    let within = (e_min..=e_max).contains(&easting) && (n_min..=n_max).contains(&northing);
    if !within {
        log::warn!("{system:?} easting {easting:.3} / northing {northing:.3} outside the nominal grid range");
    }
    within
}

impl UtmCoordinate {
    /// Builds a grid coordinate from its parts.
    ///
    /// Zones 1–60 take band letters C–X (no I or O); zone 0 takes the polar
    /// letters A, B, Y or Z. Lowercase letters are accepted.
    ///
    /// # Errors
    ///
    /// - [`CoordinateError::InvalidZoneNumber`] for a zone above 60
    /// - [`CoordinateError::InvalidZoneLetter`] for a letter that does not fit the zone
    /// - [`CoordinateError::GridValueOutOfRange`] for a non-finite easting or northing
    pub fn new(
        zone_number: u8,
        zone_letter: char,
        easting: f64,
        northing: f64,
        config: &GeoConfig,
    ) -> Result<Self, CoordinateError> {
        if zone_number > 60 {
            return Err(CoordinateError::InvalidZoneNumber);
        }
        let zone_letter = zone_letter.to_ascii_uppercase();
        let system = if zone_number == 0 {
            if !matches!(zone_letter, 'A' | 'B' | 'Y' | 'Z') {
                return Err(CoordinateError::InvalidZoneLetter);
            }
            GridSystem::Ups
        } else {
            if !zone_letter.is_ascii() || !LATITUDE_BANDS.contains(&(zone_letter as u8)) {
                return Err(CoordinateError::InvalidZoneLetter);
            }
            GridSystem::Utm
        };
        if !easting.is_finite() || !northing.is_finite() {
            return Err(CoordinateError::GridValueOutOfRange);
        }
        Ok(Self {
            zone_number,
            zone_letter,
            easting,
            northing,
            ellipsoid: config.ellipsoid,
            system,
            within_bounds: bounds_check(system, easting, northing),
        })
    }

    /// Projects a location onto UTM, or UPS poleward of 80°S / 84°N.
    pub fn from_location(location: ObserverLocation, config: &GeoConfig) -> Self {
        let (latitude, longitude) = (location.latitude(), location.longitude());
        if !(UTM_SOUTH_LIMIT..=UTM_NORTH_LIMIT).contains(&latitude) {
            let (letter, easting, northing) = ups_forward(latitude, longitude, &config.ellipsoid);
            return Self::assemble(0, letter, easting, northing, config, GridSystem::Ups);
        }
        let zone = longitude_zone(latitude, longitude);
        let (easting, northing) = tm_forward(latitude, longitude, zone, &config.ellipsoid);
        Self::assemble(zone, latitude_band(latitude), easting, northing, config, GridSystem::Utm)
    }

    /// Projects a location onto a chosen UTM zone instead of its natural one.
    ///
    /// # Errors
    ///
    /// [`CoordinateError::InvalidZoneNumber`] for a zone outside 1–60, and
    /// [`CoordinateError::LatitudeOutOfRange`] when the location lies in the polar caps.
    pub fn from_location_in_zone(
        location: ObserverLocation,
        zone_number: u8,
        config: &GeoConfig,
    ) -> Result<Self, CoordinateError> {
        if !(1..=60).contains(&zone_number) {
            return Err(CoordinateError::InvalidZoneNumber);
        }
        let latitude = location.latitude();
        if !(UTM_SOUTH_LIMIT..=UTM_NORTH_LIMIT).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        let (easting, northing) = tm_forward(latitude, location.longitude(), zone_number, &config.ellipsoid);
        Ok(Self::assemble(
            zone_number,
            latitude_band(latitude),
            easting,
            northing,
            config,
            GridSystem::Utm,
        ))
    }

    pub(crate) fn assemble(
        zone_number: u8,
        zone_letter: char,
        easting: f64,
        northing: f64,
        config: &GeoConfig,
        system: GridSystem,
    ) -> Self {
        Self {
            zone_number,
            zone_letter,
            easting,
            northing,
            ellipsoid: config.ellipsoid,
            system,
            within_bounds: bounds_check(system, easting, northing),
        }
    }

    /// Converts back to latitude and longitude.
    ///
    /// Out-of-range grid values still produce a position; latitude is
    /// clamped to ±90° and longitude wrapped into [-180, 180).
    pub fn to_location(&self) -> ObserverLocation {
        let (latitude, longitude) = match self.system {
            GridSystem::Ups => ups_inverse(self.zone_letter, self.easting, self.northing, &self.ellipsoid),
            GridSystem::Utm => tm_inverse(
                self.zone_number,
                self.is_northern(),
                self.easting,
                self.northing,
                &self.ellipsoid,
            ),
        };
        ObserverLocation::new_unchecked(latitude.clamp(-90.0, 90.0), normalize_longitude(longitude))
    }

    /// Longitude zone 1–60, or 0 on the polar grid.
    pub fn zone_number(&self) -> u8 {
        self.zone_number
    }

    /// Latitude band (C–X) or polar zone letter (A, B, Y, Z).
    pub fn zone_letter(&self) -> char {
        self.zone_letter
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    pub fn system(&self) -> GridSystem {
        self.system
    }

    /// False when easting or northing fell outside the nominal grid range.
    pub fn within_bounds(&self) -> bool {
        self.within_bounds
    }

    pub fn is_northern(&self) -> bool {
        match self.system {
            GridSystem::Ups => is_north_letter(self.zone_letter),
            GridSystem::Utm => self.zone_letter >= 'N',
        }
    }
}

impl core::fmt::Display for UtmCoordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.system {
            GridSystem::Utm => write!(
                f,
                "{}{} {:.3}mE {:.3}mN",
                self.zone_number, self.zone_letter, self.easting, self.northing
            ),
            GridSystem::Ups => write!(f, "{} {:.3}mE {:.3}mN", self.zone_letter, self.easting, self.northing),
        }
    }
}
