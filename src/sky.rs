//! Spherical-astronomy helpers shared by the solar and lunar engines.
//!
//! Angles are radians throughout; `d` is days since J2000.0 and `lw` is the
//! observer's west longitude (east negative) in radians.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::math::RAD;

/// Mean obliquity of the ecliptic used by the low-precision theory.
pub(crate) const OBLIQUITY: f64 = RAD * 23.4397;

pub(crate) fn right_ascension(l: f64, b: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos() - b.tan() * OBLIQUITY.sin()).atan2(l.cos())
}

pub(crate) fn declination(l: f64, b: f64) -> f64 {
    (b.sin() * OBLIQUITY.cos() + b.cos() * OBLIQUITY.sin() * l.sin()).asin()
}

/// Azimuth measured from south, positive westward.
pub(crate) fn azimuth(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos())
}

pub(crate) fn altitude(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin()
}

/// Local sidereal time.
pub(crate) fn sidereal_time(d: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * d) - lw
}

/// Azimuth from south (radians) to compass bearing from north in [0, 360) degrees.
pub(crate) fn compass_azimuth_degrees(azimuth_from_south: f64) -> f64 {
    crate::math::normalize_degrees_360(azimuth_from_south / RAD + 180.0)
}

/// Equatorial coordinates of a body, radians.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

/// Hour angle, altitude and azimuth of a body for an observer.
pub(crate) fn horizontal(eq: Equatorial, d: f64, lw: f64, phi: f64) -> (f64, f64, f64) {
    let hour_angle = sidereal_time(d, lw) - eq.ra;
    (
        hour_angle,
        altitude(hour_angle, phi, eq.dec),
        azimuth(hour_angle, phi, eq.dec),
    )
}
