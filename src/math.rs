#[allow(unused_imports)]
use core_maths::CoreFloat;

/// Degrees to radians.
pub(crate) const RAD: f64 = core::f64::consts::PI / 180.0;

/// Wraps an angle in degrees into [0, 360).
pub(crate) fn normalize_degrees_360(degrees: f64) -> f64 {
    let degrees = degrees / 360.0;
    let mut limited = 360.0 * (degrees - degrees.floor());
    if limited < 0.0 {
        limited += 360.0;
    }
    if limited >= 360.0 {
        limited -= 360.0;
    }
    limited
}

/// Wraps a longitude in degrees into [-180, 180).
pub(crate) fn normalize_longitude(degrees: f64) -> f64 {
    let wrapped = normalize_degrees_360(degrees + 180.0) - 180.0;
    if wrapped < -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Atmospheric refraction in radians for a true altitude `h` in radians.
///
/// Saemundsson's formula; altitudes below the horizon are clamped to zero so
/// the correction stays finite.
pub(crate) fn astro_refraction(h: f64) -> f64 {
    let h = if h < 0.0 { 0.0 } else { h };
    0.0002967 / (h + 0.00312536 / (h + 0.08901179)).tan()
}
