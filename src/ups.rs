//! Universal Polar Stereographic projection for latitudes poleward of the UTM bands.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use core::f64::consts::FRAC_PI_2;

use crate::config::Ellipsoid;
use crate::math::RAD;

/// Scale factor at the pole.
pub(crate) const UPS_SCALE: f64 = 0.994;
/// False easting and northing, metres.
pub(crate) const UPS_FALSE_ORIGIN: f64 = 2_000_000.0;

const CONVERGENCE: f64 = 1e-7;
const MAX_ITERATIONS: usize = 50;

/// Zone letter for a polar position: A/B in the south, Y/Z in the north, west/east of Greenwich.
pub(crate) fn ups_letter(latitude: f64, longitude: f64) -> char {
    match (latitude > 0.0, longitude < 0.0) {
        (true, true) => 'Y',
        (true, false) => 'Z',
        (false, true) => 'A',
        (false, false) => 'B',
    }
}

pub(crate) fn is_north_letter(letter: char) -> bool {
    matches!(letter, 'Y' | 'Z')
}

/// Polar radius of the stereographic projection without the conformal factor `t`.
fn rho_scale(ellipsoid: &Ellipsoid) -> f64 {
    let e = ellipsoid.eccentricity();
    2.0 * ellipsoid.equatorial_radius * UPS_SCALE / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
}

/// Projects a polar position, returning the zone letter, easting and northing.
pub(crate) fn ups_forward(latitude: f64, longitude: f64, ellipsoid: &Ellipsoid) -> (char, f64, f64) {
    let e = ellipsoid.eccentricity();
    let north = latitude > 0.0;
    let phi = RAD * latitude.abs();
    let lambda = RAD * longitude;

    let e_sin = e * phi.sin();
    let t = (FRAC_PI_2 / 2.0 - phi / 2.0).tan() / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0);
    let rho = rho_scale(ellipsoid) * t;

    let easting = UPS_FALSE_ORIGIN + rho * lambda.sin();
    let northing = if north {
        UPS_FALSE_ORIGIN - rho * lambda.cos()
    } else {
        UPS_FALSE_ORIGIN + rho * lambda.cos()
    };
    (ups_letter(latitude, longitude), easting, northing)
}

/// Recovers latitude and longitude in degrees from a UPS position.
///
/// Latitude comes from a fixed-point iteration on the conformal latitude,
/// stopped at a 1e-7 rad step or after a bounded number of rounds. A result
/// that is not finite snaps to the pole.
pub(crate) fn ups_inverse(letter: char, easting: f64, northing: f64, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let e = ellipsoid.eccentricity();
    let north = is_north_letter(letter);
    let dx = easting - UPS_FALSE_ORIGIN;
    let dy = northing - UPS_FALSE_ORIGIN;
    let rho = dx.hypot(dy);
    let t = rho / rho_scale(ellipsoid);

    let mut phi = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..MAX_ITERATIONS {
        let e_sin = e * phi.sin();
        let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)).atan();
        if !next.is_finite() {
            log::debug!("UPS latitude iteration diverged at ({easting}, {northing}), snapping to the pole");
            phi = FRAC_PI_2;
            break;
        }
        let step = (next - phi).abs();
        phi = next;
        if step < CONVERGENCE {
            break;
        }
    }

    let longitude = if rho == 0.0 {
        0.0
    } else if north {
        dx.atan2(-dy) / RAD
    } else {
        dx.atan2(dy) / RAD
    };
    let latitude = phi / RAD;
    (if north { latitude } else { -latitude }, longitude)
}
