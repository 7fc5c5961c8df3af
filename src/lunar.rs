//! Low-precision lunar position, illumination and the perigee/apogee cycle.
//!
//! Position uses mean orbital elements with the largest periodic term in each
//! of longitude, latitude and distance. Distance for perigee/apogee work uses a
//! longer truncated series of the lunar theory, good to a few kilometres.

use chrono::{DateTime, Utc};

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::math::{astro_refraction, normalize_degrees_360, RAD};
use crate::sky::{self, Equatorial};
use crate::solar::sun_equatorial;
use crate::time::{days_since_j2000, decimal_year, from_julian_day, julian_century, to_julian_day};
use crate::ObserverLocation;

/// Mean Earth–Sun distance in km.
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// Equatorial radius of the Earth for the lunar parallax, km.
const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Mean Earth–Moon distance of the distance series, km.
const MEAN_MOON_DISTANCE_KM: f64 = 385_000.56;

/// Anomalistic month in days.
pub const ANOMALISTIC_MONTH: f64 = 27.554_549_88;

/// Geocentric lunar coordinates, radians, plus distance in km.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MoonCoords {
    pub equatorial: Equatorial,
    pub ecliptic_longitude: f64,
    pub distance_km: f64,
}

pub(crate) fn moon_coords(d: f64) -> MoonCoords {
    let l = RAD * (218.316 + 13.176_396 * d);
    let m = RAD * (134.963 + 13.064_993 * d);
    let f = RAD * (93.272 + 13.229_350 * d);

    let lon = l + RAD * 6.289 * m.sin();
    let lat = RAD * 5.128 * f.sin();
    let distance_km = 385_001.0 - 20_905.0 * m.cos();

    MoonCoords {
        equatorial: Equatorial {
            ra: sky::right_ascension(lon, lat),
            dec: sky::declination(lon, lat),
        },
        ecliptic_longitude: lon,
        distance_km,
    }
}

/// Topocentric moon position for an observer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonPosition {
    /// Degrees above the horizon, corrected for parallax, then refraction.
    pub altitude: f64,
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth: f64,
    /// Geocentric distance from the mean-element model, km.
    pub distance_km: f64,
    /// Parallactic angle in degrees.
    pub parallactic_angle: f64,
    /// Geocentric ecliptic longitude in [0, 360).
    pub ecliptic_longitude: f64,
}

/// Shifts a geocentric altitude to the observer on the Earth's surface.
///
/// The moon is close enough that the observer's offset from the Earth's
/// centre lowers it by up to about a degree near the horizon.
fn topocentric_altitude(geocentric: f64, distance_km: f64) -> f64 {
    (geocentric.sin() - EARTH_RADIUS_KM / distance_km).atan2(geocentric.cos())
}

/// Moon altitude, azimuth and distance for an observer at `instant`.
pub fn moon_position(location: ObserverLocation, instant: DateTime<Utc>) -> MoonPosition {
    moon_position_at(location, days_since_j2000(instant))
}

pub(crate) fn moon_position_at(location: ObserverLocation, d: f64) -> MoonPosition {
    let lw = -RAD * location.longitude();
    let phi = RAD * location.latitude();
    let coords = moon_coords(d);
    let (hour_angle, altitude, azimuth) = sky::horizontal(coords.equatorial, d, lw, phi);
    let dec = coords.equatorial.dec;
    let parallactic = hour_angle
        .sin()
        .atan2(phi.tan() * dec.cos() - dec.sin() * hour_angle.cos());
    let altitude = topocentric_altitude(altitude, coords.distance_km);
    MoonPosition {
        altitude: (altitude + astro_refraction(altitude)) / RAD,
        azimuth: sky::compass_azimuth_degrees(azimuth),
        distance_km: coords.distance_km,
        parallactic_angle: parallactic / RAD,
        ecliptic_longitude: normalize_degrees_360(coords.ecliptic_longitude / RAD),
    }
}

// ============================================================================
// Illumination
// ============================================================================

/// The eight named phases, each spanning 45° of the synodic cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    const ORDER: [MoonPhaseName; 8] = [
        MoonPhaseName::NewMoon,
        MoonPhaseName::WaxingCrescent,
        MoonPhaseName::FirstQuarter,
        MoonPhaseName::WaxingGibbous,
        MoonPhaseName::FullMoon,
        MoonPhaseName::WaningGibbous,
        MoonPhaseName::LastQuarter,
        MoonPhaseName::WaningCrescent,
    ];

    /// Bucket a position in the cycle (0° new, 180° full) into a named phase.
    ///
    /// Buckets are centred on multiples of 45°, so New Moon covers
    /// [337.5°, 360°) ∪ [0°, 22.5°).
    pub fn from_cycle_degrees(degrees: f64) -> Self {
        let degrees = normalize_degrees_360(degrees);
        let index = ((degrees + 22.5) / 45.0).floor() as usize % 8;
        Self::ORDER[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhaseName::NewMoon => "New Moon",
            MoonPhaseName::WaxingCrescent => "Waxing Crescent",
            MoonPhaseName::FirstQuarter => "First Quarter",
            MoonPhaseName::WaxingGibbous => "Waxing Gibbous",
            MoonPhaseName::FullMoon => "Full Moon",
            MoonPhaseName::WaningGibbous => "Waning Gibbous",
            MoonPhaseName::LastQuarter => "Last Quarter",
            MoonPhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl core::fmt::Display for MoonPhaseName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the lunar disc is lit, and where the moon is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonIllumination {
    /// Illuminated fraction of the disc, in [0, 1].
    pub fraction: f64,
    /// Sun–moon–earth phase angle in degrees: 0 at full, 180 at new.
    pub phase_angle: f64,
    /// Position angle of the bright limb's midpoint, degrees.
    pub angle: f64,
    /// Cycle position in [0, 1): 0 new, 0.25 first quarter, 0.5 full, 0.75 last quarter.
    pub phase: f64,
    pub phase_name: MoonPhaseName,
}

/// Lunar illumination at `instant`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geocelestial::{moon_illumination, MoonPhaseName};
///
/// // Full moon of 2019-03-21 01:43 UTC.
/// let full = Utc.with_ymd_and_hms(2019, 3, 21, 1, 43, 0).unwrap();
/// let illumination = moon_illumination(full);
/// assert!(illumination.fraction > 0.99);
/// assert_eq!(illumination.phase_name, MoonPhaseName::FullMoon);
/// ```
pub fn moon_illumination(instant: DateTime<Utc>) -> MoonIllumination {
    let d = days_since_j2000(instant);
    let sun = sun_equatorial(d);
    let moon = moon_coords(d);
    let m = moon.equatorial;

    let elongation =
        (sun.dec.sin() * m.dec.sin() + sun.dec.cos() * m.dec.cos() * (sun.ra - m.ra).cos()).acos();
    let inc = (SUN_DISTANCE_KM * elongation.sin()).atan2(moon.distance_km - SUN_DISTANCE_KM * elongation.cos());
    let angle = (sun.dec.cos() * (sun.ra - m.ra).sin())
        .atan2(sun.dec.sin() * m.dec.cos() - sun.dec.cos() * m.dec.sin() * (sun.ra - m.ra).cos());

    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    let mut phase = 0.5 + 0.5 * inc * sign / core::f64::consts::PI;
    if phase >= 1.0 {
        phase -= 1.0;
    }

    MoonIllumination {
        fraction: ((1.0 + inc.cos()) / 2.0).clamp(0.0, 1.0),
        phase_angle: inc / RAD,
        angle: angle / RAD,
        phase,
        phase_name: MoonPhaseName::from_cycle_degrees(phase * 360.0),
    }
}

// ============================================================================
// Distance series and the anomalistic cycle
// ============================================================================

/// Multiples of D, M, M', F and the cosine coefficient (0.001 km) of one distance term.
struct DistanceTerm(i8, i8, i8, i8, f64);

#[rustfmt::skip]
const DISTANCE_TERMS: [DistanceTerm; 44] = [
    DistanceTerm(0, 0, 1, 0, -20_905_355.0), DistanceTerm(2, 0, -1, 0, -3_699_111.0),
    DistanceTerm(2, 0, 0, 0, -2_955_968.0), DistanceTerm(0, 0, 2, 0, -569_925.0),
    DistanceTerm(0, 1, 0, 0, 48_888.0), DistanceTerm(0, 0, 0, 2, -3_149.0),
    DistanceTerm(2, 0, -2, 0, 246_158.0), DistanceTerm(2, -1, -1, 0, -152_138.0),
    DistanceTerm(2, 0, 1, 0, -170_733.0), DistanceTerm(2, -1, 0, 0, -204_586.0),
    DistanceTerm(0, 1, -1, 0, -129_620.0), DistanceTerm(1, 0, 0, 0, 108_743.0),
    DistanceTerm(0, 1, 1, 0, 104_755.0), DistanceTerm(2, 0, 0, -2, 10_321.0),
    DistanceTerm(0, 0, 1, -2, 79_661.0), DistanceTerm(4, 0, -1, 0, -34_782.0),
    DistanceTerm(0, 0, 3, 0, -23_210.0), DistanceTerm(4, 0, -2, 0, -21_636.0),
    DistanceTerm(2, 1, -1, 0, 24_208.0), DistanceTerm(2, 1, 0, 0, 30_824.0),
    DistanceTerm(1, 0, -1, 0, -8_379.0), DistanceTerm(1, 1, 0, 0, -16_675.0),
    DistanceTerm(2, -1, 1, 0, -12_831.0), DistanceTerm(2, 0, 2, 0, -10_445.0),
    DistanceTerm(4, 0, 0, 0, -11_650.0), DistanceTerm(2, 0, -3, 0, 14_403.0),
    DistanceTerm(0, 1, -2, 0, -7_003.0), DistanceTerm(2, -1, -2, 0, 10_056.0),
    DistanceTerm(1, 0, 1, 0, 6_322.0), DistanceTerm(2, -2, 0, 0, -9_884.0),
    DistanceTerm(0, 1, 2, 0, 5_751.0), DistanceTerm(2, -2, -1, 0, -4_950.0),
    DistanceTerm(2, 0, 1, -2, 4_130.0), DistanceTerm(4, -1, -1, 0, -3_958.0),
    DistanceTerm(3, 0, -1, 0, 3_258.0), DistanceTerm(2, 1, 1, 0, 2_616.0),
    DistanceTerm(2, 1, -2, 0, -1_897.0), DistanceTerm(2, -1, 2, 0, -2_117.0),
    DistanceTerm(2, 2, -1, 0, 2_354.0), DistanceTerm(4, 0, 1, 0, -1_423.0),
    DistanceTerm(0, 0, 4, 0, -1_117.0), DistanceTerm(4, -1, -2, 0, -1_571.0),
    DistanceTerm(1, 0, -2, 0, -1_739.0), DistanceTerm(4, -1, 0, 0, -4_421.0),
];

/// Geocentric Earth–Moon distance in km at a Julian Day.
pub fn lunar_distance_km(julian_day: f64) -> f64 {
    let t = julian_century(julian_day);
    let elongation = RAD * (297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t + t * t * t / 545_868.0
        - t * t * t * t / 113_065_000.0);
    let sun_anomaly = RAD * (357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t + t * t * t / 24_490_000.0);
    let moon_anomaly = RAD * (134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t + t * t * t / 69_699.0
        - t * t * t * t / 14_712_000.0);
    let latitude_argument = RAD * (93.272_095 + 483_202.017_523_3 * t - 0.003_653_9 * t * t
        - t * t * t / 3_526_000.0
        + t * t * t * t / 863_310_000.0);
    // Decreasing eccentricity of Earth's orbit scales every term that carries M.
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let sum: f64 = DISTANCE_TERMS
        .iter()
        .map(|DistanceTerm(d, m, mp, f, coeff)| {
            let scale = match m.unsigned_abs() {
                0 => 1.0,
                1 => e,
                _ => e * e,
            };
            let argument = *d as f64 * elongation
                + *m as f64 * sun_anomaly
                + *mp as f64 * moon_anomaly
                + *f as f64 * latitude_argument;
            coeff * scale * argument.cos()
        })
        .sum();

    MEAN_MOON_DISTANCE_KM + sum / 1000.0
}

/// One lunar distance extremum.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceExtremum {
    pub instant: DateTime<Utc>,
    pub distance_km: f64,
}

/// The closest extremum before the query instant and the first one after it.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtremumPair {
    pub last: Option<DistanceExtremum>,
    pub next: Option<DistanceExtremum>,
}

/// Perigee and apogee around an instant.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunarCycle {
    pub perigee: ExtremumPair,
    pub apogee: ExtremumPair,
}

/// Mean perigee (integer `k`) or apogee (`k + 0.5`) epoch as a Julian Day.
fn mean_cycle_epoch(k: f64) -> f64 {
    let t = k / 1325.55;
    2_451_534.669_8 + ANOMALISTIC_MONTH * k - 0.000_669_1 * t * t - 0.000_001_098 * t * t * t
        + 0.000_000_005_2 * t * t * t * t
}

/// Sampling step and half-width of the bracket search around a mean epoch, days.
const SAMPLE_STEP: f64 = 0.125;
const SAMPLE_HALF_WIDTH: f64 = 6.0;
const GOLDEN_TOLERANCE: f64 = 1e-5;

/// Refines a mean epoch to the true distance extremum.
///
/// Samples the distance series on a 3-hour grid around the mean epoch, then
/// narrows the best bracket with a golden-section search.
fn refine_extremum(k: f64, perigee: bool) -> (f64, f64) {
    let sign = if perigee { 1.0 } else { -1.0 };
    let objective = |jd: f64| sign * lunar_distance_km(jd);

    let center = mean_cycle_epoch(k);
    let samples = (SAMPLE_HALF_WIDTH / SAMPLE_STEP) as i32;
    let mut best_jd = center;
    let mut best_value = objective(center);
    for i in -samples..=samples {
        let jd = center + i as f64 * SAMPLE_STEP;
        let value = objective(jd);
        if value < best_value {
            best_value = value;
            best_jd = jd;
        }
    }

    let ratio = (5.0f64.sqrt() - 1.0) / 2.0;
    let mut a = best_jd - SAMPLE_STEP;
    let mut b = best_jd + SAMPLE_STEP;
    let mut x1 = b - ratio * (b - a);
    let mut x2 = a + ratio * (b - a);
    let mut f1 = objective(x1);
    let mut f2 = objective(x2);
    while b - a > GOLDEN_TOLERANCE {
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = b - ratio * (b - a);
            f1 = objective(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + ratio * (b - a);
            f2 = objective(x2);
        }
    }
    let jd = (a + b) / 2.0;
    (jd, lunar_distance_km(jd))
}

fn extremum_pair(instant: DateTime<Utc>, perigee: bool) -> ExtremumPair {
    let jd = to_julian_day(instant);
    let k0 = ((decimal_year(instant) - 1999.97) * 13.2555).floor();
    let offset = if perigee { 0.0 } else { 0.5 };

    let mut last: Option<(f64, f64)> = None;
    let mut next: Option<(f64, f64)> = None;
    for step in -2..=2 {
        let (event_jd, distance) = refine_extremum(k0 + step as f64 + offset, perigee);
        if event_jd <= jd {
            if last.map_or(true, |(best, _)| event_jd > best) {
                last = Some((event_jd, distance));
            }
        } else if next.map_or(true, |(best, _)| event_jd < best) {
            next = Some((event_jd, distance));
        }
    }

    let to_event = |(event_jd, distance_km): (f64, f64)| {
        from_julian_day(event_jd).map(|instant| DistanceExtremum { instant, distance_km })
    };
    ExtremumPair {
        last: last.and_then(to_event),
        next: next.and_then(to_event),
    }
}

/// Last and next perigee and apogee around `instant`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geocelestial::lunar_cycle;
///
/// let cycle = lunar_cycle(Utc.with_ymd_and_hms(2019, 3, 19, 0, 0, 0).unwrap());
/// let perigee = cycle.perigee.next.unwrap();
/// assert!((perigee.distance_km - 359_377.0).abs() < 100.0);
/// ```
pub fn lunar_cycle(instant: DateTime<Utc>) -> LunarCycle {
    LunarCycle {
        perigee: extremum_pair(instant, true),
        apogee: extremum_pair(instant, false),
    }
}
