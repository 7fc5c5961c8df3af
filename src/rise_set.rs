//! Horizon crossings: rise, set and twilight for the sun, rise and set for the moon.
//!
//! All searches work on a UTC calendar day. Shifting the result onto a local
//! calendar day is the job of [`crate::local_time`].

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

#[allow(unused_imports)]
use core_maths::CoreFloat;

use core::f64::consts::PI;

use crate::lunar::{moon_position, moon_position_at};
use crate::math::RAD;
use crate::sky;
use crate::solar::{ecliptic_longitude, solar_mean_anomaly, sun_position};
use crate::time::{days_since_j2000, from_julian_day, shift_days, start_of_day, J2000};
use crate::ObserverLocation;

/// Sun's upper limb touching a refracted sea-level horizon.
pub const VISUAL_HORIZON: f64 = -0.833;
/// Sea-level rise/set of the bottom of the solar disc.
pub const BOTTOM_DISC_HORIZON: f64 = -0.3;
pub const CIVIL_TWILIGHT: f64 = -6.0;
pub const NAUTICAL_TWILIGHT: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT: f64 = -18.0;
/// Moon rise/set threshold for the parallax-corrected, refracted altitude:
/// the upper limb on the horizon, one mean semidiameter below it.
pub const MOON_HORIZON: f64 = -0.259;

/// Offset of the transit formula's day boundary, days.
const J0: f64 = 0.0009;

/// Spacing of the altitude samples that settle an all-day condition.
const SAMPLE_MINUTES: i64 = 10;
const SAMPLES_PER_DAY: i64 = 24 * 60 / SAMPLE_MINUTES;

/// How a body behaves relative to the horizon on one calendar day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CelestialStatus {
    /// Both a rise and a set fall on the day.
    RiseAndSet,
    /// Only a set falls on the day.
    NoRise,
    /// Only a rise falls on the day.
    NoSet,
    /// Above the threshold all day (midnight sun).
    UpAllDay,
    /// Below the threshold all day (polar night).
    DownAllDay,
}

impl CelestialStatus {
    /// Classifies a day from the events found on it.
    ///
    /// `up` is only consulted when neither event occurs and says on which side
    /// of the threshold the body spent most of the day.
    pub fn classify<T>(rise: Option<T>, set: Option<T>, up: bool) -> Self {
        match (rise, set) {
            (Some(_), Some(_)) => CelestialStatus::RiseAndSet,
            (None, Some(_)) => CelestialStatus::NoRise,
            (Some(_), None) => CelestialStatus::NoSet,
            (None, None) if up => CelestialStatus::UpAllDay,
            (None, None) => CelestialStatus::DownAllDay,
        }
    }

    /// True for the two conditions where the body never crosses the horizon.
    pub fn is_all_day(&self) -> bool {
        matches!(self, CelestialStatus::UpAllDay | CelestialStatus::DownAllDay)
    }
}

/// Whether `altitude` stays above `threshold` for most of the 24 hours from `start`.
///
/// Settles the condition of a day on which no crossing was found. Near the
/// polar circles a single sample can land in the few minutes the body dips
/// below (or peeks above) the threshold, so the whole day is sampled.
pub(crate) fn mostly_above(start: DateTime<Utc>, threshold: f64, altitude: impl Fn(DateTime<Utc>) -> f64) -> bool {
    let above = (0..SAMPLES_PER_DAY)
        .filter_map(|i| TimeDelta::try_minutes(SAMPLE_MINUTES * i).and_then(|step| start.checked_add_signed(step)))
        .filter(|instant| altitude(*instant) > threshold)
        .count() as i64;
    above * 2 > SAMPLES_PER_DAY
}

/// Rise and set instants of one body on one UTC day.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    pub status: CelestialStatus,
}

// ============================================================================
// Sun
// ============================================================================

/// Hour angle at which the body sits on `threshold`, or `None` when it stays
/// on one side of it for the whole cycle.
fn hour_angle(threshold: f64, phi: f64, dec: f64) -> Option<f64> {
    let cos_h = (threshold.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());
    (-1.0..=1.0).contains(&cos_h).then(|| cos_h.acos())
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

/// Julian Day of a transit-relative event.
fn solar_transit_jd(ds: f64, m: f64, l: f64) -> f64 {
    J2000 + ds + 0.0053 * m.sin() - 0.0069 * (2.0 * l).sin()
}

/// Transit solution for the solar cycle nearest one UTC midnight.
struct SolarCycle {
    lw: f64,
    cycle: f64,
    mean_anomaly: f64,
    longitude: f64,
    declination: f64,
    noon_jd: f64,
}

impl SolarCycle {
    fn new(location: ObserverLocation, day: NaiveDate) -> Self {
        let lw = -RAD * location.longitude();
        let d = days_since_j2000(start_of_day(day));
        let cycle = (d - J0 - lw / (2.0 * PI)).round();
        let ds = approx_transit(0.0, lw, cycle);
        let mean_anomaly = solar_mean_anomaly(ds);
        let longitude = ecliptic_longitude(mean_anomaly);
        SolarCycle {
            lw,
            cycle,
            mean_anomaly,
            longitude,
            declination: sky::declination(longitude, 0.0),
            noon_jd: solar_transit_jd(ds, mean_anomaly, longitude),
        }
    }

    /// Rise and set Julian Days at `threshold` degrees.
    fn events(&self, phi: f64, threshold: f64) -> Option<(f64, f64)> {
        hour_angle(RAD * threshold, phi, self.declination).map(|w| {
            let a = approx_transit(w, self.lw, self.cycle);
            let set = solar_transit_jd(a, self.mean_anomaly, self.longitude);
            (self.noon_jd - (set - self.noon_jd), set)
        })
    }
}

fn on_day(instant: &DateTime<Utc>, day: NaiveDate) -> bool {
    instant.date_naive() == day
}

/// Finds the sun's crossings of `threshold` degrees on a UTC calendar day.
///
/// The transit solution for one cycle can put its rise or set on a
/// neighbouring date, so the cycles around `day - 2 ..= day + 2` are all
/// solved and the events whose UTC date is `day` are kept. With neither
/// event on the day, the altitude sampled across it decides between
/// [`CelestialStatus::UpAllDay`] and [`CelestialStatus::DownAllDay`].
///
/// # Arguments
///
/// * `location` - Observer
/// * `day` - UTC calendar day
/// * `threshold` - Altitude in degrees, e.g. [`VISUAL_HORIZON`] or [`CIVIL_TWILIGHT`]
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use geocelestial::{find_crossing, CelestialStatus, ObserverLocation, VISUAL_HORIZON};
///
/// let tromso = ObserverLocation::new(69.6492, 18.9553).unwrap();
/// let midsummer = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
/// let crossing = find_crossing(tromso, midsummer, VISUAL_HORIZON);
/// assert_eq!(crossing.status, CelestialStatus::UpAllDay);
/// assert!(crossing.rise.is_none() && crossing.set.is_none());
/// ```
pub fn find_crossing(location: ObserverLocation, day: NaiveDate, threshold: f64) -> Crossing {
    let phi = RAD * location.latitude();
    let mut rise = None;
    let mut set = None;

    for offset in -2..=2 {
        let cycle = SolarCycle::new(location, shift_days(day, offset));
        if let Some((rise_jd, set_jd)) = cycle.events(phi, threshold) {
            if rise.is_none() {
                rise = from_julian_day(rise_jd).filter(|t| on_day(t, day));
            }
            if set.is_none() {
                set = from_julian_day(set_jd).filter(|t| on_day(t, day));
            }
        }
    }

    let up = rise.is_none()
        && set.is_none()
        && mostly_above(start_of_day(day), threshold, |t| sun_position(location, t).altitude);
    Crossing {
        rise,
        set,
        status: CelestialStatus::classify(rise, set, up),
    }
}

/// Instant of the sun's upper transit on a UTC calendar day.
pub fn solar_noon(location: ObserverLocation, day: NaiveDate) -> Option<DateTime<Utc>> {
    (-1..=1)
        .filter_map(|offset| from_julian_day(SolarCycle::new(location, shift_days(day, offset)).noon_jd))
        .find(|t| on_day(t, day))
}

// ============================================================================
// Moon
// ============================================================================

fn hours_after(midnight: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let seconds = (hours * 3600.0).round() as i64;
    TimeDelta::try_seconds(seconds).and_then(|delta| midnight.checked_add_signed(delta))
}

/// Finds moonrise and moonset on a UTC calendar day.
///
/// The parallax-corrected, refracted altitude is sampled hourly from midnight
/// and every two-hour window is fitted with a parabola whose roots give the
/// crossings against [`MOON_HORIZON`].
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Timelike};
/// use geocelestial::{moon_crossing, CelestialStatus, ObserverLocation};
///
/// let trenton = ObserverLocation::new(40.0352, -74.5844).unwrap();
/// let crossing = moon_crossing(trenton, NaiveDate::from_ymd_opt(2019, 3, 19).unwrap());
/// assert_eq!(crossing.status, CelestialStatus::RiseAndSet);
/// assert_eq!(crossing.rise.unwrap().hour(), 21);
/// ```
pub fn moon_crossing(location: ObserverLocation, day: NaiveDate) -> Crossing {
    let midnight = start_of_day(day);
    let d0 = days_since_j2000(midnight);
    let altitude = |hour: f64| moon_position_at(location, d0 + hour / 24.0).altitude - MOON_HORIZON;

    let mut rise_hour: Option<f64> = None;
    let mut set_hour: Option<f64> = None;
    let mut h0 = altitude(0.0);
    let mut ye = 0.0;

    for i in (1..=24).step_by(2) {
        let i = i as f64;
        let h1 = altitude(i);
        let h2 = altitude(i + 1.0);

        let a = (h0 + h2) / 2.0 - h1;
        let b = (h2 - h0) / 2.0;
        let xe = -b / (2.0 * a);
        ye = (a * xe + b) * xe + h1;
        let discriminant = b * b - 4.0 * a * h1;

        let mut roots = 0;
        let mut x1 = 0.0;
        let mut x2 = 0.0;
        if discriminant >= 0.0 {
            let dx = discriminant.sqrt() / (a.abs() * 2.0);
            x1 = xe - dx;
            x2 = xe + dx;
            if x1.abs() <= 1.0 {
                roots += 1;
            }
            if x2.abs() <= 1.0 {
                roots += 1;
            }
            if x1 < -1.0 {
                x1 = x2;
            }
        }

        if roots == 1 {
            if h0 < 0.0 {
                rise_hour = Some(i + x1);
            } else {
                set_hour = Some(i + x1);
            }
        } else if roots == 2 {
            rise_hour = Some(i + if ye < 0.0 { x2 } else { x1 });
            set_hour = Some(i + if ye < 0.0 { x1 } else { x2 });
        }

        if rise_hour.is_some() && set_hour.is_some() {
            break;
        }
        h0 = h2;
    }

    // The last window ends on the following midnight.
    let rise = rise_hour.and_then(|h| hours_after(midnight, h)).filter(|t| on_day(t, day));
    let set = set_hour.and_then(|h| hours_after(midnight, h)).filter(|t| on_day(t, day));
    let no_crossing = rise.is_none() && set.is_none();
    if no_crossing {
        log::trace!("moon does not cross the horizon on {day}, vertex altitude {ye:.3}");
    }
    let up = no_crossing && mostly_above(midnight, MOON_HORIZON, |t| moon_position(location, t).altitude);
    Crossing {
        rise,
        set,
        status: CelestialStatus::classify(rise, set, up),
    }
}
