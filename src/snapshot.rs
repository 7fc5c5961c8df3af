//! The celestial snapshot: everything known about the sky for one observer and instant.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::eclipse::{nearest_eclipses, EclipseBody, EclipseSource, NearestEclipses};
use crate::local_time::reconcile;
use crate::lunar::{lunar_cycle, moon_illumination, moon_position, LunarCycle, MoonIllumination};
use crate::names::{full_moon_name, FullMoonName, ZodiacSign};
use crate::rise_set::{
    find_crossing, moon_crossing, solar_noon, CelestialStatus, ASTRONOMICAL_TWILIGHT, BOTTOM_DISC_HORIZON,
    CIVIL_TWILIGHT, MOON_HORIZON, NAUTICAL_TWILIGHT, VISUAL_HORIZON,
};
use crate::solar::sun_position;
use crate::time::shift_days;
use crate::ObserverLocation;

/// Which parts of a [`CelestialSnapshot`] to compute.
///
/// Everything is on by default. Turning a group off leaves its snapshot field `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EagerLoad {
    pub sun: bool,
    pub moon: bool,
    /// Perigee and apogee.
    pub lunar_cycle: bool,
    /// Only consulted when [`CelestialOptions::eclipses`] is set.
    pub eclipses: bool,
    /// Zodiac sign, moon sign and full moon name.
    pub extensions: bool,
}

impl EagerLoad {
    pub const ALL: EagerLoad = EagerLoad {
        sun: true,
        moon: true,
        lunar_cycle: true,
        eclipses: true,
        extensions: true,
    };

    pub const NONE: EagerLoad = EagerLoad {
        sun: false,
        moon: false,
        lunar_cycle: false,
        eclipses: false,
        extensions: false,
    };
}

impl Default for EagerLoad {
    fn default() -> Self {
        EagerLoad::ALL
    }
}

/// Options for [`calculate_celestial`].
#[derive(Copy, Clone)]
pub struct CelestialOptions<'a> {
    /// UTC offset of the observer's calendar. Rise and set events are
    /// reported for the local day containing the query instant.
    pub offset: FixedOffset,
    pub include: EagerLoad,
    pub eclipses: Option<&'a dyn EclipseSource>,
}

impl Default for CelestialOptions<'_> {
    fn default() -> Self {
        CelestialOptions {
            offset: Utc.fix(),
            include: EagerLoad::ALL,
            eclipses: None,
        }
    }
}

impl core::fmt::Debug for CelestialOptions<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CelestialOptions")
            .field("offset", &self.offset)
            .field("include", &self.include)
            .field("eclipses", &self.eclipses.is_some())
            .finish()
    }
}

/// Twilight, bottom-of-disc and transit instants for one day.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdditionalSolarTimes {
    pub civil_dawn: Option<DateTime<Utc>>,
    pub civil_dusk: Option<DateTime<Utc>>,
    pub nautical_dawn: Option<DateTime<Utc>>,
    pub nautical_dusk: Option<DateTime<Utc>>,
    pub astronomical_dawn: Option<DateTime<Utc>>,
    pub astronomical_dusk: Option<DateTime<Utc>>,
    /// Sea-level rise of the bottom of the disc.
    pub bottom_disc_rise: Option<DateTime<Utc>>,
    pub bottom_disc_set: Option<DateTime<Utc>>,
    pub solar_noon: Option<DateTime<Utc>>,
}

/// Sun events for the day plus its position at the query instant.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SunState {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    pub altitude: f64,
    pub azimuth: f64,
    pub condition: CelestialStatus,
    pub additional: AdditionalSolarTimes,
}

/// Moon events for the day plus its position and light at the query instant.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonState {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    /// Parallax-corrected, refracted altitude, degrees.
    pub altitude: f64,
    pub azimuth: f64,
    pub condition: CelestialStatus,
    pub distance_km: f64,
    pub illumination: MoonIllumination,
}

/// Calendar-derived names for the day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CelestialExtensions {
    pub zodiac_sign: ZodiacSign,
    pub moon_sign: ZodiacSign,
    /// Present only on the day of a full moon.
    pub moon_name: Option<FullMoonName>,
}

/// Everything computed for one observer at one instant.
///
/// Produced whole by [`calculate_celestial`]; groups switched off through
/// [`EagerLoad`] are `None`. Event instants are UTC; [`Self::offset`] is the
/// offset whose local calendar day the events belong to.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CelestialSnapshot {
    pub location: ObserverLocation,
    pub instant: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(with = "offset_seconds"))]
    pub offset: FixedOffset,
    pub sun: Option<SunState>,
    pub moon: Option<MoonState>,
    pub lunar_cycle: Option<LunarCycle>,
    pub solar_eclipses: Option<NearestEclipses>,
    pub lunar_eclipses: Option<NearestEclipses>,
    pub extensions: Option<CelestialExtensions>,
}

impl CelestialSnapshot {
    /// Whether the sun's upper limb is above the horizon at the query instant.
    pub fn is_sun_up(&self) -> bool {
        self.sun.is_some_and(|sun| sun.altitude > VISUAL_HORIZON)
    }

    /// Whether the moon's upper limb is above the horizon at the query instant.
    ///
    /// Uses the same threshold as moonrise and moonset, so the moon reads as
    /// up exactly between the two.
    pub fn is_moon_up(&self) -> bool {
        self.moon.is_some_and(|moon| moon.altitude > MOON_HORIZON)
    }

    /// An event instant expressed in the snapshot's offset.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

/// Serializes a [`FixedOffset`] as whole seconds east of UTC.
#[cfg(feature = "serde")]
mod offset_seconds {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(offset.local_minus_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedOffset, D::Error> {
        let seconds = i32::deserialize(deserializer)?;
        FixedOffset::east_opt(seconds).ok_or_else(|| serde::de::Error::custom("UTC offset out of range"))
    }
}

fn sun_state(location: ObserverLocation, instant: DateTime<Utc>, day: NaiveDate) -> SunState {
    let position = sun_position(location, instant);
    let visual = find_crossing(location, day, VISUAL_HORIZON);
    let bottom = find_crossing(location, day, BOTTOM_DISC_HORIZON);
    let civil = find_crossing(location, day, CIVIL_TWILIGHT);
    let nautical = find_crossing(location, day, NAUTICAL_TWILIGHT);
    let astronomical = find_crossing(location, day, ASTRONOMICAL_TWILIGHT);
    SunState {
        rise: visual.rise,
        set: visual.set,
        altitude: position.altitude,
        azimuth: position.azimuth,
        condition: visual.status,
        additional: AdditionalSolarTimes {
            civil_dawn: civil.rise,
            civil_dusk: civil.set,
            nautical_dawn: nautical.rise,
            nautical_dusk: nautical.set,
            astronomical_dawn: astronomical.rise,
            astronomical_dusk: astronomical.set,
            bottom_disc_rise: bottom.rise,
            bottom_disc_set: bottom.set,
            solar_noon: solar_noon(location, day),
        },
    }
}

fn moon_state(location: ObserverLocation, instant: DateTime<Utc>, day: NaiveDate) -> MoonState {
    let position = moon_position(location, instant);
    let crossing = moon_crossing(location, day);
    MoonState {
        rise: crossing.rise,
        set: crossing.set,
        altitude: position.altitude,
        azimuth: position.azimuth,
        condition: crossing.status,
        distance_km: position.distance_km,
        illumination: moon_illumination(instant),
    }
}

/// Builds a snapshot whose rise/set events belong to the UTC day `day`.
///
/// Positions, illumination and the other instant-based values are taken at
/// `instant` regardless of `day`.
pub(crate) fn utc_day_snapshot(
    location: ObserverLocation,
    instant: DateTime<Utc>,
    day: NaiveDate,
    options: &CelestialOptions<'_>,
) -> CelestialSnapshot {
    let include = options.include;
    let eclipse_source = options.eclipses.filter(|_| include.eclipses);

    let extensions = include.extensions.then(|| CelestialExtensions {
        zodiac_sign: ZodiacSign::from_date(day),
        moon_sign: ZodiacSign::from_ecliptic_longitude(moon_position(location, instant).ecliptic_longitude),
        moon_name: full_moon_name(day, options.offset),
    });

    CelestialSnapshot {
        location,
        instant,
        offset: Utc.fix(),
        sun: include.sun.then(|| sun_state(location, instant, day)),
        moon: include.moon.then(|| moon_state(location, instant, day)),
        lunar_cycle: include.lunar_cycle.then(|| lunar_cycle(instant)),
        solar_eclipses: eclipse_source.map(|s| nearest_eclipses(s, EclipseBody::Solar, day)),
        lunar_eclipses: eclipse_source.map(|s| nearest_eclipses(s, EclipseBody::Lunar, day)),
        extensions,
    }
}

/// Computes a [`CelestialSnapshot`] for an observer at `instant`.
///
/// Rise, set and twilight events are those of the calendar day containing
/// `instant` in `options.offset`. A zero offset reads a single UTC day;
/// otherwise the UTC days either side are computed too and reconciled onto
/// the local day.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Timelike, Utc};
/// use geocelestial::{calculate_celestial, CelestialOptions, CelestialStatus, ObserverLocation};
///
/// let trenton = ObserverLocation::new(40.0352, -74.5844).unwrap();
/// let instant = Utc.with_ymd_and_hms(2019, 3, 19, 12, 0, 0).unwrap();
/// let snapshot = calculate_celestial(trenton, instant, &CelestialOptions::default());
///
/// let sun = snapshot.sun.unwrap();
/// assert_eq!(sun.condition, CelestialStatus::RiseAndSet);
/// assert_eq!(sun.rise.unwrap().hour(), 11);
/// assert!(snapshot.is_sun_up());
/// ```
pub fn calculate_celestial(
    location: ObserverLocation,
    instant: DateTime<Utc>,
    options: &CelestialOptions<'_>,
) -> CelestialSnapshot {
    if options.offset.local_minus_utc() == 0 {
        return utc_day_snapshot(location, instant, instant.date_naive(), options);
    }

    let local_day = instant.with_timezone(&options.offset).date_naive();
    let candidates = [
        utc_day_snapshot(location, instant, shift_days(local_day, -1), options),
        utc_day_snapshot(location, instant, local_day, options),
        utc_day_snapshot(location, instant, shift_days(local_day, 1), options),
    ];
    reconcile(candidates, options.offset, local_day)
}
