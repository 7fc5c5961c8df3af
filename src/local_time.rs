//! Reconciling UTC-day events onto an observer's local calendar day.
//!
//! Events are solved per UTC day. Under a non-zero offset a local day spans
//! parts of two or three UTC days, so each event is taken from whichever of
//! the snapshots for UTC days `local - 1`, `local` and `local + 1` puts it on
//! the local day.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::rise_set::{mostly_above, CelestialStatus, MOON_HORIZON, VISUAL_HORIZON};
use crate::snapshot::{AdditionalSolarTimes, CelestialSnapshot, MoonState, SunState};
use crate::time::start_of_local_day;
use crate::{lunar::moon_position, solar::sun_position};

/// Index of the candidate for the requested day itself.
const DAY: usize = 1;

fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Picks which of three candidates of one event lands on `local_day`.
///
/// Candidates are ordered day before, day, day after. The day's own candidate
/// wins when it fits, then the day before, then the day after. `None` when no
/// candidate falls on the local day.
///
/// # Example
///
/// ```
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
/// use geocelestial::determine_slipped_event_index;
///
/// let est = FixedOffset::west_opt(5 * 3600).unwrap();
/// let local_day = NaiveDate::from_ymd_opt(2019, 3, 19).unwrap();
/// // 02:00 UTC on the 20th is 21:00 local on the 19th.
/// let candidates = [
///     Some(Utc.with_ymd_and_hms(2019, 3, 18, 2, 0, 0).unwrap()),
///     Some(Utc.with_ymd_and_hms(2019, 3, 19, 2, 0, 0).unwrap()),
///     Some(Utc.with_ymd_and_hms(2019, 3, 20, 2, 0, 0).unwrap()),
/// ];
/// assert_eq!(determine_slipped_event_index(&candidates, est, local_day), Some(2));
/// ```
pub fn determine_slipped_event_index(
    candidates: &[Option<DateTime<Utc>>; 3],
    offset: FixedOffset,
    local_day: NaiveDate,
) -> Option<usize> {
    [DAY, 0, 2]
        .into_iter()
        .find(|&index| candidates[index].is_some_and(|t| local_date(t, offset) == local_day))
}

/// Selects one event from the three candidates, or `None` if none lands on the day.
fn select(candidates: [Option<DateTime<Utc>>; 3], offset: FixedOffset, local_day: NaiveDate) -> Option<DateTime<Utc>> {
    determine_slipped_event_index(&candidates, offset, local_day).and_then(|index| candidates[index])
}

/// Takes a correlated event from the same candidate as its anchor, falling
/// back to its own index when the anchor is absent.
fn select_with(
    anchor: Option<usize>,
    candidates: [Option<DateTime<Utc>>; 3],
    offset: FixedOffset,
    local_day: NaiveDate,
) -> Option<DateTime<Utc>> {
    match anchor {
        Some(index) => candidates[index].filter(|t| local_date(*t, offset) == local_day),
        None => select(candidates, offset, local_day),
    }
}

/// Condition after reconciliation.
///
/// The selected events decide when any is present. With neither, the body
/// is up all day when `mostly_up` reports it above the horizon for most of
/// the local day. The UTC-day conditions are not reused: they describe a
/// different 24 hours.
fn reconcile_condition(
    rise: Option<DateTime<Utc>>,
    set: Option<DateTime<Utc>>,
    mostly_up: impl FnOnce() -> bool,
) -> CelestialStatus {
    if rise.is_some() || set.is_some() {
        return CelestialStatus::classify(rise, set, false);
    }
    CelestialStatus::classify(rise, set, mostly_up())
}

fn reconcile_sun(
    suns: [SunState; 3],
    offset: FixedOffset,
    local_day: NaiveDate,
    local_midnight: DateTime<Utc>,
    snapshot: &CelestialSnapshot,
) -> SunState {
    let pick = |f: fn(&SunState) -> Option<DateTime<Utc>>| [f(&suns[0]), f(&suns[1]), f(&suns[2])];

    let rises = pick(|s| s.rise);
    let sets = pick(|s| s.set);
    let rise_index = determine_slipped_event_index(&rises, offset, local_day);
    let set_index = determine_slipped_event_index(&sets, offset, local_day);
    let rise = rise_index.and_then(|i| rises[i]);
    let set = set_index.and_then(|i| sets[i]);
    log::trace!("sun rise from candidate {rise_index:?}, set from candidate {set_index:?} for {local_day}");

    let additional = AdditionalSolarTimes {
        civil_dawn: select_with(rise_index, pick(|s| s.additional.civil_dawn), offset, local_day),
        nautical_dawn: select_with(rise_index, pick(|s| s.additional.nautical_dawn), offset, local_day),
        astronomical_dawn: select_with(rise_index, pick(|s| s.additional.astronomical_dawn), offset, local_day),
        bottom_disc_rise: select_with(rise_index, pick(|s| s.additional.bottom_disc_rise), offset, local_day),
        civil_dusk: select_with(set_index, pick(|s| s.additional.civil_dusk), offset, local_day),
        nautical_dusk: select_with(set_index, pick(|s| s.additional.nautical_dusk), offset, local_day),
        astronomical_dusk: select_with(set_index, pick(|s| s.additional.astronomical_dusk), offset, local_day),
        bottom_disc_set: select_with(set_index, pick(|s| s.additional.bottom_disc_set), offset, local_day),
        solar_noon: select(pick(|s| s.additional.solar_noon), offset, local_day),
    };

    let condition = reconcile_condition(rise, set, || {
        mostly_above(local_midnight, VISUAL_HORIZON, |t| sun_position(snapshot.location, t).altitude)
    });

    SunState {
        rise,
        set,
        condition,
        additional,
        ..suns[DAY]
    }
}

fn reconcile_moon(
    moons: [MoonState; 3],
    offset: FixedOffset,
    local_day: NaiveDate,
    local_midnight: DateTime<Utc>,
    snapshot: &CelestialSnapshot,
) -> MoonState {
    let rise = select([moons[0].rise, moons[1].rise, moons[2].rise], offset, local_day);
    let set = select([moons[0].set, moons[1].set, moons[2].set], offset, local_day);
    let condition = reconcile_condition(rise, set, || {
        mostly_above(local_midnight, MOON_HORIZON, |t| moon_position(snapshot.location, t).altitude)
    });
    MoonState {
        rise,
        set,
        condition,
        ..moons[DAY]
    }
}

/// Merges snapshots for UTC days `local_day - 1`, `local_day` and
/// `local_day + 1` into one snapshot for `local_day` under `offset`.
///
/// Instant-based values (positions, illumination, perigee/apogee, eclipses
/// and names) come from the middle snapshot.
pub fn reconcile(candidates: [CelestialSnapshot; 3], offset: FixedOffset, local_day: NaiveDate) -> CelestialSnapshot {
    let day = candidates[DAY];
    let local_midnight = start_of_local_day(local_day, offset);

    let sun = match (candidates[0].sun, day.sun, candidates[2].sun) {
        (Some(before), Some(current), Some(after)) => {
            Some(reconcile_sun([before, current, after], offset, local_day, local_midnight, &day))
        }
        _ => day.sun,
    };
    let moon = match (candidates[0].moon, day.moon, candidates[2].moon) {
        (Some(before), Some(current), Some(after)) => {
            Some(reconcile_moon([before, current, after], offset, local_day, local_midnight, &day))
        }
        _ => day.moon,
    };

    CelestialSnapshot {
        offset,
        sun,
        moon,
        ..day
    }
}
