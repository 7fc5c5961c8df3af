//! Sun, moon and calendar values for fixed observers and dates.
#![allow(clippy::unwrap_used, clippy::panic)]

extern crate std;
use std::string::ToString;
use std::vec::Vec;

use chrono::{Datelike, FixedOffset, NaiveDate, Offset, TimeDelta, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use super::{assert_seconds_apart, date, location, utc};
use crate::time::start_of_day;
use crate::{
    calculate_celestial, find_crossing, full_moon_name, is_full_moon_day, lunar_cycle, moon_crossing,
    moon_illumination, moon_position, nearest_eclipses, solar_noon, sun_position, CelestialOptions, CelestialStatus,
    EagerLoad, EclipseBody, EclipseEvent, EclipseKind, FullMoonName, MoonPhaseName, ObserverLocation,
    StaticEclipseTable, ZodiacSign, MOON_HORIZON, VISUAL_HORIZON,
};

/// Two minutes: the low-precision formulas agree with almanacs to about this.
const EVENT_TOLERANCE_S: i64 = 120;

fn trenton() -> ObserverLocation {
    location(40.0352, -74.5844)
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Ten-minute samples of the sun's altitude above `threshold` over the UTC day.
fn sun_samples_above(observer: ObserverLocation, day: NaiveDate, threshold: f64) -> usize {
    let midnight = start_of_day(day);
    (0..144)
        .map(|i| midnight + TimeDelta::minutes(10 * i))
        .filter(|t| sun_position(observer, *t).altitude > threshold)
        .count()
}

// ============================================================================
// Sun and moon events
// ============================================================================

// Expected times are this low-precision model's own output for the date,
// reproduced by an independent evaluation of the same formulas. Sun times
// sit within a minute of published almanacs; the moon series alone is
// coarser, so moon times run a few minutes from them.
#[test]
fn trenton_spring_events() {
    let instant = utc(2019, 3, 19, 12, 0, 0);
    let snapshot = calculate_celestial(trenton(), instant, &CelestialOptions::default());

    let sun = snapshot.sun.unwrap();
    assert_eq!(sun.condition, CelestialStatus::RiseAndSet);
    assert_seconds_apart(sun.rise.unwrap(), utc(2019, 3, 19, 11, 5, 10), EVENT_TOLERANCE_S, "sunrise");
    assert_seconds_apart(sun.set.unwrap(), utc(2019, 3, 19, 23, 9, 48), EVENT_TOLERANCE_S, "sunset");
    assert!((sun.altitude - 9.68).abs() < 0.2, "sun altitude {}", sun.altitude);
    assert!((sun.azimuth - 99.16).abs() < 0.2, "sun azimuth {}", sun.azimuth);
    assert!(snapshot.is_sun_up());

    let moon = snapshot.moon.unwrap();
    assert_eq!(moon.condition, CelestialStatus::RiseAndSet);
    assert_seconds_apart(moon.rise.unwrap(), utc(2019, 3, 19, 21, 48, 57), EVENT_TOLERANCE_S, "moonrise");
    assert_seconds_apart(moon.set.unwrap(), utc(2019, 3, 19, 10, 34, 39), EVENT_TOLERANCE_S, "moonset");
    assert!(!snapshot.is_moon_up());
    // A day and a half before full: inside the Full Moon bucket, still waxing.
    assert!(moon.illumination.fraction > 0.9);
    assert!(moon.illumination.phase < 0.5);
    assert_eq!(moon.illumination.phase_name, MoonPhaseName::FullMoon);

    let extensions = snapshot.extensions.unwrap();
    assert_eq!(extensions.moon_sign, ZodiacSign::Virgo);
    assert_eq!(extensions.moon_name, None);
}

#[test]
fn twilight_bands_are_ordered() {
    let snapshot = calculate_celestial(trenton(), utc(2019, 3, 19, 12, 0, 0), &CelestialOptions::default());
    let sun = snapshot.sun.unwrap();
    let extra = sun.additional;

    let morning = [
        extra.astronomical_dawn.unwrap(),
        extra.nautical_dawn.unwrap(),
        extra.civil_dawn.unwrap(),
        sun.rise.unwrap(),
        extra.bottom_disc_rise.unwrap(),
        extra.solar_noon.unwrap(),
    ];
    assert!(morning.windows(2).all(|pair| pair[0] < pair[1]), "{morning:?}");

    let evening = [
        extra.solar_noon.unwrap(),
        extra.bottom_disc_set.unwrap(),
        sun.set.unwrap(),
        extra.civil_dusk.unwrap(),
        extra.nautical_dusk.unwrap(),
        extra.astronomical_dusk.unwrap(),
    ];
    assert!(evening.windows(2).all(|pair| pair[0] < pair[1]), "{evening:?}");

    // Civil twilight at 40°N in March lasts roughly half an hour.
    let civil = (sun.rise.unwrap() - extra.civil_dawn.unwrap()).num_minutes();
    assert!((20..=35).contains(&civil), "civil twilight {civil} min");
}

#[test]
fn solar_noon_is_the_highest_point() {
    let noon = solar_noon(trenton(), date(2019, 3, 19)).unwrap();
    let peak = sun_position(trenton(), noon).altitude;
    for minutes in [-30, 30] {
        let other = noon + TimeDelta::minutes(minutes);
        assert!(sun_position(trenton(), other).altitude < peak);
    }
    // 74.58°W puts local noon near 17:00 UTC, shifted by the equation of time.
    assert_eq!(noon.hour(), 17);
}

#[test]
fn extreme_latitude_polar_night() {
    let tromso = location(69.6492, 18.9553);
    let crossing = find_crossing(tromso, date(2024, 12, 21), VISUAL_HORIZON);
    assert_eq!(crossing.status, CelestialStatus::DownAllDay);
    assert!(crossing.rise.is_none() && crossing.set.is_none());
}

#[test]
fn extreme_latitude_south_pole_summer() {
    let pole = location(-90.0, 0.0);
    let crossing = find_crossing(pole, date(2024, 12, 21), VISUAL_HORIZON);
    assert_eq!(crossing.status, CelestialStatus::UpAllDay);
}

#[test]
fn polar_circle_all_day_follows_the_day_not_midnight() {
    // Near the polar circles the sun can dip below the horizon only around
    // midnight, or graze it without a solvable crossing.
    let cases = [
        (66.0, date(2024, 6, 6), 8),
        (66.5, date(2024, 6, 6), 8),
        (75.0, date(2024, 4, 28), 1),
        (75.0, date(2024, 8, 14), 1),
        (80.0, date(2024, 4, 13), 1),
        (-75.0, date(2024, 10, 31), 1),
    ];
    for (latitude, first, days) in cases {
        let observer = location(latitude, 0.0);
        for day in first.iter_days().take(days) {
            let crossing = find_crossing(observer, day, VISUAL_HORIZON);
            if !crossing.status.is_all_day() {
                continue;
            }
            let above = sun_samples_above(observer, day, VISUAL_HORIZON);
            assert_eq!(
                crossing.status == CelestialStatus::UpAllDay,
                above * 2 > 144,
                "{latitude} {day}: {crossing:?} with {above}/144 samples above"
            );
        }
    }

    // Below the horizon at UTC midnight, above it for the rest of the day.
    let crossing = find_crossing(location(66.0, 0.0), date(2024, 6, 12), VISUAL_HORIZON);
    assert_eq!(crossing.status, CelestialStatus::UpAllDay);
    let crossing = find_crossing(location(80.0, 0.0), date(2024, 4, 13), VISUAL_HORIZON);
    assert_eq!(crossing.status, CelestialStatus::UpAllDay);
}

#[test]
fn moon_is_up_exactly_between_rise_and_set() {
    let moon_only = CelestialOptions {
        include: EagerLoad {
            moon: true,
            ..EagerLoad::NONE
        },
        ..Default::default()
    };
    let rise = moon_crossing(trenton(), date(2019, 3, 19)).rise.unwrap();

    let before = calculate_celestial(trenton(), rise - TimeDelta::minutes(3), &moon_only);
    assert!(!before.is_moon_up(), "{:?}", before.moon);
    let after = calculate_celestial(trenton(), rise + TimeDelta::minutes(3), &moon_only);
    assert!(after.is_moon_up(), "{:?}", after.moon);

    // Read as up by the geocentric altitude, but the observer's moon is still below.
    let early = moon_position(trenton(), utc(2019, 3, 19, 21, 44, 45));
    assert!(early.altitude < MOON_HORIZON, "altitude {}", early.altitude);
}

#[test]
fn moon_crossing_stays_on_its_day() {
    for day in date(2019, 3, 1).iter_days().take(31) {
        let crossing = moon_crossing(trenton(), day);
        for event in [crossing.rise, crossing.set].into_iter().flatten() {
            assert_eq!(event.date_naive(), day);
        }
        let consistent = match (crossing.rise, crossing.set) {
            (Some(_), Some(_)) => crossing.status == CelestialStatus::RiseAndSet,
            (Some(_), None) => crossing.status == CelestialStatus::NoSet,
            (None, Some(_)) => crossing.status == CelestialStatus::NoRise,
            (None, None) => crossing.status.is_all_day(),
        };
        assert!(consistent, "{day}: {crossing:?}");
    }
}

// ============================================================================
// Perigee and apogee
// ============================================================================

#[test]
fn perigee_and_apogee_around_march_2019() {
    let cycle = lunar_cycle(utc(2019, 3, 19, 0, 0, 0));

    let next_perigee = cycle.perigee.next.unwrap();
    assert_seconds_apart(next_perigee.instant, utc(2019, 3, 19, 19, 47, 49), 900, "next perigee");
    assert!((next_perigee.distance_km - 359_386.0).abs() < 30.0, "{}", next_perigee.distance_km);

    let last_perigee = cycle.perigee.last.unwrap();
    assert_seconds_apart(last_perigee.instant, utc(2019, 2, 19, 9, 0, 48), 900, "last perigee");
    assert!((last_perigee.distance_km - 356_758.0).abs() < 30.0, "{}", last_perigee.distance_km);

    let last_apogee = cycle.apogee.last.unwrap();
    assert_seconds_apart(last_apogee.instant, utc(2019, 3, 4, 11, 17, 38), 900, "last apogee");
    assert!((last_apogee.distance_km - 406_392.0).abs() < 30.0);

    let next_apogee = cycle.apogee.next.unwrap();
    assert_seconds_apart(next_apogee.instant, utc(2019, 4, 1, 0, 16, 16), 900, "next apogee");
    assert!((next_apogee.distance_km - 405_570.0).abs() < 30.0);
}

proptest! {
    #[test]
    fn lunar_extrema_bracket_the_query(days in 0i64..=20_000) {
        let instant = utc(1990, 1, 1, 0, 0, 0) + TimeDelta::days(days);
        let cycle = lunar_cycle(instant);
        for pair in [cycle.perigee, cycle.apogee] {
            let last = pair.last.unwrap();
            let next = pair.next.unwrap();
            prop_assert!(last.instant <= instant && instant < next.instant);
            let gap = (next.instant - last.instant).num_hours();
            // Anomalistic month varies between about 24.6 and 28.6 days.
            prop_assert!((570..=700).contains(&gap), "gap {} h", gap);
        }
        let perigee = cycle.perigee.next.unwrap().distance_km;
        let apogee = cycle.apogee.next.unwrap().distance_km;
        prop_assert!((355_000.0..371_000.0).contains(&perigee), "perigee {}", perigee);
        prop_assert!((403_000.0..407_000.0).contains(&apogee), "apogee {}", apogee);
    }

    #[test]
    fn illumination_stays_in_bounds(seconds in 0i64..=2_000_000_000) {
        let illumination = moon_illumination(Utc.timestamp_opt(seconds, 0).unwrap());
        prop_assert!((0.0..=1.0).contains(&illumination.fraction));
        prop_assert!((0.0..1.0).contains(&illumination.phase));
        prop_assert!((0.0..=180.0 + 1e-9).contains(&illumination.phase_angle));
        prop_assert_eq!(
            illumination.phase_name,
            MoonPhaseName::from_cycle_degrees(illumination.phase * 360.0)
        );
    }
}

#[test]
fn phase_buckets_are_centred_on_quarters() {
    assert_eq!(MoonPhaseName::from_cycle_degrees(0.0), MoonPhaseName::NewMoon);
    assert_eq!(MoonPhaseName::from_cycle_degrees(22.4), MoonPhaseName::NewMoon);
    assert_eq!(MoonPhaseName::from_cycle_degrees(22.5), MoonPhaseName::WaxingCrescent);
    assert_eq!(MoonPhaseName::from_cycle_degrees(90.0), MoonPhaseName::FirstQuarter);
    assert_eq!(MoonPhaseName::from_cycle_degrees(180.0), MoonPhaseName::FullMoon);
    assert_eq!(MoonPhaseName::from_cycle_degrees(270.0), MoonPhaseName::LastQuarter);
    assert_eq!(MoonPhaseName::from_cycle_degrees(337.5), MoonPhaseName::NewMoon);
    assert_eq!(MoonPhaseName::from_cycle_degrees(-10.0), MoonPhaseName::NewMoon);
    assert_eq!(MoonPhaseName::WaningGibbous.to_string(), "Waning Gibbous");
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn full_moon_days_take_month_names() {
    let utc = utc_offset();
    assert_eq!(full_moon_name(date(2019, 2, 19), utc), Some(FullMoonName::Snow));
    assert_eq!(full_moon_name(date(2019, 3, 20), utc), Some(FullMoonName::Worm));
    assert_eq!(full_moon_name(date(2019, 4, 19), utc), Some(FullMoonName::Pink));
    assert_eq!(full_moon_name(date(2024, 3, 25), utc), Some(FullMoonName::Worm));
    assert_eq!(full_moon_name(date(2025, 3, 14), utc), Some(FullMoonName::Worm));
    assert!(!is_full_moon_day(date(2019, 3, 10), utc));
}

#[test]
fn second_full_moon_in_a_month_is_blue() {
    for day in [date(2018, 1, 31), date(2018, 3, 31), date(2020, 10, 31), date(2023, 8, 30)] {
        assert_eq!(full_moon_name(day, utc_offset()), Some(FullMoonName::Blue), "{day}");
    }
}

#[test]
fn full_moon_names_follow_local_months() {
    // The 2020-10-31 full moon falls at about 12:20 UTC, already 1 November at UTC+13.
    let tonga = FixedOffset::east_opt(13 * 3600).unwrap();
    assert_eq!(full_moon_name(date(2020, 10, 31), utc_offset()), Some(FullMoonName::Blue));
    assert_eq!(full_moon_name(date(2020, 10, 31), tonga), None);
    assert_eq!(full_moon_name(date(2020, 10, 2), tonga), Some(FullMoonName::Hunters));
    assert_eq!(full_moon_name(date(2020, 11, 1), tonga), Some(FullMoonName::Beaver));
    assert_eq!(full_moon_name(date(2020, 11, 30), tonga), Some(FullMoonName::Blue));

    let options = CelestialOptions {
        offset: tonga,
        ..Default::default()
    };
    let snapshot = calculate_celestial(trenton(), utc(2020, 10, 31, 14, 0, 0), &options);
    assert_eq!(snapshot.extensions.unwrap().moon_name, Some(FullMoonName::Beaver));
}

#[test]
fn one_full_moon_per_lunation() {
    let full_days: Vec<_> = date(2019, 1, 1)
        .iter_days()
        .take(365)
        .filter(|day| is_full_moon_day(*day, utc_offset()))
        .collect();
    assert_eq!(full_days.len(), 12, "{full_days:?}");
    for pair in full_days.windows(2) {
        let gap = (pair[1] - pair[0]).num_days();
        assert!((28..=31).contains(&gap), "{pair:?}");
    }
}

#[test]
fn zodiac_signs() {
    assert_eq!(ZodiacSign::from_date(date(2019, 3, 19)), ZodiacSign::Pisces);
    assert_eq!(ZodiacSign::from_date(date(2019, 3, 21)), ZodiacSign::Aries);
    assert_eq!(ZodiacSign::from_date(date(2019, 1, 5)), ZodiacSign::Capricorn);
    assert_eq!(ZodiacSign::from_date(date(2019, 12, 25)), ZodiacSign::Capricorn);
    assert_eq!(ZodiacSign::from_ecliptic_longitude(0.0), ZodiacSign::Aries);
    assert_eq!(ZodiacSign::from_ecliptic_longitude(359.9), ZodiacSign::Pisces);
    assert_eq!(ZodiacSign::from_ecliptic_longitude(-15.0), ZodiacSign::Pisces);
    assert_eq!(ZodiacSign::Sagittarius.to_string(), "Sagittarius");
}

#[test]
fn snapshot_extensions() {
    let snapshot = calculate_celestial(trenton(), utc(2019, 3, 20, 12, 0, 0), &CelestialOptions::default());
    let extensions = snapshot.extensions.unwrap();
    assert_eq!(extensions.zodiac_sign, ZodiacSign::Pisces);
    assert_eq!(extensions.moon_name, Some(FullMoonName::Worm));
}

#[test]
fn eager_load_none_leaves_groups_empty() {
    let options = CelestialOptions {
        include: EagerLoad::NONE,
        ..Default::default()
    };
    let snapshot = calculate_celestial(trenton(), utc(2019, 3, 19, 12, 0, 0), &options);
    assert!(snapshot.sun.is_none() && snapshot.moon.is_none());
    assert!(snapshot.lunar_cycle.is_none() && snapshot.extensions.is_none());
    assert!(snapshot.solar_eclipses.is_none() && snapshot.lunar_eclipses.is_none());
    assert!(!snapshot.is_sun_up());
}

// ============================================================================
// Eclipses
// ============================================================================

fn event(year: i32, month: u32, day: u32, kind: EclipseKind, magnitude: f64) -> EclipseEvent {
    EclipseEvent {
        date: date(year, month, day),
        kind,
        magnitude,
    }
}

fn solar_rows() -> [EclipseEvent; 5] {
    [
        event(1999, 8, 11, EclipseKind::Total, 1.0286),
        event(2017, 8, 21, EclipseKind::Total, 1.0306),
        event(2023, 10, 14, EclipseKind::Annular, 0.9520),
        event(2024, 4, 8, EclipseKind::Total, 1.0566),
        event(2123, 1, 1, EclipseKind::Partial, 0.5),
    ]
}

fn lunar_rows() -> [EclipseEvent; 2] {
    [
        event(2019, 1, 21, EclipseKind::Total, 1.1953),
        event(2020, 1, 10, EclipseKind::Penumbral, 0.8956),
    ]
}

#[test]
fn nearest_eclipses_within_the_century() {
    let (solar, lunar) = (solar_rows(), lunar_rows());
    let table = StaticEclipseTable::new(&solar, &lunar);
    let found = nearest_eclipses(&table, EclipseBody::Solar, date(2019, 3, 19));
    assert_eq!(found.last.unwrap().date, date(2017, 8, 21));
    assert_eq!(found.next.unwrap().date, date(2023, 10, 14));
    assert_eq!(found.next.unwrap().kind, EclipseKind::Annular);
    assert_eq!(found.next.unwrap().magnitude, 0.9520);

    let found = nearest_eclipses(&table, EclipseBody::Lunar, date(2019, 3, 19));
    assert_eq!(found.last.unwrap().date, date(2019, 1, 21));
    assert_eq!(found.next.unwrap().kind, EclipseKind::Penumbral);
    assert_eq!(found.next.unwrap().magnitude, 0.8956);
}

#[test]
fn eclipse_on_the_query_date_is_next() {
    let (solar, lunar) = (solar_rows(), lunar_rows());
    let table = StaticEclipseTable::new(&solar, &lunar);
    let found = nearest_eclipses(&table, EclipseBody::Solar, date(2024, 4, 8));
    assert_eq!(found.next.unwrap().date, date(2024, 4, 8));
    assert_eq!(found.last.unwrap().date, date(2023, 10, 14));
}

#[test]
fn eclipse_lookup_crosses_century_boundaries() {
    let (solar, lunar) = (solar_rows(), lunar_rows());
    let table = StaticEclipseTable::new(&solar, &lunar);
    let early = nearest_eclipses(&table, EclipseBody::Solar, date(2000, 6, 1));
    assert_eq!(early.last.unwrap().date.year(), 1999);

    let late = nearest_eclipses(&table, EclipseBody::Solar, date(2099, 6, 1));
    assert_eq!(late.last.unwrap().date, date(2024, 4, 8));
    assert_eq!(late.next.unwrap().date.year(), 2123);

    // Only adjacent centuries are consulted.
    let found = nearest_eclipses(&table, EclipseBody::Lunar, date(2250, 1, 1));
    assert!(found.last.is_none() && found.next.is_none());
}

#[test]
fn eclipse_source_feeds_the_snapshot() {
    let (solar, lunar) = (solar_rows(), lunar_rows());
    let table = StaticEclipseTable::new(&solar, &lunar);
    let options = CelestialOptions {
        eclipses: Some(&table),
        ..Default::default()
    };
    let snapshot = calculate_celestial(trenton(), utc(2019, 3, 19, 12, 0, 0), &options);
    assert_eq!(snapshot.solar_eclipses.unwrap().next.unwrap().date, date(2023, 10, 14));
    assert_eq!(snapshot.lunar_eclipses.unwrap().last.unwrap().date, date(2019, 1, 21));
    assert_eq!(snapshot.lunar_eclipses.unwrap().last.unwrap().magnitude, 1.1953);

    let without = calculate_celestial(trenton(), utc(2019, 3, 19, 12, 0, 0), &CelestialOptions::default());
    assert!(without.solar_eclipses.is_none());
}
