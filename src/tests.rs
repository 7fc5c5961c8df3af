#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]
extern crate std;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use crate::{
    try_from_julian_day, Axis, Cartesian, CoordinateError, Dms, Ecef, Ellipsoid, GeoConfig, GridSystem,
    MgrsCoordinate, ObserverLocation, UtmCoordinate, WebMercator,
};

mod almanac_tests;

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn location(latitude: f64, longitude: f64) -> ObserverLocation {
    ObserverLocation::new(latitude, longitude).unwrap()
}

pub(crate) fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second).unwrap()
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Great-circle distance on a 6371 km sphere, metres.
pub(crate) fn ground_distance_m(a: ObserverLocation, b: ObserverLocation) -> f64 {
    let (lat1, lat2) = (a.latitude().to_radians(), b.latitude().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * 6_371_000.0 * h.sqrt().min(1.0).asin()
}

pub(crate) fn assert_seconds_apart(actual: DateTime<Utc>, expected: DateTime<Utc>, tolerance: i64, what: &str) {
    let diff = (actual - expected).num_seconds().abs();
    assert!(
        diff <= tolerance,
        "{what}: got {actual}, expected {expected} (off by {diff} s, tolerance {tolerance} s)"
    );
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #[test]
    fn utm_round_trip_within_precision(
        latitude in -79.9_f64..=83.9,
        longitude in -179.9_f64..=179.9,
    ) {
        let original = location(latitude, longitude);
        let utm = UtmCoordinate::from_location(original, &GeoConfig::DEFAULT);
        prop_assert_eq!(utm.system(), GridSystem::Utm);

        let back = utm.to_location();
        prop_assert!((back.latitude() - latitude).abs() < 1e-5, "latitude {} -> {}", latitude, back.latitude());
        prop_assert!((back.longitude() - longitude).abs() < 1e-5, "longitude {} -> {}", longitude, back.longitude());
    }

    #[test]
    fn mgrs_round_trip_within_one_metre_square(
        latitude in -79.9_f64..=83.9,
        longitude in -179.9_f64..=179.9,
    ) {
        let original = location(latitude, longitude);
        let mgrs = MgrsCoordinate::from_location(original, &GeoConfig::DEFAULT);
        let back = mgrs.to_location();
        let distance = ground_distance_m(original, back);
        prop_assert!(distance < 2.0, "{} decoded {} m away", mgrs, distance);
    }

    #[test]
    fn polar_mgrs_round_trip(
        latitude in prop_oneof![84.1_f64..=89.9, -89.9_f64..=-80.1],
        longitude in -179.9_f64..=179.9,
    ) {
        let original = location(latitude, longitude);
        let mgrs = MgrsCoordinate::from_location(original, &GeoConfig::DEFAULT);
        prop_assert_eq!(mgrs.zone_number(), 0);
        let distance = ground_distance_m(original, mgrs.to_location());
        prop_assert!(distance < 2.0, "{} decoded {} m away", mgrs, distance);
    }

    #[test]
    fn polar_latitudes_route_to_ups(
        latitude in prop_oneof![84.0001_f64..=90.0, -90.0_f64..=-80.0001],
        longitude in -180.0_f64..=180.0,
    ) {
        let utm = UtmCoordinate::from_location(location(latitude, longitude), &GeoConfig::DEFAULT);
        prop_assert_eq!(utm.system(), GridSystem::Ups);
        prop_assert_eq!(utm.zone_number(), 0);
        let expected = match (latitude > 0.0, longitude < 0.0) {
            (true, true) => 'Y',
            (true, false) => 'Z',
            (false, true) => 'A',
            (false, false) => 'B',
        };
        prop_assert_eq!(utm.zone_letter(), expected);
    }

    #[test]
    fn ecef_round_trip(
        latitude in -89.9_f64..=89.9,
        longitude in -179.9_f64..=179.9,
        height in -500.0_f64..=10_000.0,
    ) {
        let ecef = Ecef::from_geodetic(location(latitude, longitude), height, &GeoConfig::DEFAULT);
        let (back, back_height) = ecef.to_geodetic(&GeoConfig::DEFAULT);
        prop_assert!((back.latitude() - latitude).abs() < 1e-9);
        prop_assert!((back.longitude() - longitude).abs() < 1e-9);
        prop_assert!((back_height - height).abs() < 1e-3, "height {} -> {}", height, back_height);
    }

    #[test]
    fn cartesian_round_trip(
        latitude in -89.0_f64..=89.0,
        longitude in -179.9_f64..=179.9,
    ) {
        let vector = Cartesian::from_location(location(latitude, longitude));
        let norm = (vector.x * vector.x + vector.y * vector.y + vector.z * vector.z).sqrt();
        prop_assert!((norm - 1.0).abs() < 1e-12);
        let back = vector.to_location();
        prop_assert!((back.latitude() - latitude).abs() < 1e-9);
        prop_assert!((back.longitude() - longitude).abs() < 1e-9);
    }

    #[test]
    fn web_mercator_round_trip(
        latitude in -85.0_f64..=85.0,
        longitude in -180.0_f64..=180.0,
    ) {
        let projected = WebMercator::from_location(location(latitude, longitude)).unwrap();
        let back = projected.to_location();
        prop_assert!((back.latitude() - latitude).abs() < 1e-9);
        prop_assert!((back.longitude() - longitude).abs() < 1e-9);
    }

    #[test]
    fn dms_round_trip(value in -180.0_f64..=180.0) {
        let dms = Dms::from_decimal(value, Axis::Longitude).unwrap();
        prop_assert!(dms.minutes() < 60);
        prop_assert!((0.0..60.0).contains(&dms.seconds()));
        prop_assert!((dms.to_decimal() - value).abs() < 1e-9, "{} -> {}", value, dms);
    }
}

// ============================================================================
// Reference values
// ============================================================================

#[test]
fn statue_of_liberty_utm() {
    let utm = UtmCoordinate::from_location(location(40.6892, -74.0445), &GeoConfig::DEFAULT);
    assert_eq!(utm.zone_number(), 18);
    assert_eq!(utm.zone_letter(), 'T');
    assert!((utm.easting() - 580_735.87).abs() < 0.01, "easting {}", utm.easting());
    assert!((utm.northing() - 4_504_695.17).abs() < 0.01, "northing {}", utm.northing());
    assert!(utm.within_bounds());
}

#[test]
fn null_island_utm() {
    let utm = UtmCoordinate::from_location(location(0.0, 0.0), &GeoConfig::DEFAULT);
    assert_eq!((utm.zone_number(), utm.zone_letter()), (31, 'N'));
    assert!((utm.easting() - 166_021.443).abs() < 0.001, "easting {}", utm.easting());
    assert_eq!(utm.northing(), 0.0);
}

#[test]
fn mgrs_decodes_reference_square() {
    let mgrs = MgrsCoordinate::new(16, 'U', "EA", 872.0, 5009.0, &GeoConfig::DEFAULT).unwrap();
    let utm = mgrs.to_utm();
    assert_eq!(utm.easting(), 500_872.0);
    assert_eq!(utm.northing(), 5_505_009.0);

    let decoded = mgrs.to_location();
    assert!((decoded.latitude() - 49.6976).abs() < 1e-4, "latitude {}", decoded.latitude());
    assert!((decoded.longitude() + 86.9879).abs() < 1e-4, "longitude {}", decoded.longitude());
}

#[test]
fn ups_north_of_84() {
    let utm = UtmCoordinate::from_location(location(85.0, 0.0), &GeoConfig::DEFAULT);
    assert_eq!(utm.system(), GridSystem::Ups);
    assert_eq!(utm.zone_letter(), 'Z');
    assert!((utm.easting() - 2_000_000.0).abs() < 1e-6);
    assert!((utm.northing() - 1_444_542.6).abs() < 0.1, "northing {}", utm.northing());

    let mgrs = MgrsCoordinate::from_utm(&utm);
    assert_eq!(std::format!("{mgrs}"), "Z AB 00000 44542");
    assert!(ground_distance_m(mgrs.to_location(), location(85.0, 0.0)) < 1.5);
}

#[test]
fn ups_pole_decodes_without_longitude() {
    let pole = UtmCoordinate::new(0, 'Z', 2_000_000.0, 2_000_000.0, &GeoConfig::DEFAULT).unwrap();
    let decoded = pole.to_location();
    assert!((decoded.latitude() - 90.0).abs() < 1e-9);
    assert_eq!(decoded.longitude(), 0.0);
}

#[test]
fn norway_and_svalbard_zone_exceptions() {
    let bergen = UtmCoordinate::from_location(location(60.3913, 5.3221), &GeoConfig::DEFAULT);
    assert_eq!((bergen.zone_number(), bergen.zone_letter()), (32, 'V'));

    let longyearbyen = UtmCoordinate::from_location(location(78.2232, 15.6267), &GeoConfig::DEFAULT);
    assert_eq!((longyearbyen.zone_number(), longyearbyen.zone_letter()), (33, 'X'));

    // West of 3°E at the same latitude stays in zone 31.
    let west = UtmCoordinate::from_location(location(60.0, 2.5), &GeoConfig::DEFAULT);
    assert_eq!(west.zone_number(), 31);
}

#[test]
fn forced_zone_projects_off_centre() {
    let liberty = location(40.6892, -74.0445);
    let natural = UtmCoordinate::from_location(liberty, &GeoConfig::DEFAULT);
    let forced = UtmCoordinate::from_location_in_zone(liberty, 17, &GeoConfig::DEFAULT).unwrap();
    assert_eq!(forced.zone_number(), 17);
    assert!(forced.easting() > natural.easting());

    let back = forced.to_location();
    assert!((back.latitude() - liberty.latitude()).abs() < 1e-5);
    assert!((back.longitude() - liberty.longitude()).abs() < 1e-5);
}

#[test]
fn other_ellipsoid_shifts_the_grid() {
    let liberty = location(40.6892, -74.0445);
    let clarke = GeoConfig::with_ellipsoid(Ellipsoid::CLARKE_1866);
    let wgs84 = UtmCoordinate::from_location(liberty, &GeoConfig::DEFAULT);
    let nad27 = UtmCoordinate::from_location(liberty, &clarke);
    assert_eq!(nad27.ellipsoid(), Ellipsoid::CLARKE_1866);
    assert!((wgs84.northing() - nad27.northing()).abs() > 1.0);

    let back = nad27.to_location();
    assert!((back.latitude() - liberty.latitude()).abs() < 1e-5);
}

#[test]
fn out_of_range_grid_value_warns_but_converts() {
    let utm = UtmCoordinate::new(18, 'T', 100_000.0, 4_500_000.0, &GeoConfig::DEFAULT).unwrap();
    assert!(!utm.within_bounds());
    let decoded = utm.to_location();
    assert!(decoded.latitude().is_finite() && decoded.longitude().is_finite());
}

#[test]
fn web_mercator_extent() {
    let corner = WebMercator::from_location(location(85.051_128_78, 180.0)).unwrap();
    assert!((corner.easting() - 20_037_508.342_789_244).abs() < 1e-6);
    assert!((corner.northing() - 20_037_508.342_789_244).abs() < 1.0, "northing {}", corner.northing());
}

#[test]
fn dms_formats_with_hemisphere() {
    let dms = Dms::from_decimal(40.6892, Axis::Latitude).unwrap();
    assert_eq!((dms.degrees(), dms.minutes(), dms.hemisphere()), (40, 41, 'N'));
    assert!((dms.seconds() - 21.12).abs() < 1e-6);
    assert_eq!(std::format!("{dms}"), "N40° 41' 21.120\"");

    let west = Dms::new(74, 2, 40.2, 'w').unwrap();
    assert_eq!(west.hemisphere(), 'W');
    assert!((west.to_decimal() + 74.0445).abs() < 1e-9);
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn error_case_latitude_out_of_range() {
    assert!(matches!(
        ObserverLocation::new(90.1, 0.0),
        Err(CoordinateError::LatitudeOutOfRange)
    ));
    assert!(matches!(
        ObserverLocation::new(f64::NAN, 0.0),
        Err(CoordinateError::LatitudeOutOfRange)
    ));
    assert!(ObserverLocation::new(-90.0, 0.0).is_ok());
}

#[test]
fn error_case_longitude_out_of_range() {
    assert!(matches!(
        ObserverLocation::new(0.0, -180.5),
        Err(CoordinateError::LongitudeOutOfRange)
    ));
    assert!(ObserverLocation::new(0.0, 180.0).is_ok());
}

#[test]
fn error_case_invalid_utm_parts() {
    let config = GeoConfig::DEFAULT;
    assert!(matches!(
        UtmCoordinate::new(61, 'T', 500_000.0, 0.0, &config),
        Err(CoordinateError::InvalidZoneNumber)
    ));
    assert!(matches!(
        UtmCoordinate::new(18, 'I', 500_000.0, 0.0, &config),
        Err(CoordinateError::InvalidZoneLetter)
    ));
    assert!(matches!(
        UtmCoordinate::new(0, 'T', 2_000_000.0, 2_000_000.0, &config),
        Err(CoordinateError::InvalidZoneLetter)
    ));
    assert!(matches!(
        UtmCoordinate::new(18, 'T', f64::NAN, 0.0, &config),
        Err(CoordinateError::GridValueOutOfRange)
    ));
    assert!(matches!(
        UtmCoordinate::from_location_in_zone(location(85.0, 0.0), 31, &config),
        Err(CoordinateError::LatitudeOutOfRange)
    ));
}

#[test]
fn error_case_invalid_mgrs_parts() {
    let config = GeoConfig::DEFAULT;
    assert!(matches!(
        MgrsCoordinate::new(16, 'U', "EAX", 0.0, 0.0, &config),
        Err(CoordinateError::InvalidDigraph)
    ));
    // Zone 16 uses columns A-H.
    assert!(matches!(
        MgrsCoordinate::new(16, 'U', "JA", 0.0, 0.0, &config),
        Err(CoordinateError::InvalidDigraph)
    ));
    assert!(matches!(
        MgrsCoordinate::new(16, 'U', "EA", 100_000.0, 0.0, &config),
        Err(CoordinateError::GridValueOutOfRange)
    ));
    assert!(matches!(
        MgrsCoordinate::new(16, 'O', "EA", 0.0, 0.0, &config),
        Err(CoordinateError::InvalidZoneLetter)
    ));
    assert!(matches!(
        MgrsCoordinate::new(61, 'U', "EA", 0.0, 0.0, &config),
        Err(CoordinateError::InvalidZoneNumber)
    ));
}

#[test]
fn error_case_web_mercator_out_of_range() {
    assert!(matches!(
        WebMercator::new(20_037_509.0, 0.0),
        Err(CoordinateError::WebMercatorOutOfRange)
    ));
    assert!(matches!(
        WebMercator::from_location(location(-85.1, 0.0)),
        Err(CoordinateError::WebMercatorOutOfRange)
    ));
    assert!(WebMercator::new(-20_037_508.0, 20_037_508.0).is_ok());
}

#[test]
fn error_case_invalid_dms() {
    assert!(matches!(Dms::new(10, 60, 0.0, 'N'), Err(CoordinateError::InvalidDms)));
    assert!(matches!(Dms::new(10, 0, 60.0, 'N'), Err(CoordinateError::InvalidDms)));
    assert!(matches!(Dms::new(90, 0, 0.1, 'S'), Err(CoordinateError::InvalidDms)));
    assert!(matches!(Dms::new(10, 0, 0.0, 'Q'), Err(CoordinateError::InvalidDms)));
    assert!(matches!(
        Dms::from_decimal(120.0, Axis::Latitude),
        Err(CoordinateError::InvalidDms)
    ));
    assert!(Dms::new(180, 0, 0.0, 'E').is_ok());
}

#[test]
fn error_case_invalid_ellipsoid() {
    assert!(matches!(Ellipsoid::new(-1.0, 298.0), Err(CoordinateError::InvalidEllipsoid)));
    assert!(matches!(Ellipsoid::new(6_378_137.0, 0.5), Err(CoordinateError::InvalidEllipsoid)));
    let custom = Ellipsoid::new(6_378_137.0, 298.257_223_563).unwrap();
    assert_eq!(custom, Ellipsoid::WGS84);
}

#[test]
fn error_case_julian_day_not_representable() {
    assert!(matches!(
        try_from_julian_day(f64::NAN),
        Err(CoordinateError::TimeConversionError)
    ));
    assert!(matches!(
        try_from_julian_day(1.0e15),
        Err(CoordinateError::TimeConversionError)
    ));
    assert_eq!(try_from_julian_day(2_451_545.0).unwrap(), utc(2000, 1, 1, 12, 0, 0));
}
