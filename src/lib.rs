//! # geocelestial
//!
//! Geodetic grid conversions and a low-precision sun/moon almanac for a single observer.
//!
//! The crate has two halves that share [`ObserverLocation`]:
//!
//! - **Grids**: latitude/longitude to and from UTM, UPS, MGRS (including the usable
//!   extent of a 100 km square), ECEF, unit-sphere Cartesian, Web Mercator and
//!   degree-minute-second notation, on any [`Ellipsoid`].
//! - **Sky**: solar and lunar position, rise/set and twilight times, moon illumination,
//!   perigee/apogee, zodiac and full-moon names, and eclipse lookups, gathered into a
//!   [`CelestialSnapshot`] whose events are reconciled onto the observer's local day.
//!
//! The astronomy follows the amateur "low precision" formulas: expect agreement with
//! published almanacs to a minute or two, not to the second.
//!
//! ## Basic Usage
//!
//! ```
//! use chrono::{FixedOffset, TimeZone, Utc};
//! use geocelestial::{calculate_celestial, CelestialOptions, GeoConfig, MgrsCoordinate, ObserverLocation};
//!
//! let trenton = ObserverLocation::new(40.0352, -74.5844).unwrap();
//!
//! // Grid reference
//! let mgrs = MgrsCoordinate::from_location(trenton, &GeoConfig::DEFAULT);
//! println!("MGRS: {mgrs}");
//!
//! // Almanac for the local (UTC-4) day
//! let options = CelestialOptions {
//!     offset: FixedOffset::west_opt(4 * 3600).unwrap(),
//!     ..Default::default()
//! };
//! let instant = Utc.with_ymd_and_hms(2019, 3, 19, 16, 0, 0).unwrap();
//! let snapshot = calculate_celestial(trenton, instant, &options);
//! if let Some(sunrise) = snapshot.sun.and_then(|sun| sun.rise) {
//!     println!("Sunrise: {}", snapshot.to_local(sunrise));
//! }
//! ```
#![no_std]

mod cartesian;
mod config;
mod dms;
mod ecef;
mod eclipse;
mod grid_box;
mod local_time;
mod location;
mod lunar;
mod math;
mod mgrs;
mod names;
mod rise_set;
mod sky;
mod snapshot;
mod solar;
mod time;
mod ups;
mod utm;
mod web_mercator;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use cartesian::Cartesian;
pub use config::{Ellipsoid, GeoConfig};
pub use dms::{Axis, Dms};
pub use ecef::Ecef;
pub use eclipse::{
    nearest_eclipses, EclipseBody, EclipseEvent, EclipseKind, EclipseSource, NearestEclipses, StaticEclipseTable,
};
pub use grid_box::{GridCorner, MgrsGridBox};
pub use local_time::{determine_slipped_event_index, reconcile};
pub use location::ObserverLocation;
pub use lunar::{
    lunar_cycle, lunar_distance_km, moon_illumination, moon_position, DistanceExtremum, ExtremumPair, LunarCycle,
    MoonIllumination, MoonPhaseName, MoonPosition, ANOMALISTIC_MONTH,
};
pub use mgrs::MgrsCoordinate;
pub use names::{full_moon_name, is_full_moon_day, FullMoonName, ZodiacSign};
pub use rise_set::{
    find_crossing, moon_crossing, solar_noon, CelestialStatus, Crossing, ASTRONOMICAL_TWILIGHT, BOTTOM_DISC_HORIZON,
    CIVIL_TWILIGHT, MOON_HORIZON, NAUTICAL_TWILIGHT, VISUAL_HORIZON,
};
pub use snapshot::{
    calculate_celestial, AdditionalSolarTimes, CelestialExtensions, CelestialOptions, CelestialSnapshot, EagerLoad,
    MoonState, SunState,
};
pub use solar::{solar_coordinates, sun_position, HorizontalPosition, SolarCoordinates};
pub use time::{days_since_j2000, from_julian_day, to_julian_day, try_from_julian_day, J2000};
pub use utm::{GridSystem, UtmCoordinate, UTM_NORTH_LIMIT, UTM_SOUTH_LIMIT};
pub use web_mercator::{WebMercator, WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_LATITUDE};

/// Errors raised when a value is constructed from out-of-range input.
///
/// Only constructors validate. Astronomical absences (no sunrise, no perigee found)
/// are reported through `Option` and [`CelestialStatus`], and an unsearchable MGRS
/// square through [`MgrsGridBox::is_box_valid`].
///
/// # Variants
///
/// - `LatitudeOutOfRange`: latitude must be in [-90°, 90°]
/// - `LongitudeOutOfRange`: longitude must be in [-180°, 180°]
/// - `InvalidZoneNumber`: UTM zone must be 1..=60 (0 for UPS in MGRS)
/// - `InvalidZoneLetter`: band letter must be C..X without I and O, or A/B/Y/Z for UPS
/// - `InvalidDigraph`: MGRS square letters are not valid for the zone
/// - `GridValueOutOfRange`: easting or northing is negative, non-finite or too large
/// - `WebMercatorOutOfRange`: outside ±85.05112878° or ±20037508.342789244 m
/// - `InvalidDms`: minutes/seconds outside [0, 60), unknown hemisphere, or angle too large
/// - `InvalidEllipsoid`: radius must be positive and inverse flattening above 1
/// - `TimeConversionError`: a date could not be represented
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    /// Latitude out of valid range [-90, 90] degrees
    #[error("Latitude out of range")]
    LatitudeOutOfRange,

    /// Longitude out of valid range [-180, 180] degrees
    #[error("Longitude out of range")]
    LongitudeOutOfRange,

    #[error("Invalid zone number")]
    InvalidZoneNumber,

    #[error("Invalid zone letter")]
    InvalidZoneLetter,

    #[error("Invalid MGRS digraph")]
    InvalidDigraph,

    /// Easting or northing outside what the grid can hold
    #[error("Grid value out of range")]
    GridValueOutOfRange,

    #[error("Web Mercator value out of range")]
    WebMercatorOutOfRange,

    #[error("Invalid degree-minute-second value")]
    InvalidDms,

    #[error("Invalid ellipsoid")]
    InvalidEllipsoid,

    /// Error converting between time representations
    #[error("Time conversion error")]
    TimeConversionError,
}
