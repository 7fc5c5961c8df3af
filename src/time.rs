//! Julian day conversions shared by the solar and lunar engines.
//!
//! Every formula in this crate runs on a fractional Julian Day in UT. Days are
//! treated as exactly 86 400 seconds; leap seconds are not modeled and
//! sub-second parts of an instant are dropped.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
use julian_day_converter::{julian_day_to_unix_millis, unix_millis_to_julian_day};

use crate::CoordinateError;

#[allow(unused_imports)]
use core_maths::CoreFloat;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Julian Day of the Unix epoch (1970-01-01 00:00 UTC).
pub(crate) const J1970: f64 = 2_440_587.5;

/// Seconds per day.
pub(crate) const DAY_SECONDS: f64 = 86_400.0;

/// Convert a UTC instant to a fractional Julian Day.
///
/// Sub-second components are discarded before conversion, so two instants in
/// the same second map to the same Julian Day.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geocelestial::to_julian_day;
///
/// let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
/// assert_eq!(to_julian_day(noon), 2_451_545.0);
/// ```
pub fn to_julian_day(instant: DateTime<Utc>) -> f64 {
    unix_millis_to_julian_day(instant.timestamp() * 1000)
}

/// Convert a fractional Julian Day back to a UTC instant, rounded to the second.
///
/// Returns `None` when the Julian Day is not finite or falls outside the range
/// `chrono` can represent.
pub fn from_julian_day(julian_day: f64) -> Option<DateTime<Utc>> {
    if !julian_day.is_finite() {
        return None;
    }
    // julian_day_to_unix_millis saturates on overflow; guard the range first.
    if ((julian_day - J1970) * DAY_SECONDS).abs() > 8.0e12 {
        return None;
    }
    let millis = julian_day_to_unix_millis(julian_day);
    let seconds = (millis as f64 / 1000.0).round() as i64;
    Utc.timestamp_opt(seconds, 0).single()
}

/// Like [`from_julian_day`], for callers that propagate errors with `?`.
///
/// # Errors
///
/// [`CoordinateError::TimeConversionError`] when the Julian Day has no UTC instant.
pub fn try_from_julian_day(julian_day: f64) -> Result<DateTime<Utc>, CoordinateError> {
    from_julian_day(julian_day).ok_or(CoordinateError::TimeConversionError)
}

/// Days elapsed since J2000.0 for the given instant.
pub fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    to_julian_day(instant) - J2000
}

/// Julian centuries since J2000.0 for a Julian Day.
pub(crate) fn julian_century(julian_day: f64) -> f64 {
    (julian_day - J2000) / 36_525.0
}

/// UTC midnight that starts the given calendar day.
pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// UTC instant of local midnight starting `date` under `offset`.
pub(crate) fn start_of_local_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let midnight = start_of_day(date);
    TimeDelta::try_seconds(i64::from(offset.local_minus_utc()))
        .and_then(|shift| midnight.checked_sub_signed(shift))
        .unwrap_or(midnight)
}

/// Shift a calendar day by a signed number of days, saturating at chrono's limits.
pub(crate) fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let shifted = if delta >= 0 {
        date.checked_add_days(Days::new(delta as u64))
    } else {
        date.checked_sub_days(Days::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Decimal year used by the anomalistic-cycle series (e.g. 2019.21 for mid-March 2019).
pub(crate) fn decimal_year(instant: DateTime<Utc>) -> f64 {
    let year = instant.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 12, 31).map(|d| d.ordinal()) == Some(366) {
        366.0
    } else {
        365.0
    };
    year as f64 + (instant.ordinal0() as f64 + seconds_into_day(instant) / DAY_SECONDS) / days_in_year
}

fn seconds_into_day(instant: DateTime<Utc>) -> f64 {
    use chrono::Timelike;
    instant.num_seconds_from_midnight() as f64
}
