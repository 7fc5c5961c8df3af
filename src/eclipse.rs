//! Lookup of the nearest solar and lunar eclipses in externally supplied tables.
//!
//! No eclipse is computed here. Callers provide century tables through
//! [`EclipseSource`]; this module only filters them around a date.

use chrono::{Datelike, NaiveDate};

/// Eclipse classification as recorded in the source tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EclipseKind {
    Partial,
    Total,
    Annular,
    /// Annular along part of the path and total along the rest.
    Hybrid,
    /// Lunar only: the moon passes through the penumbra alone.
    Penumbral,
}

/// Which body is eclipsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EclipseBody {
    Solar,
    Lunar,
}

/// One row of a century eclipse table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EclipseEvent {
    /// Date of greatest eclipse, UTC.
    pub date: NaiveDate,
    pub kind: EclipseKind,
    /// Magnitude at greatest eclipse. For solar eclipses, the fraction of
    /// the sun's diameter covered by the moon; for lunar eclipses, the
    /// fraction of the moon's diameter inside the umbra (the penumbra for
    /// penumbral eclipses).
    pub magnitude: f64,
}

/// Provider of precomputed eclipse tables, one century at a time.
///
/// Centuries are keyed by their first year (2000 covers 2000 through 2099).
/// Implementations must return rows sorted by date.
pub trait EclipseSource {
    fn century(&self, body: EclipseBody, century_start: i32) -> &[EclipseEvent];
}

/// An [`EclipseSource`] over borrowed, date-sorted slices spanning any number of centuries.
///
/// # Example
///
/// ```
/// use chrono::{Datelike, NaiveDate};
/// use geocelestial::{nearest_eclipses, EclipseBody, EclipseEvent, EclipseKind, StaticEclipseTable};
///
/// let solar = [
///     EclipseEvent { date: NaiveDate::from_ymd_opt(2017, 8, 21).unwrap(), kind: EclipseKind::Total, magnitude: 1.0306 },
///     EclipseEvent { date: NaiveDate::from_ymd_opt(2024, 4, 8).unwrap(), kind: EclipseKind::Total, magnitude: 1.0566 },
/// ];
/// let table = StaticEclipseTable::new(&solar, &[]);
/// let found = nearest_eclipses(&table, EclipseBody::Solar, NaiveDate::from_ymd_opt(2019, 3, 19).unwrap());
/// assert_eq!(found.last.unwrap().date.year(), 2017);
/// assert_eq!(found.next.unwrap().magnitude, 1.0566);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct StaticEclipseTable<'a> {
    solar: &'a [EclipseEvent],
    lunar: &'a [EclipseEvent],
}

impl<'a> StaticEclipseTable<'a> {
    pub const fn new(solar: &'a [EclipseEvent], lunar: &'a [EclipseEvent]) -> Self {
        StaticEclipseTable { solar, lunar }
    }
}

impl EclipseSource for StaticEclipseTable<'_> {
    fn century(&self, body: EclipseBody, century_start: i32) -> &[EclipseEvent] {
        let rows = match body {
            EclipseBody::Solar => self.solar,
            EclipseBody::Lunar => self.lunar,
        };
        let start = rows.partition_point(|e| e.date.year() < century_start);
        let end = rows.partition_point(|e| e.date.year() < century_start + 100);
        &rows[start..end]
    }
}

/// The closest eclipse strictly before a date and the first on or after it.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestEclipses {
    pub last: Option<EclipseEvent>,
    pub next: Option<EclipseEvent>,
}

fn century_of(date: NaiveDate) -> i32 {
    date.year().div_euclid(100) * 100
}

fn last_before(rows: &[EclipseEvent], date: NaiveDate) -> Option<EclipseEvent> {
    rows.iter().filter(|e| e.date < date).max_by_key(|e| e.date).copied()
}

fn first_on_or_after(rows: &[EclipseEvent], date: NaiveDate) -> Option<EclipseEvent> {
    rows.iter().filter(|e| e.date >= date).min_by_key(|e| e.date).copied()
}

/// Finds the nearest eclipses of `body` around `date`.
///
/// The tables list global events, so nothing is filtered by visibility
/// from any observer. The query date's century is searched first; the
/// previous or following century is consulted only when nothing is found on
/// that side. Empty tables yield no events.
pub fn nearest_eclipses(source: &dyn EclipseSource, body: EclipseBody, date: NaiveDate) -> NearestEclipses {
    let century = century_of(date);
    let current = source.century(body, century);

    let last = last_before(current, date).or_else(|| last_before(source.century(body, century - 100), date));
    let next =
        first_on_or_after(current, date).or_else(|| first_on_or_after(source.century(body, century + 100), date));

    if last.is_none() && next.is_none() {
        log::debug!("no {body:?} eclipse rows around {date}");
    }
    NearestEclipses { last, next }
}
