//! Calendar-derived names: zodiac sign, moon sign and traditional full moon names.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

use crate::lunar::moon_illumination;
use crate::math::normalize_degrees_360;
use crate::time::{shift_days, start_of_local_day};

/// The twelve signs of the tropical zodiac, in ecliptic order from Aries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    const ORDER: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sun sign for a calendar date.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use geocelestial::ZodiacSign;
    ///
    /// let date = NaiveDate::from_ymd_opt(2019, 3, 19).unwrap();
    /// assert_eq!(ZodiacSign::from_date(date), ZodiacSign::Pisces);
    /// ```
    pub fn from_date(date: NaiveDate) -> Self {
        // (month, first day) at which each sign starts, beginning with Capricorn's year-end run.
        const STARTS: [(u32, u32, ZodiacSign); 12] = [
            (1, 20, ZodiacSign::Aquarius),
            (2, 19, ZodiacSign::Pisces),
            (3, 21, ZodiacSign::Aries),
            (4, 20, ZodiacSign::Taurus),
            (5, 21, ZodiacSign::Gemini),
            (6, 21, ZodiacSign::Cancer),
            (7, 23, ZodiacSign::Leo),
            (8, 23, ZodiacSign::Virgo),
            (9, 23, ZodiacSign::Libra),
            (10, 23, ZodiacSign::Scorpio),
            (11, 22, ZodiacSign::Sagittarius),
            (12, 22, ZodiacSign::Capricorn),
        ];
        let key = (date.month(), date.day());
        STARTS
            .iter()
            .rev()
            .find(|(month, day, _)| key >= (*month, *day))
            .map(|(_, _, sign)| *sign)
            .unwrap_or(ZodiacSign::Capricorn)
    }

    /// Sign occupying a 30° slice of ecliptic longitude.
    pub fn from_ecliptic_longitude(degrees: f64) -> Self {
        let index = (normalize_degrees_360(degrees) / 30.0) as usize;
        Self::ORDER[index.min(11)]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl core::fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traditional name of a full moon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FullMoonName {
    Wolf,
    Snow,
    Worm,
    Pink,
    Flower,
    Strawberry,
    Buck,
    Sturgeon,
    Harvest,
    Hunters,
    Beaver,
    Cold,
    /// Second full moon in one calendar month.
    Blue,
}

impl FullMoonName {
    /// Name of the first full moon in a calendar month (1 = January).
    pub fn for_month(month: u32) -> Option<Self> {
        let name = match month {
            1 => FullMoonName::Wolf,
            2 => FullMoonName::Snow,
            3 => FullMoonName::Worm,
            4 => FullMoonName::Pink,
            5 => FullMoonName::Flower,
            6 => FullMoonName::Strawberry,
            7 => FullMoonName::Buck,
            8 => FullMoonName::Sturgeon,
            9 => FullMoonName::Harvest,
            10 => FullMoonName::Hunters,
            11 => FullMoonName::Beaver,
            12 => FullMoonName::Cold,
            _ => return None,
        };
        Some(name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FullMoonName::Wolf => "Wolf Moon",
            FullMoonName::Snow => "Snow Moon",
            FullMoonName::Worm => "Worm Moon",
            FullMoonName::Pink => "Pink Moon",
            FullMoonName::Flower => "Flower Moon",
            FullMoonName::Strawberry => "Strawberry Moon",
            FullMoonName::Buck => "Buck Moon",
            FullMoonName::Sturgeon => "Sturgeon Moon",
            FullMoonName::Harvest => "Harvest Moon",
            FullMoonName::Hunters => "Hunter's Moon",
            FullMoonName::Beaver => "Beaver Moon",
            FullMoonName::Cold => "Cold Moon",
            FullMoonName::Blue => "Blue Moon",
        }
    }
}

impl core::fmt::Display for FullMoonName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the moon passes opposition (phase 0.5) between two instants.
fn passes_full(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let before = moon_illumination(start).phase;
    let after = moon_illumination(end).phase;
    before < 0.5 && after >= 0.5
}

/// True if a full moon occurs during the calendar day `day` in `offset`.
pub fn is_full_moon_day(day: NaiveDate, offset: FixedOffset) -> bool {
    passes_full(start_of_local_day(day, offset), start_of_local_day(shift_days(day, 1), offset))
}

/// Name of the full moon occurring on local day `day` in `offset`, if any.
///
/// The month's first full moon takes the traditional month name; a second
/// one in the same local month is a Blue Moon. Day and month boundaries are
/// those of `offset`, so a full moon near midnight can change month.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Offset, Utc};
/// use geocelestial::{full_moon_name, FullMoonName};
///
/// let utc = Utc.fix();
/// let worm = NaiveDate::from_ymd_opt(2019, 3, 20).unwrap();
/// assert_eq!(full_moon_name(worm, utc), Some(FullMoonName::Worm));
/// assert_eq!(full_moon_name(NaiveDate::from_ymd_opt(2019, 3, 19).unwrap(), utc), None);
/// ```
pub fn full_moon_name(day: NaiveDate, offset: FixedOffset) -> Option<FullMoonName> {
    if !is_full_moon_day(day, offset) {
        return None;
    }
    let first_of_month = day.with_day(1)?;
    let earlier = first_of_month
        .iter_days()
        .take_while(|d| *d < day)
        .any(|d| is_full_moon_day(d, offset));
    if earlier {
        return Some(FullMoonName::Blue);
    }
    FullMoonName::for_month(day.month())
}
