//! Military Grid Reference System: 100 km square digraphs over UTM and UPS.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::config::{Ellipsoid, GeoConfig};
use crate::utm::{GridSystem, UtmCoordinate, LATITUDE_BANDS};
use crate::{CoordinateError, ObserverLocation};

const SQUARE: f64 = 100_000.0;
/// Northing period of the row letters.
const ROW_CYCLE: f64 = 2_000_000.0;

/// Column letters, chosen by `(zone - 1) % 3`.
const UTM_COLUMNS: [&[u8; 8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];
/// Row letters; even zones start five letters in.
const UTM_ROWS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";

/// Smallest northing reached inside each latitude band, in band order C..X.
const BAND_MIN_NORTHING: [f64; 20] = [
    1_100_000.0,
    2_000_000.0,
    2_800_000.0,
    3_700_000.0,
    4_600_000.0,
    5_500_000.0,
    6_400_000.0,
    7_300_000.0,
    8_200_000.0,
    9_100_000.0,
    0.0,
    800_000.0,
    1_700_000.0,
    2_600_000.0,
    3_500_000.0,
    4_400_000.0,
    5_300_000.0,
    6_200_000.0,
    7_000_000.0,
    7_900_000.0,
];

/// Lettering of one polar zone's 100 km squares.
struct PolarZone {
    column_low: u8,
    column_high: u8,
    row_high: u8,
    false_easting: f64,
    false_northing: f64,
}

fn polar_zone(letter: char) -> Option<PolarZone> {
    let zone = match letter {
        'A' => PolarZone {
            column_low: b'J',
            column_high: b'Z',
            row_high: b'Z',
            false_easting: 800_000.0,
            false_northing: 800_000.0,
        },
        'B' => PolarZone {
            column_low: b'A',
            column_high: b'R',
            row_high: b'Z',
            false_easting: 2_000_000.0,
            false_northing: 800_000.0,
        },
        'Y' => PolarZone {
            column_low: b'J',
            column_high: b'Z',
            row_high: b'P',
            false_easting: 800_000.0,
            false_northing: 1_300_000.0,
        },
        'Z' => PolarZone {
            column_low: b'A',
            column_high: b'J',
            row_high: b'P',
            false_easting: 2_000_000.0,
            false_northing: 1_300_000.0,
        },
        _ => return None,
    };
    Some(zone)
}

/// A point inside a 100 km MGRS square.
///
/// # Example
///
/// ```
/// use geocelestial::{GeoConfig, MgrsCoordinate};
///
/// let mgrs = MgrsCoordinate::new(16, 'U', "EA", 872.0, 5009.0, &GeoConfig::DEFAULT).unwrap();
/// let utm = mgrs.to_utm();
/// assert_eq!(utm.easting(), 500_872.0);
/// assert_eq!(utm.northing(), 5_505_009.0);
///
/// let again = MgrsCoordinate::from_utm(&utm);
/// assert_eq!(again.digraph(), ['E', 'A']);
/// assert_eq!(again.to_string(), "16U EA 00872 05009");
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MgrsCoordinate {
    zone_number: u8,
    zone_letter: char,
    digraph: [char; 2],
    easting: f64,
    northing: f64,
    ellipsoid: Ellipsoid,
}

fn letter_index(letters: &[u8], letter: char) -> Option<usize> {
    letters.iter().position(|l| *l as char == letter)
}

fn band_index(letter: char) -> Option<usize> {
    letter_index(LATITUDE_BANDS, letter)
}

fn utm_digraph(zone: u8, easting: f64, northing: f64) -> [char; 2] {
    let columns = UTM_COLUMNS[(zone as usize - 1) % 3];
    let column = ((easting / SQUARE).floor() as i64 - 1).clamp(0, 7) as usize;
    let mut row = ((northing / SQUARE).floor() as i64).rem_euclid(20) as usize;
    if zone % 2 == 0 {
        row = (row + 5) % 20;
    }
    [columns[column] as char, UTM_ROWS[row] as char]
}

/// Skips I and O in a row letter counted from A.
fn polar_row_letter(index: u8) -> u8 {
    let mut letter = b'A' + index;
    if letter > b'H' {
        letter += 1;
    }
    if letter > b'N' {
        letter += 1;
    }
    letter
}

fn polar_digraph(zone: &PolarZone, easting: f64, northing: f64) -> [char; 2] {
    let row = ((northing - zone.false_northing) / SQUARE).floor().clamp(0.0, 23.0) as u8;
    let mut column = zone.column_low + ((easting - zone.false_easting) / SQUARE).floor().clamp(0.0, 25.0) as u8;
    if zone.column_low == b'J' {
        if column > b'L' {
            column += 3;
        }
        if column > b'U' {
            column += 2;
        }
    } else {
        if column > b'C' {
            column += 2;
        }
        if column > b'H' {
            column += 1;
        }
        if column > b'L' {
            column += 3;
        }
    }
    [column.min(b'Z') as char, polar_row_letter(row).min(b'Z') as char]
}

/// Whether a polar column letter is used by its zone.
fn polar_column_valid(zone: &PolarZone, letter: u8) -> bool {
    (zone.column_low..=zone.column_high).contains(&letter)
        && !matches!(letter, b'D' | b'E' | b'I' | b'M' | b'N' | b'O' | b'V' | b'W')
}

/// Truncates a grid value to whole metres, after rounding away floating-point noise below a millimetre.
fn whole_metres(value: f64) -> f64 {
    ((value * 1000.0).round() / 1000.0).floor()
}

impl MgrsCoordinate {
    /// Builds an MGRS coordinate from its parts.
    ///
    /// `zone_number` is 0 for the polar zones A, B, Y and Z. Easting and
    /// northing are metres within the square, in `[0, 100000)`.
    ///
    /// # Errors
    ///
    /// - [`CoordinateError::InvalidZoneNumber`] / [`CoordinateError::InvalidZoneLetter`] for a bad grid zone
    /// - [`CoordinateError::InvalidDigraph`] for letters that do not exist in that zone
    /// - [`CoordinateError::GridValueOutOfRange`] for easting or northing outside `[0, 100000)`
    pub fn new(
        zone_number: u8,
        zone_letter: char,
        digraph: &str,
        easting: f64,
        northing: f64,
        config: &GeoConfig,
    ) -> Result<Self, CoordinateError> {
        let zone_letter = zone_letter.to_ascii_uppercase();
        let mut letters = digraph.chars().map(|c| c.to_ascii_uppercase());
        let (Some(column), Some(row), None) = (letters.next(), letters.next(), letters.next()) else {
            return Err(CoordinateError::InvalidDigraph);
        };

        if zone_number > 60 {
            return Err(CoordinateError::InvalidZoneNumber);
        }
        if zone_number == 0 {
            let zone = polar_zone(zone_letter).ok_or(CoordinateError::InvalidZoneLetter)?;
            let row_valid = row.is_ascii_uppercase() && row as u8 <= zone.row_high && !matches!(row, 'I' | 'O');
            if !column.is_ascii() || !polar_column_valid(&zone, column as u8) || !row_valid {
                return Err(CoordinateError::InvalidDigraph);
            }
        } else {
            band_index(zone_letter).ok_or(CoordinateError::InvalidZoneLetter)?;
            let columns = UTM_COLUMNS[(zone_number as usize - 1) % 3];
            if letter_index(columns, column).is_none() || letter_index(UTM_ROWS, row).is_none() {
                return Err(CoordinateError::InvalidDigraph);
            }
        }

        if !(0.0..SQUARE).contains(&easting) || !(0.0..SQUARE).contains(&northing) {
            return Err(CoordinateError::GridValueOutOfRange);
        }
        Ok(Self {
            zone_number,
            zone_letter,
            digraph: [column, row],
            easting,
            northing,
            ellipsoid: config.ellipsoid,
        })
    }

    /// Encodes a grid coordinate, truncating to whole metres.
    pub fn from_utm(utm: &UtmCoordinate) -> Self {
        let easting = whole_metres(utm.easting());
        let northing = whole_metres(utm.northing());
        let digraph = match utm.system() {
            GridSystem::Utm => utm_digraph(utm.zone_number(), easting, northing),
            GridSystem::Ups => match polar_zone(utm.zone_letter()) {
                Some(zone) => polar_digraph(&zone, easting, northing),
                None => ['A', 'A'],
            },
        };
        Self {
            zone_number: utm.zone_number(),
            zone_letter: utm.zone_letter(),
            digraph,
            easting: easting.rem_euclid(SQUARE),
            northing: northing.rem_euclid(SQUARE),
            ellipsoid: utm.ellipsoid(),
        }
    }

    pub fn from_location(location: ObserverLocation, config: &GeoConfig) -> Self {
        Self::from_utm(&UtmCoordinate::from_location(location, config))
    }

    /// Decodes to a full grid coordinate.
    ///
    /// The row letters repeat every 2,000 km of northing; the repeat is
    /// resolved by the smallest northing the latitude band can reach.
    pub fn to_utm(&self) -> UtmCoordinate {
        let config = GeoConfig::with_ellipsoid(self.ellipsoid);
        let (easting, northing) = if self.zone_number == 0 {
            self.polar_grid_origin()
        } else {
            self.utm_grid_origin()
        };
        let system = if self.zone_number == 0 {
            GridSystem::Ups
        } else {
            GridSystem::Utm
        };
        UtmCoordinate::assemble(
            self.zone_number,
            self.zone_letter,
            easting + self.easting,
            northing + self.northing,
            &config,
            system,
        )
    }

    fn utm_grid_origin(&self) -> (f64, f64) {
        let columns = UTM_COLUMNS[(self.zone_number as usize - 1) % 3];
        let column = letter_index(columns, self.digraph[0]).unwrap_or(0);
        let mut row = letter_index(UTM_ROWS, self.digraph[1]).unwrap_or(0);
        if self.zone_number % 2 == 0 {
            row = (row + 15) % 20;
        }
        let easting = (column as f64 + 1.0) * SQUARE;
        let min_northing = band_index(self.zone_letter).map_or(0.0, |i| BAND_MIN_NORTHING[i]);
        let mut northing = row as f64 * SQUARE;
        while northing < min_northing {
            northing += ROW_CYCLE;
        }
        (easting, northing)
    }

    fn polar_grid_origin(&self) -> (f64, f64) {
        let Some(zone) = polar_zone(self.zone_letter) else {
            return (0.0, 0.0);
        };
        let [column, row] = [self.digraph[0] as u8, self.digraph[1] as u8];

        let mut northing = (row - b'A') as f64 * SQUARE + zone.false_northing;
        if row > b'I' {
            northing -= SQUARE;
        }
        if row > b'O' {
            northing -= SQUARE;
        }

        let mut easting = (column - zone.column_low) as f64 * SQUARE + zone.false_easting;
        if zone.column_low == b'J' {
            if column > b'L' {
                easting -= 300_000.0;
            }
            if column > b'U' {
                easting -= 200_000.0;
            }
        } else {
            if column > b'C' {
                easting -= 200_000.0;
            }
            if column > b'I' {
                easting -= 100_000.0;
            }
            if column > b'L' {
                easting -= 300_000.0;
            }
        }
        (easting, northing)
    }

    pub fn to_location(&self) -> ObserverLocation {
        self.to_utm().to_location()
    }

    pub fn zone_number(&self) -> u8 {
        self.zone_number
    }

    pub fn zone_letter(&self) -> char {
        self.zone_letter
    }

    /// Column and row letters of the 100 km square.
    pub fn digraph(&self) -> [char; 2] {
        self.digraph
    }

    /// Metres east within the square.
    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Metres north within the square.
    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Same square and datum, different position inside it.
    pub(crate) fn with_offsets(&self, easting: f64, northing: f64) -> Self {
        Self {
            easting,
            northing,
            ..*self
        }
    }

    /// Whether two coordinates name the same 100 km square.
    pub fn same_square(&self, other: &MgrsCoordinate) -> bool {
        self.zone_number == other.zone_number && self.zone_letter == other.zone_letter && self.digraph == other.digraph
    }
}

impl core::fmt::Display for MgrsCoordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.zone_number != 0 {
            write!(f, "{}", self.zone_number)?;
        }
        write!(
            f,
            "{} {}{} {:05} {:05}",
            self.zone_letter,
            self.digraph[0],
            self.digraph[1],
            self.easting.floor() as u32,
            self.northing.floor() as u32
        )
    }
}
