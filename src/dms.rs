//! Degree-minute-second angles.

#[allow(unused_imports)]
use core_maths::CoreFloat;

use core::fmt;

use crate::CoordinateError;

/// Which coordinate a [`Dms`] value measures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    fn hemispheres(self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }
}

/// An unsigned angle with a hemisphere letter (`N`, `S`, `E` or `W`).
///
/// # Example
///
/// ```
/// use geocelestial::{Axis, Dms};
///
/// let latitude = Dms::from_decimal(-33.8568, Axis::Latitude).unwrap();
/// assert_eq!(latitude.degrees(), 33);
/// assert_eq!(latitude.minutes(), 51);
/// assert_eq!(latitude.hemisphere(), 'S');
/// assert!((latitude.to_decimal() + 33.8568).abs() < 1e-9);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dms {
    degrees: u16,
    minutes: u8,
    seconds: f64,
    hemisphere: char,
}

impl Dms {
    /// # Errors
    ///
    /// [`CoordinateError::InvalidDms`] when minutes or seconds fall outside
    /// [0, 60), the hemisphere is not one of `NSEW`, or the total exceeds 90°
    /// for `N`/`S` or 180° for `E`/`W`.
    pub fn new(degrees: u16, minutes: u8, seconds: f64, hemisphere: char) -> Result<Self, CoordinateError> {
        let hemisphere = hemisphere.to_ascii_uppercase();
        let axis = match hemisphere {
            'N' | 'S' => Axis::Latitude,
            'E' | 'W' => Axis::Longitude,
            _ => return Err(CoordinateError::InvalidDms),
        };
        if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
            return Err(CoordinateError::InvalidDms);
        }
        let dms = Self {
            degrees,
            minutes,
            seconds,
            hemisphere,
        };
        if dms.magnitude() > axis.limit() {
            return Err(CoordinateError::InvalidDms);
        }
        Ok(dms)
    }

    /// Splits a signed decimal angle. Seconds that round up to 60 carry into the minutes.
    ///
    /// # Errors
    ///
    /// [`CoordinateError::InvalidDms`] when the value is outside the axis range or not finite.
    pub fn from_decimal(value: f64, axis: Axis) -> Result<Self, CoordinateError> {
        if !value.is_finite() || value.abs() > axis.limit() {
            return Err(CoordinateError::InvalidDms);
        }
        let (positive, negative) = axis.hemispheres();
        let hemisphere = if value < 0.0 { negative } else { positive };

        let magnitude = value.abs();
        let mut degrees = magnitude.floor();
        let mut minutes = ((magnitude - degrees) * 60.0).floor();
        let mut seconds = (magnitude - degrees - minutes / 60.0) * 3600.0;
        // Float residue just under a boundary.
        if seconds >= 60.0 - 1e-9 {
            seconds = 0.0;
            minutes += 1.0;
        }
        if minutes >= 60.0 {
            minutes -= 60.0;
            degrees += 1.0;
        }

        Ok(Self {
            degrees: degrees as u16,
            minutes: minutes as u8,
            seconds: seconds.max(0.0),
            hemisphere,
        })
    }

    fn magnitude(&self) -> f64 {
        f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0
    }

    /// Signed decimal degrees, negative for `S` and `W`.
    pub fn to_decimal(&self) -> f64 {
        match self.hemisphere {
            'S' | 'W' => -self.magnitude(),
            _ => self.magnitude(),
        }
    }

    pub fn degrees(&self) -> u16 {
        self.degrees
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn hemisphere(&self) -> char {
        self.hemisphere
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}° {}' {:.3}\"",
            self.hemisphere, self.degrees, self.minutes, self.seconds
        )
    }
}
