use crate::CoordinateError;

/// A validated observer position on the ellipsoid, in decimal degrees.
///
/// Latitude is positive north, longitude positive east. Every celestial and
/// projection entry point takes this as its immutable input.
///
/// # Example
///
/// ```
/// use geocelestial::ObserverLocation;
///
/// let trenton = ObserverLocation::new(40.0352, -74.5844).unwrap();
/// assert_eq!(trenton.latitude(), 40.0352);
/// assert!(ObserverLocation::new(91.0, 0.0).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserverLocation {
    latitude: f64,
    longitude: f64,
}

impl ObserverLocation {
    /// Creates a location after checking latitude in [-90, 90] and longitude in [-180, 180].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::LatitudeOutOfRange`] or
    /// [`CoordinateError::LongitudeOutOfRange`]; NaN fails both checks.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }
        Ok(Self { latitude, longitude })
    }

    /// For values produced by this crate's own math, already known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in degrees, positive north.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}
