//! Corner search for the usable extent of a 100 km MGRS square.
//!
//! Near zone and band edges a square is clipped, and at its exact boundary
//! floating-point loss can push a point into the neighbouring square. A
//! corner is therefore the grid point nearest the nominal corner whose
//! decode/encode round trip still names the square.

use crate::config::GeoConfig;
use crate::mgrs::MgrsCoordinate;
use crate::utm::{GridSystem, UTM_NORTH_LIMIT, UTM_SOUTH_LIMIT};
use crate::ObserverLocation;

/// Largest in-square offset, metres.
const EDGE: f64 = 99_999.0;
/// Offsets tried on each axis by the fast path.
const FAST_PATH_REACH: i32 = 4;
/// Spacing of the coarse search lattice, metres.
const LATTICE_SPACING: f64 = 10_000.0;
const LATTICE_STEPS: i32 = 10;
/// Upper bound on round-trip evaluations per corner.
const MAX_EVALUATIONS: u32 = 100_000;

/// One corner of a grid box, as MGRS and as latitude/longitude.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCorner {
    pub mgrs: MgrsCoordinate,
    pub location: ObserverLocation,
}

/// The four corners of the usable part of a 100 km square.
///
/// Check [`MgrsGridBox::is_box_valid`] before using the corners; when it is
/// false they hold the nominal square corners.
///
/// # Example
///
/// ```
/// use geocelestial::{GeoConfig, MgrsCoordinate, MgrsGridBox};
///
/// let square = MgrsCoordinate::new(16, 'U', "EA", 872.0, 5009.0, &GeoConfig::DEFAULT).unwrap();
/// let grid_box = MgrsGridBox::new(&square);
/// assert!(grid_box.is_box_valid);
/// assert_eq!(grid_box.bottom_left.mgrs.easting(), 0.0);
/// assert_eq!(grid_box.top_right.mgrs.northing(), 99_999.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MgrsGridBox {
    pub bottom_left: GridCorner,
    pub bottom_right: GridCorner,
    pub top_left: GridCorner,
    pub top_right: GridCorner,
    pub is_box_valid: bool,
}

/// Round-trip checker for one square with an evaluation budget.
struct SquareSearch {
    square: MgrsCoordinate,
    evaluations: u32,
}

impl SquareSearch {
    fn exhausted(&self) -> bool {
        self.evaluations >= MAX_EVALUATIONS
    }

    /// Whether the point at (`easting`, `northing`) inside the square decodes
    /// to a location that encodes back into the same square.
    fn round_trips(&mut self, easting: f64, northing: f64) -> bool {
        if !(0.0..=EDGE).contains(&easting) || !(0.0..=EDGE).contains(&northing) || self.exhausted() {
            return false;
        }
        self.evaluations += 1;
        let candidate = self.square.with_offsets(easting, northing);
        let utm = candidate.to_utm();
        let location = utm.to_location();
        if utm.system() == GridSystem::Utm && !(UTM_SOUTH_LIMIT..=UTM_NORTH_LIMIT).contains(&location.latitude()) {
            return false;
        }
        MgrsCoordinate::from_location(location, &GeoConfig::with_ellipsoid(self.square.ellipsoid()))
            .same_square(&self.square)
    }

    /// Tries the nominal corner and points up to four metres inward on each
    /// axis, nearest first.
    fn fast_corner(&mut self, origin: (f64, f64), direction: (f64, f64)) -> Option<(f64, f64)> {
        for total in 0..=2 * FAST_PATH_REACH {
            for i in 0..=FAST_PATH_REACH {
                let j = total - i;
                if !(0..=FAST_PATH_REACH).contains(&j) {
                    continue;
                }
                let point = (origin.0 + i as f64 * direction.0, origin.1 + j as f64 * direction.1);
                if self.round_trips(point.0, point.1) {
                    return Some(point);
                }
            }
        }
        None
    }

    /// Valid point of a 10 km lattice nearest (in lattice steps) to the corner.
    fn lattice_point(&mut self, origin: (f64, f64), direction: (f64, f64)) -> Option<(f64, f64)> {
        let mut best: Option<(i32, (f64, f64))> = None;
        for i in 0..=LATTICE_STEPS {
            for j in 0..=LATTICE_STEPS {
                let point = (
                    origin.0 + direction.0 * (i as f64 * LATTICE_SPACING).min(EDGE),
                    origin.1 + direction.1 * (j as f64 * LATTICE_SPACING).min(EDGE),
                );
                if best.is_some_and(|(distance, _)| distance <= i + j) {
                    continue;
                }
                if self.round_trips(point.0, point.1) {
                    best = Some((i + j, point));
                }
            }
        }
        best.map(|(_, point)| point)
    }

    /// Walks from an invalid `start` towards a valid `end` in decimal chunks.
    ///
    /// Steps of 10 000 are taken while the next point stays invalid; when it
    /// would become valid the step drops tenfold, down to 1 m. Returns the
    /// first valid value.
    fn chunked_scan(&mut self, start: f64, end: f64, direction: f64, valid: impl Fn(&mut Self, f64) -> bool) -> f64 {
        let mut current = start;
        let mut step = 10_000.0;
        while step >= 1.0 && !self.exhausted() {
            let next = current + step * direction;
            if (next - end) * direction > 0.0 {
                step /= 10.0;
                continue;
            }
            if valid(self, next) {
                step /= 10.0;
            } else {
                current = next;
            }
        }
        current + direction
    }

    fn corner(&mut self, origin: (f64, f64), direction: (f64, f64)) -> Option<(f64, f64)> {
        if let Some(point) = self.fast_corner(origin, direction) {
            return Some(point);
        }
        let (lattice_easting, lattice_northing) = self.lattice_point(origin, direction)?;

        let northing = if self.round_trips(lattice_easting, origin.1) {
            origin.1
        } else {
            self.chunked_scan(origin.1, lattice_northing, direction.1, |search, n| {
                search.round_trips(lattice_easting, n)
            })
        };
        let easting = if self.round_trips(origin.0, northing) {
            origin.0
        } else {
            self.chunked_scan(origin.0, lattice_easting, direction.0, |search, e| search.round_trips(e, northing))
        };

        if self.exhausted() || !self.round_trips(easting, northing) {
            log::debug!(
                "corner search for {} gave up after {} evaluations",
                self.square,
                self.evaluations
            );
            return None;
        }
        Some((easting, northing))
    }
}

fn grid_corner(square: &MgrsCoordinate, (easting, northing): (f64, f64)) -> GridCorner {
    let mgrs = square.with_offsets(easting, northing);
    GridCorner {
        mgrs,
        location: mgrs.to_location(),
    }
}

impl MgrsGridBox {
    /// Finds the corners of the square containing `square`.
    ///
    /// Each corner first tries the nominal extreme point and its near
    /// neighbours; otherwise a coarse lattice locates the usable region and a
    /// decimal chunked scan walks to its edge along northing, then easting.
    pub fn new(square: &MgrsCoordinate) -> Self {
        let corners = [
            ((0.0, 0.0), (1.0, 1.0)),
            ((EDGE, 0.0), (-1.0, 1.0)),
            ((0.0, EDGE), (1.0, -1.0)),
            ((EDGE, EDGE), (-1.0, -1.0)),
        ];

        let mut is_box_valid = true;
        let found = corners.map(|(origin, direction)| {
            let mut search = SquareSearch {
                square: *square,
                evaluations: 0,
            };
            match search.corner(origin, direction) {
                Some(point) => grid_corner(square, point),
                None => {
                    is_box_valid = false;
                    grid_corner(square, origin)
                }
            }
        });
        let [bottom_left, bottom_right, top_left, top_right] = found;

        MgrsGridBox {
            bottom_left,
            bottom_right,
            top_left,
            top_right,
            is_box_valid,
        }
    }
}
