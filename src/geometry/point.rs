//! Planar points with `f64` coordinates.
//!
//! # Equality Semantics
//!
//! [`Point`] implements exact, coordinate-wise [`PartialEq`]. The triangulation
//! engine never relies on it to decide whether two points are "the same": identity
//! inside the engine is epsilon-distance equality through
//! [`approx_eq`](crate::geometry::util::approx_eq). Exact equality exists for tests,
//! serialization round trips, and callers that copy coordinates verbatim.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors produced when validating point coordinates.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum PointValidationError {
    /// A coordinate is NaN or infinite.
    #[error("Invalid coordinate at index {coordinate_index}: {coordinate_value} is not finite")]
    NonFinite {
        /// Index of the offending coordinate (0 = x, 1 = y).
        coordinate_index: usize,
        /// The offending value.
        coordinate_value: f64,
    },
}

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in the plane.
///
/// Points are immutable once created; the coordinates are private and exposed
/// through [`x`](Self::x), [`y`](Self::y) and [`coords`](Self::coords).
///
/// Serialized as a two-element array `[x, y]`.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::geometry::point::Point;
///
/// let p = Point::new(1.0, 2.0);
/// assert_eq!(p.coords(), [1.0, 2.0]);
///
/// let q: Point = [1.0, 2.0].into();
/// assert_eq!(p, q);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    x: f64,
    y: f64,
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl Point {
    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Both coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Euclidean distance to `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use delaunay2d::geometry::point::Point;
    ///
    /// let d = Point::new(0.0, 0.0).distance(&Point::new(3.0, 4.0));
    /// assert!((d - 5.0).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Checks that both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`PointValidationError::NonFinite`] for the first coordinate that is
    /// NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use delaunay2d::geometry::point::Point;
    ///
    /// assert!(Point::new(1.0, 2.0).validate().is_ok());
    /// assert!(Point::new(f64::NAN, 2.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PointValidationError> {
        for (coordinate_index, coordinate_value) in self.coords().into_iter().enumerate() {
            if !coordinate_value.is_finite() {
                return Err(PointValidationError::NonFinite {
                    coordinate_index,
                    coordinate_value,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        point.coords()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_accessors_and_conversions() {
        let p = Point::new(-1.5, 2.25);
        assert_relative_eq!(p.x(), -1.5);
        assert_relative_eq!(p.y(), 2.25);

        let arr: [f64; 2] = p.into();
        assert_eq!(arr, [-1.5, 2.25]);
        assert_eq!(Point::from((-1.5, 2.25)), p);
        assert_eq!(p.to_string(), "(-1.5, 2.25)");
    }

    #[test]
    fn point_distance_is_symmetric() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(b.distance(&a), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn point_validation_reports_offending_coordinate() {
        match Point::new(0.0, f64::INFINITY).validate() {
            Err(PointValidationError::NonFinite {
                coordinate_index, ..
            }) => assert_eq!(coordinate_index, 1),
            other => panic!("Expected NonFinite error, got {other:?}"),
        }
    }

    #[test]
    fn point_serializes_as_array() {
        let p = Point::new(0.5, -3.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[0.5,-3.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
