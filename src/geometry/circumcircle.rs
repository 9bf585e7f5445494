//! Circumcircle of a triangle and the strict point-in-circle predicate.
//!
//! The circumcenter `(ux, uy)` of `a`, `b`, `c` uses the determinant form
//!
//! ```text
//! d  = 2 (ax (by - cy) + bx (cy - ay) + cx (ay - by))
//! ux = ((ax² + ay²)(by - cy) + (bx² + by²)(cy - ay) + (cx² + cy²)(ay - by)) / d
//! uy = ((ax² + ay²)(cx - bx) + (bx² + by²)(ax - cx) + (cx² + cy²)(bx - ax)) / d
//! ```
//!
//! and the radius is the distance from the center to `a`.
//!
//! # Boundary Convention
//!
//! [`Circumcircle::contains`] is strict: a point exactly on the circle is outside.
//! For four or more exactly cocircular points this means the triangulation built
//! on top of it depends on insertion order.
//!
//! # Degeneracy
//!
//! When `|d|` is negligible relative to the squared extent of the triangle the
//! three points are treated as collinear and [`CircumcircleError::Degenerate`] is
//! returned instead of a non-finite center.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::geometry::point::Point;

/// Relative threshold below which the circumcircle denominator counts as zero.
///
/// `|d|` is compared against this value times the largest squared edge length, so
/// the test is independent of the coordinate scale.
pub const DEGENERACY_TOLERANCE: f64 = 1e-12;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while computing a circumcircle.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CircumcircleError {
    /// The three points are (numerically) collinear or coincident.
    #[error("Degenerate triangle {a}, {b}, {c}: circumcircle denominator {denominator:e} is zero")]
    Degenerate {
        /// First vertex.
        a: Point,
        /// Second vertex.
        b: Point,
        /// Third vertex.
        c: Point,
        /// The denominator `d` that was rejected.
        denominator: f64,
    },
}

// =============================================================================
// CIRCUMCIRCLE
// =============================================================================

/// The circle through the three vertices of a triangle.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::geometry::circumcircle::Circumcircle;
/// use delaunay2d::geometry::point::Point;
///
/// let circle = Circumcircle::new(
///     &Point::new(-1.0, 0.0),
///     &Point::new(1.0, 0.0),
///     &Point::new(0.0, 1.0),
/// )
/// .unwrap();
/// assert!(circle.center().distance(&Point::new(0.0, 0.0)) < 1e-12);
/// assert!((circle.radius() - 1.0).abs() < 1e-12);
/// assert!(circle.contains(&Point::new(0.5, 0.5)));
/// assert!(!circle.contains(&Point::new(2.0, 0.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle {
    center: Point,
    radius: f64,
}

impl Circumcircle {
    /// Computes the circumcircle of `a`, `b`, `c`.
    ///
    /// # Errors
    ///
    /// Returns [`CircumcircleError::Degenerate`] if the points are collinear or
    /// coincident within [`DEGENERACY_TOLERANCE`], or if the resulting center or
    /// radius is not finite.
    pub fn new(a: &Point, b: &Point, c: &Point) -> Result<Self, CircumcircleError> {
        let (ax, ay) = (a.x(), a.y());
        let (bx, by) = (b.x(), b.y());
        let (cx, cy) = (c.x(), c.y());

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));

        let scale = a
            .distance_squared(b)
            .max(b.distance_squared(c))
            .max(c.distance_squared(a));
        let degenerate = || CircumcircleError::Degenerate {
            a: *a,
            b: *b,
            c: *c,
            denominator: d,
        };
        if !d.is_finite() || d.abs() <= 2.0 * DEGENERACY_TOLERANCE * scale {
            return Err(degenerate());
        }

        let a_sq = ax * ax + ay * ay;
        let b_sq = bx * bx + by * by;
        let c_sq = cx * cx + cy * cy;

        let ux = (a_sq * (by - cy) + b_sq * (cy - ay) + c_sq * (ay - by)) / d;
        let uy = (a_sq * (cx - bx) + b_sq * (ax - cx) + c_sq * (bx - ax)) / d;
        let center = Point::new(ux, uy);
        let radius = center.distance(a);

        if !(ux.is_finite() && uy.is_finite() && radius.is_finite()) {
            return Err(degenerate());
        }

        Ok(Self { center, radius })
    }

    /// The circumcenter.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The circumradius.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// `true` iff `point` is strictly inside the circle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.distance(&self.center) < self.radius
    }
}

// =============================================================================
// TESTS
// =============================================================================
