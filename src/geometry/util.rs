//! Shared geometric helpers: the epsilon equality rule, orientation, and
//! random point generation.
//!
//! Every "are these the same point?" decision in the crate goes through
//! [`approx_eq`]. Edge matching, registry deduplication and bounding-corner pruning
//! all call it with the single epsilon carried by
//! [`TriangulatorConfig`](crate::core::triangulator::TriangulatorConfig).

#![forbid(unsafe_code)]

use rand::Rng;
use rand::SeedableRng;
use thiserror::Error;

use crate::geometry::point::Point;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during random point generation.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or not finite.
    #[error("Invalid coordinate range: min {min} must be finite and less than max {max}")]
    InvalidRange {
        /// Lower bound that was supplied.
        min: f64,
        /// Upper bound that was supplied.
        max: f64,
    },
}

// =============================================================================
// EQUALITY AND ORIENTATION
// =============================================================================

/// Epsilon-tolerant point equality: `distance(a, b) < eps`.
///
/// The comparison is strict, so `approx_eq(a, a, 0.0)` is `false`; callers always
/// pass a positive epsilon.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::geometry::point::Point;
/// use delaunay2d::geometry::util::approx_eq;
///
/// let a = Point::new(1.0, 1.0);
/// assert!(approx_eq(&a, &Point::new(1.0 + 1e-6, 1.0), 1e-4));
/// assert!(!approx_eq(&a, &Point::new(1.001, 1.0), 1e-4));
/// ```
#[inline]
#[must_use]
pub fn approx_eq(a: &Point, b: &Point, eps: f64) -> bool {
    a.distance(b) < eps
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise order, negative for clockwise, zero for
/// collinear input.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::geometry::point::Point;
/// use delaunay2d::geometry::util::orientation;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// let c = Point::new(0.0, 1.0);
/// assert!(orientation(&a, &b, &c) > 0.0);
/// assert!(orientation(&a, &c, &b) < 0.0);
/// ```
#[inline]
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x() - a.x()).mul_add(c.y() - a.y(), -((b.y() - a.y()) * (c.x() - a.x())))
}

// =============================================================================
// RANDOM POINT GENERATION
// =============================================================================

fn validate_range(range: (f64, f64)) -> Result<(), RandomPointGenerationError> {
    if !(range.0.is_finite() && range.1.is_finite()) || range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: range.0,
            max: range.1,
        });
    }
    Ok(())
}

/// Generate `n_points` random points with both coordinates in `range`.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if `min >= max` or either
/// bound is not finite.
pub fn generate_random_points(
    n_points: usize,
    range: (f64, f64),
) -> Result<Vec<Point>, RandomPointGenerationError> {
    validate_range(range)?;
    let mut rng = rand::rng();
    Ok((0..n_points)
        .map(|_| {
            Point::new(
                rng.random_range(range.0..range.1),
                rng.random_range(range.0..range.1),
            )
        })
        .collect())
}

/// Generate random points with a seeded RNG for reproducible results.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if `min >= max` or either
/// bound is not finite.
///
/// # Examples
///
/// ```
/// use delaunay2d::geometry::util::generate_random_points_seeded;
///
/// let a = generate_random_points_seeded(50, (-5.0, 5.0), 42).unwrap();
/// let b = generate_random_points_seeded(50, (-5.0, 5.0), 42).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    validate_range(range)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    Ok((0..n_points)
        .map(|_| {
            Point::new(
                rng.random_range(range.0..range.1),
                rng.random_range(range.0..range.1),
            )
        })
        .collect())
}

// =============================================================================
// TESTS
// =============================================================================
