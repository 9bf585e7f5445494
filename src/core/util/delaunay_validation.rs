//! Delaunay empty-circumcircle property validation utilities.
//!
//! These checks are global, O(triangles × points), and meant for tests, debugging
//! and callers that want to audit a finished mesh. The insertion path never calls
//! them.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::mesh::{Mesh, TriangleId};
use crate::geometry::circumcircle::CircumcircleError;
use crate::geometry::point::Point;

/// Relative slack applied to the circumradius when validating.
///
/// A point counts as a violation only if it is inside the circle by more than
/// this fraction of the radius, so vertices of the triangle itself and
/// cocircular points do not trip on rounding.
pub const VALIDATION_TOLERANCE: f64 = 1e-9;

/// Errors that can occur during Delaunay property validation.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::triangulator::Triangulator;
/// use delaunay2d::core::util::DelaunayValidationError;
///
/// let mut tri = Triangulator::new(10.0).unwrap();
/// tri.add_point(1.0, 2.0).unwrap();
/// let result: Result<(), DelaunayValidationError> = tri.validate_delaunay();
/// assert!(result.is_ok());
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DelaunayValidationError {
    /// A point lies strictly inside the circumcircle of a triangle.
    #[error("Triangle {triangle_id} violates the Delaunay property: {point} is inside its circumcircle")]
    DelaunayViolation {
        /// The offending triangle.
        triangle_id: TriangleId,
        /// A point inside its circumcircle.
        point: Point,
    },
    /// A live triangle is degenerate.
    #[error("Triangle {triangle_id} is degenerate: {source}")]
    DegenerateTriangle {
        /// The degenerate triangle.
        triangle_id: TriangleId,
        /// Underlying solver error.
        #[source]
        source: CircumcircleError,
    },
}

/// One triangle/point pair breaking the empty-circumcircle property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaunayViolation {
    /// Id of the violating triangle.
    pub triangle_id: TriangleId,
    /// A point strictly inside its circumcircle.
    pub point: Point,
}

/// Every `(triangle, point)` pair where `point` lies strictly inside the
/// triangle's circumcircle, beyond [`VALIDATION_TOLERANCE`].
///
/// Reports at most one point per triangle.
///
/// # Errors
///
/// Returns [`DelaunayValidationError::DegenerateTriangle`] if a triangle has no
/// circumcircle.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::mesh::Mesh;
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::core::util::find_delaunay_violations;
/// use delaunay2d::geometry::point::Point;
///
/// let (a, b, c) = (Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0));
/// let mut mesh = Mesh::new();
/// mesh.insert(Triangle::new(a, b, c));
///
/// assert!(find_delaunay_violations(&mesh, &[a, b, c]).unwrap().is_empty());
/// let inside = Point::new(1.0, 1.0);
/// assert_eq!(find_delaunay_violations(&mesh, &[a, b, c, inside]).unwrap().len(), 1);
/// ```
pub fn find_delaunay_violations(
    mesh: &Mesh,
    points: &[Point],
) -> Result<Vec<DelaunayViolation>, DelaunayValidationError> {
    let mut violations = Vec::new();

    for (triangle_id, triangle) in mesh.iter_with_ids() {
        let circle = triangle
            .circumcircle()
            .map_err(|source| DelaunayValidationError::DegenerateTriangle {
                triangle_id,
                source,
            })?;
        let limit = circle.radius() * (1.0 - VALIDATION_TOLERANCE);
        let center = circle.center();

        if let Some(point) = points.iter().find(|p| p.distance(&center) < limit) {
            violations.push(DelaunayViolation {
                triangle_id,
                point: *point,
            });
        }
    }

    tracing::debug!(
        triangles = mesh.len(),
        points = points.len(),
        violations = violations.len(),
        "checked Delaunay property"
    );
    Ok(violations)
}

/// `Ok(())` if no point lies inside any triangle's circumcircle.
///
/// # Errors
///
/// Returns the first violation or degenerate triangle found.
pub fn is_delaunay(mesh: &Mesh, points: &[Point]) -> Result<(), DelaunayValidationError> {
    match find_delaunay_violations(mesh, points)?.first() {
        None => Ok(()),
        Some(violation) => Err(DelaunayValidationError::DelaunayViolation {
            triangle_id: violation.triangle_id,
            point: violation.point,
        }),
    }
}
