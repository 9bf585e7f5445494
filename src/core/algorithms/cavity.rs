//! Cavity extraction for Bowyer-Watson insertion.
//!
//! Inserting a point invalidates every triangle whose circumcircle strictly
//! contains it. Those "bad" triangles form the cavity; the edges of the cavity
//! that are not shared between two bad triangles form its boundary polygon, which
//! the triangulator fans to the new point.
//!
//! # Algorithm
//!
//! 1. [`find_bad_triangles`] scans every live triangle and keeps those whose
//!    circumcircle contains the point.
//! 2. [`extract_boundary`] returns the three edges of a lone bad triangle
//!    unchanged. With two or more bad triangles, an edge of `T1` is kept iff no
//!    other bad triangle `T2` has a matching edge (either direction, within
//!    epsilon). Afterwards any edge occurring more than once in the assembled list
//!    is dropped entirely.
//!
//! # Complexity
//!
//! Boundary extraction compares every pair of bad triangles, O(k²) for a cavity of
//! `k` triangles. Cavities are bounded by local vertex degree.

use thiserror::Error;

use crate::core::collections::{BadTriangleBuffer, CAVITY_BUFFER_SIZE, EdgeBuffer, SmallBuffer};
use crate::core::edge::Edge;
use crate::core::mesh::{Mesh, TriangleKey};
use crate::core::triangle::Triangle;
use crate::geometry::circumcircle::CircumcircleError;
use crate::geometry::point::Point;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while extracting a cavity.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CavityError {
    /// A live triangle has no circumcircle (collinear vertices).
    #[error("Triangle {triangle_key:?} is degenerate: {source}")]
    DegenerateTriangle {
        /// Key of the offending triangle.
        triangle_key: TriangleKey,
        /// Underlying solver error.
        #[source]
        source: CircumcircleError,
    },

    /// A key passed as a bad triangle does not refer to a live triangle.
    #[error("Invalid triangle reference: {triangle_key:?}")]
    InvalidTriangle {
        /// The stale or foreign key.
        triangle_key: TriangleKey,
    },
}

// =============================================================================
// CAVITY
// =============================================================================

/// Result of cavity extraction: the triangles to remove and the boundary to fan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cavity {
    bad: BadTriangleBuffer,
    boundary: EdgeBuffer,
}

impl Cavity {
    /// Keys of the bad triangles.
    #[must_use]
    pub fn bad_triangles(&self) -> &[TriangleKey] {
        &self.bad
    }

    /// Boundary edges, unordered.
    #[must_use]
    pub fn boundary(&self) -> &[Edge] {
        &self.boundary
    }

    /// `true` if no triangle conflicts with the point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bad.is_empty()
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Every live triangle whose circumcircle strictly contains `point`.
///
/// # Errors
///
/// Returns [`CavityError::DegenerateTriangle`] for the first triangle whose
/// circumcircle cannot be computed. The mesh is only read.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::algorithms::cavity::find_bad_triangles;
/// use delaunay2d::core::mesh::Mesh;
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::geometry::point::Point;
///
/// let mut mesh = Mesh::new();
/// mesh.insert(Triangle::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)));
/// let bad = find_bad_triangles(&mesh, &Point::new(1.0, 1.0)).unwrap();
/// assert_eq!(bad.len(), 1);
/// ```
pub fn find_bad_triangles(mesh: &Mesh, point: &Point) -> Result<BadTriangleBuffer, CavityError> {
    let mut bad = BadTriangleBuffer::new();
    for (triangle_key, triangle) in mesh.iter() {
        let circle = triangle
            .circumcircle()
            .map_err(|source| CavityError::DegenerateTriangle {
                triangle_key,
                source,
            })?;
        if circle.contains(point) {
            bad.push(triangle_key);
        }
    }
    Ok(bad)
}

/// Boundary edges of the cavity formed by `bad`.
///
/// # Errors
///
/// Returns [`CavityError::InvalidTriangle`] if a key in `bad` is not live.
pub fn extract_boundary(
    mesh: &Mesh,
    bad: &[TriangleKey],
    eps: f64,
) -> Result<EdgeBuffer, CavityError> {
    let triangles = bad
        .iter()
        .map(|&triangle_key| {
            mesh.get(triangle_key)
                .copied()
                .ok_or(CavityError::InvalidTriangle { triangle_key })
        })
        .collect::<Result<SmallBuffer<Triangle, CAVITY_BUFFER_SIZE>, _>>()?;

    Ok(boundary_of(&triangles, eps))
}

/// Bad triangles and boundary edges for inserting `point`.
///
/// # Errors
///
/// Propagates [`CavityError`] from [`find_bad_triangles`] and
/// [`extract_boundary`].
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::algorithms::cavity::extract_cavity;
/// use delaunay2d::core::mesh::Mesh;
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::geometry::point::Point;
///
/// // Unit square split along a diagonal; the center conflicts with both halves.
/// let (a, b, c, d) = (
///     Point::new(-1.0, 1.0),
///     Point::new(1.0, 1.0),
///     Point::new(1.0, -1.0),
///     Point::new(-1.0, -1.0),
/// );
/// let mut mesh = Mesh::new();
/// mesh.insert(Triangle::new(a, b, c));
/// mesh.insert(Triangle::new(a, d, c));
///
/// let cavity = extract_cavity(&mesh, &Point::new(0.0, 0.0), 1e-4).unwrap();
/// assert_eq!(cavity.bad_triangles().len(), 2);
/// assert_eq!(cavity.boundary().len(), 4);
/// ```
pub fn extract_cavity(mesh: &Mesh, point: &Point, eps: f64) -> Result<Cavity, CavityError> {
    let bad = find_bad_triangles(mesh, point)?;
    let boundary = extract_boundary(mesh, &bad, eps)?;
    tracing::debug!(
        bad = bad.len(),
        boundary = boundary.len(),
        %point,
        "extracted cavity"
    );
    Ok(Cavity { bad, boundary })
}

fn boundary_of(triangles: &[Triangle], eps: f64) -> EdgeBuffer {
    match triangles {
        [] => EdgeBuffer::new(),
        [single] => single.edges().into_iter().collect(),
        _ => {
            let mut polygon = EdgeBuffer::new();
            for (i, t1) in triangles.iter().enumerate() {
                for edge in t1.edges() {
                    let shared = triangles.iter().enumerate().any(|(j, t2)| {
                        j != i && t2.edges().iter().any(|other| edge.matches(other, eps))
                    });
                    if !shared {
                        polygon.push(edge);
                    }
                }
            }
            drop_repeated_edges(&polygon, eps)
        }
    }
}

/// Removes every edge that occurs more than once, keeping none of its copies.
fn drop_repeated_edges(edges: &[Edge], eps: f64) -> EdgeBuffer {
    let kept: EdgeBuffer = edges
        .iter()
        .enumerate()
        .filter(|&(i, edge)| {
            !edges
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && edge.matches(other, eps))
        })
        .map(|(_, edge)| *edge)
        .collect();

    if kept.len() != edges.len() {
        tracing::warn!(
            dropped = edges.len() - kept.len(),
            "cavity boundary contained repeated edges"
        );
    }
    kept
}

// =============================================================================
// TESTS
// =============================================================================
