//! Triangles stored in the mesh.
//!
//! A [`Triangle`] is an ordered triple of points. Its winding is whatever the
//! construction produced; nothing in the crate normalizes it.

use serde::{Deserialize, Serialize};

use crate::core::edge::Edge;
use crate::geometry::circumcircle::{Circumcircle, CircumcircleError};
use crate::geometry::point::Point;
use crate::geometry::util::approx_eq;

/// An ordered triple of points `(p1, p2, p3)`.
///
/// Serialized as a three-element array of `[x, y]` pairs.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::geometry::point::Point;
///
/// let t = Triangle::new(
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(0.0, 1.0),
/// );
/// let circle = t.circumcircle().unwrap();
/// assert!(circle.contains(&Point::new(0.4, 0.4)));
/// assert_eq!(t.edges().len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Point; 3]", into = "[Point; 3]")]
pub struct Triangle {
    p1: Point,
    p2: Point,
    p3: Point,
}

impl Triangle {
    /// Creates a triangle from three points, in the given order.
    #[inline]
    #[must_use]
    pub const fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self { p1, p2, p3 }
    }

    /// First vertex.
    #[inline]
    #[must_use]
    pub const fn p1(&self) -> Point {
        self.p1
    }

    /// Second vertex.
    #[inline]
    #[must_use]
    pub const fn p2(&self) -> Point {
        self.p2
    }

    /// Third vertex.
    #[inline]
    #[must_use]
    pub const fn p3(&self) -> Point {
        self.p3
    }

    /// The vertices in construction order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// The vertices as a tuple `(p1, p2, p3)`.
    #[inline]
    #[must_use]
    pub const fn as_tuple(&self) -> (Point, Point, Point) {
        (self.p1, self.p2, self.p3)
    }

    /// The three edges `p1p2`, `p2p3`, `p3p1`, in that order.
    #[must_use]
    pub const fn edges(&self) -> [Edge; 3] {
        [
            Edge::new(self.p1, self.p2),
            Edge::new(self.p2, self.p3),
            Edge::new(self.p3, self.p1),
        ]
    }

    /// The circumcircle of this triangle.
    ///
    /// # Errors
    ///
    /// Returns [`CircumcircleError::Degenerate`] if the vertices are collinear.
    pub fn circumcircle(&self) -> Result<Circumcircle, CircumcircleError> {
        Circumcircle::new(&self.p1, &self.p2, &self.p3)
    }

    /// `true` if any vertex equals `point` within `eps`.
    #[must_use]
    pub fn has_vertex(&self, point: &Point, eps: f64) -> bool {
        self.vertices().iter().any(|v| approx_eq(v, point, eps))
    }
}

impl From<[Point; 3]> for Triangle {
    #[inline]
    fn from([p1, p2, p3]: [Point; 3]) -> Self {
        Self::new(p1, p2, p3)
    }
}

impl From<Triangle> for [Point; 3] {
    #[inline]
    fn from(triangle: Triangle) -> Self {
        triangle.vertices()
    }
}

impl From<Triangle> for (Point, Point, Point) {
    #[inline]
    fn from(triangle: Triangle) -> Self {
        triangle.as_tuple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Triangle {
        Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 3.0),
        )
    }

    #[test]
    fn edges_follow_vertex_order() {
        let t = sample();
        let [e0, e1, e2] = t.edges();
        assert_eq!(e0.endpoints(), (t.p1(), t.p2()));
        assert_eq!(e1.endpoints(), (t.p2(), t.p3()));
        assert_eq!(e2.endpoints(), (t.p3(), t.p1()));
    }

    #[test]
    fn has_vertex_uses_epsilon() {
        let t = sample();
        assert!(t.has_vertex(&Point::new(2.0 + 1e-6, 0.0), 1e-4));
        assert!(!t.has_vertex(&Point::new(1.0, 1.0), 1e-4));
    }

    #[test]
    fn triangle_serde_roundtrip() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "[[0.0,0.0],[2.0,0.0],[1.0,3.0]]");
        let back: Triangle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn collinear_triangle_has_no_circumcircle() {
        let t = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        );
        assert!(t.circumcircle().is_err());
    }
}
