//! Undirected edges between two points.
//!
//! Edges are not stored in the mesh; they only describe cavity boundaries while a
//! point is being inserted. Two edges match when their endpoints agree in either
//! order under [`approx_eq`].

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::util::approx_eq;

/// An edge between two points.
///
/// The endpoint order is kept as constructed because the triangulator builds the
/// new triangle `(a, p, b)` from it, but [`matches`](Self::matches) ignores order.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::edge::Edge;
/// use delaunay2d::geometry::point::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// assert!(Edge::new(a, b).matches(&Edge::new(b, a), 1e-4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    a: Point,
    b: Point,
}

impl Edge {
    /// Creates an edge from `a` to `b`.
    #[inline]
    #[must_use]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// First endpoint as constructed.
    #[inline]
    #[must_use]
    pub const fn a(&self) -> Point {
        self.a
    }

    /// Second endpoint as constructed.
    #[inline]
    #[must_use]
    pub const fn b(&self) -> Point {
        self.b
    }

    /// Both endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(&self) -> (Point, Point) {
        (self.a, self.b)
    }

    /// `true` if `other` has the same endpoints in either order, within `eps`.
    #[must_use]
    pub fn matches(&self, other: &Self, eps: f64) -> bool {
        (approx_eq(&self.a, &other.a, eps) && approx_eq(&self.b, &other.b, eps))
            || (approx_eq(&self.a, &other.b, eps) && approx_eq(&self.b, &other.a, eps))
    }
}

impl From<(Point, Point)> for Edge {
    #[inline]
    fn from((a, b): (Point, Point)) -> Self {
        Self::new(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_matching_ignores_direction() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        let e1 = Edge::new(a, b);
        let e2 = Edge::new(b, a);
        assert!(e1.matches(&e2, 1e-4));
        assert!(e2.matches(&e1, 1e-4));
        assert_eq!(e1.endpoints(), (a, b));
        assert_ne!(e1, e2);
    }

    #[test]
    fn edge_matching_uses_epsilon_per_endpoint() {
        let e1 = Edge::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let close = Edge::new(Point::new(1.0, 5e-5), Point::new(5e-5, 0.0));
        let far = Edge::new(Point::new(1.0, 2e-4), Point::new(0.0, 0.0));
        assert!(e1.matches(&close, 1e-4));
        assert!(!e1.matches(&far, 1e-4));
    }

    #[test]
    fn edges_sharing_one_endpoint_do_not_match() {
        let a = Point::new(0.0, 0.0);
        let e1 = Edge::new(a, Point::new(1.0, 0.0));
        let e2 = Edge::new(a, Point::new(0.0, 1.0));
        assert!(!e1.matches(&e2, 1e-4));
    }
}
