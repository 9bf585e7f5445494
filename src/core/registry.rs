//! Epsilon deduplication of inserted points.
//!
//! The registry keeps every accepted point in insertion order. A candidate within
//! `eps` of an accepted point is rejected silently; rejection is reported only
//! through the `bool` returned by [`PointRegistry::add`].
//!
//! # Complexity
//!
//! `add` scans all accepted points, O(n). Point clouds handed to the triangulator
//! are already reduced upstream, so this stays cheap in practice.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::util::approx_eq;

/// Ordered set of accepted points, no two within `eps` of each other.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::registry::PointRegistry;
/// use delaunay2d::geometry::point::Point;
///
/// let mut registry = PointRegistry::new(1e-4);
/// assert!(registry.add(Point::new(1.0, 1.0)));
/// assert!(!registry.add(Point::new(1.0 + 1e-6, 1.0)));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PointRegistry {
    points: Vec<Point>,
    eps: f64,
}

impl PointRegistry {
    /// Creates an empty registry using `eps` as the identity tolerance.
    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self {
            points: Vec::new(),
            eps,
        }
    }

    /// Accepts `point` unless an accepted point lies within `eps`.
    ///
    /// Returns `true` if the point was newly accepted.
    pub fn add(&mut self, point: Point) -> bool {
        if self.contains(&point) {
            tracing::trace!(%point, "registry rejected near-duplicate point");
            return false;
        }
        self.points.push(point);
        true
    }

    /// `true` if an accepted point lies within `eps` of `point`.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.points.iter().any(|p| approx_eq(p, point, self.eps))
    }

    /// Number of accepted points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if no point has been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Accepted points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Accepted points as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// The identity tolerance.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_insertion_order() {
        let mut registry = PointRegistry::new(1e-4);
        let points = [
            Point::new(3.0, 1.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, 2.0),
        ];
        for p in points {
            assert!(registry.add(p));
        }
        assert_eq!(registry.as_slice(), &points);
        assert_eq!(registry.iter().count(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn registry_rejects_points_within_epsilon() {
        let mut registry = PointRegistry::new(1e-4);
        assert!(registry.add(Point::new(0.0, 0.0)));
        assert!(!registry.add(Point::new(0.0, 0.0)));
        assert!(!registry.add(Point::new(5e-5, -5e-5)));
        assert!(registry.add(Point::new(2e-4, 0.0)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejection_is_against_any_accepted_point() {
        let mut registry = PointRegistry::new(0.5);
        assert!(registry.add(Point::new(0.0, 0.0)));
        assert!(registry.add(Point::new(10.0, 0.0)));
        assert!(!registry.add(Point::new(10.1, 0.1)));
        assert!(registry.contains(&Point::new(0.2, 0.2)));
        assert!((registry.epsilon() - 0.5).abs() < f64::EPSILON);
    }
}
