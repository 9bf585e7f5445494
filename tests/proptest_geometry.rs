//! Property-based tests for the geometry primitives.
//!
//! - Circumcenters are equidistant from the three vertices
//! - Circumcircles do not depend on vertex order
//! - Edge matching is symmetric and direction-independent
//! - Point serialization round-trips exactly

#![allow(missing_docs)]

use approx::assert_relative_eq;
use delaunay2d::prelude::*;
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = f64> {
    -1000.0..1000.0_f64
}

fn point() -> impl Strategy<Value = Point> {
    (coordinate(), coordinate()).prop_map(|(x, y)| Point::new(x, y))
}

/// Triangles whose doubled area is comfortably above rounding noise.
fn well_shaped_triangle() -> impl Strategy<Value = Triangle> {
    (point(), point(), point())
        .prop_filter("non-degenerate", |(a, b, c)| orientation(a, b, c).abs() > 1.0)
        .prop_map(|(a, b, c)| Triangle::new(a, b, c))
}

proptest! {
    #[test]
    fn prop_circumcenter_is_equidistant(t in well_shaped_triangle()) {
        let circle = t.circumcircle().unwrap();
        let center = circle.center();
        for v in t.vertices() {
            assert_relative_eq!(v.distance(&center), circle.radius(), max_relative = 1e-6);
        }
    }

    #[test]
    fn prop_circumcircle_ignores_vertex_order(t in well_shaped_triangle()) {
        let (a, b, c) = t.as_tuple();
        let forward = t.circumcircle().unwrap();
        let rotated = Triangle::new(b, c, a).circumcircle().unwrap();
        let mirrored = Triangle::new(a, c, b).circumcircle().unwrap();
        for other in [rotated, mirrored] {
            assert_relative_eq!(forward.radius(), other.radius(), max_relative = 1e-6);
            prop_assert!(forward.center().distance(&other.center()) <= 1e-6 * forward.radius());
        }
    }

    #[test]
    fn prop_centroid_is_inside_circumcircle(t in well_shaped_triangle()) {
        let (a, b, c) = t.as_tuple();
        let centroid = Point::new((a.x() + b.x() + c.x()) / 3.0, (a.y() + b.y() + c.y()) / 3.0);
        prop_assert!(t.circumcircle().unwrap().contains(&centroid));
    }

    #[test]
    fn prop_edge_matching_is_symmetric(a in point(), b in point(), shift in -1e-5..1e-5_f64) {
        let edge = Edge::new(a, b);
        let reversed = Edge::new(b, a);
        let nudged = Edge::new(Point::new(a.x() + shift, a.y()), b);
        prop_assert!(edge.matches(&reversed, 1e-4));
        prop_assert!(reversed.matches(&edge, 1e-4));
        prop_assert_eq!(edge.matches(&nudged, 1e-4), nudged.matches(&edge, 1e-4));
        prop_assert!(edge.matches(&nudged, 1e-4));
    }

    #[test]
    fn prop_point_json_round_trip(p in point()) {
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, p);
    }

    #[test]
    fn prop_collinear_triples_are_degenerate(a in point(), b in point(), s in 0.1..0.9_f64) {
        prop_assume!(a.distance(&b) > 1.0);
        // Interpolated third point on segment ab.
        let c = Point::new(a.x() + s * (b.x() - a.x()), a.y() + s * (b.y() - a.y()));
        let result = Triangle::new(a, b, c).circumcircle();
        prop_assert!(
            matches!(result, Err(CircumcircleError::Degenerate { .. })),
            "expected degenerate circumcircle, got {:?}",
            result
        );
    }
}
