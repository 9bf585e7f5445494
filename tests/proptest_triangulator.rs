//! Property-based tests for `Triangulator` invariants.
//!
//! ## Invariants Tested
//!
//! - **Empty circumcircle** - after every insertion no accepted point lies
//!   strictly inside any live triangle's circumcircle
//! - **Triangle count** - a finalized triangulation of N points in general
//!   position with b hull vertices has `2N - 2 - b` triangles
//! - **Insertion-order invariance** - when the Delaunay triangulation is unique,
//!   every insertion order produces the same triangle set
//! - **Duplicate rejection** - re-inserting accepted points changes nothing

#![allow(missing_docs)]

use delaunay2d::prelude::*;
use proptest::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Twice the minimum triangle area accepted by the general-position filter.
const MIN_ORIENTATION: f64 = 0.5;

/// Relative margin by which non-vertex points must clear every circumcircle
/// for the Delaunay triangulation to count as unique.
const UNIQUENESS_MARGIN: f64 = 1e-6;

fn point_in(range: f64) -> impl Strategy<Value = Point> {
    (-range..range, -range..range).prop_map(|(x, y)| Point::new(x, y))
}

fn points_in(range: f64, count: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(point_in(range), count)
}

/// `true` iff every triple of points spans at least [`MIN_ORIENTATION`].
fn in_general_position(points: &[Point]) -> bool {
    let n = points.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if orientation(&points[i], &points[j], &points[k]).abs() <= MIN_ORIENTATION {
                    return false;
                }
            }
        }
    }
    true
}

/// Number of convex hull vertices (Andrew's monotone chain, collinear points
/// excluded).
fn hull_vertex_count(points: &[Point]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));

    let mut hull: Vec<Point> = Vec::with_capacity(2 * sorted.len());
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &Point>> = if pass == 0 {
            Box::new(sorted.iter())
        } else {
            Box::new(sorted.iter().rev())
        };
        for p in iter {
            while hull.len() >= start + 2
                && orientation(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0
            {
                hull.pop();
            }
            hull.push(*p);
        }
        hull.pop();
    }
    hull.len()
}

fn canonical(triangles: impl Iterator<Item = Triangle>) -> Vec<[[f64; 2]; 3]> {
    let by_coords = |a: &[f64; 2], b: &[f64; 2]| -> Ordering {
        a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
    };
    let mut out: Vec<[[f64; 2]; 3]> = triangles
        .map(|t| {
            let mut v = t.vertices().map(|p| p.coords());
            v.sort_by(by_coords);
            v
        })
        .collect();
    out.sort_by(|a, b| {
        by_coords(&a[0], &b[0])
            .then_with(|| by_coords(&a[1], &b[1]))
            .then_with(|| by_coords(&a[2], &b[2]))
    });
    out
}

/// `true` if every non-vertex registered point clears every circumcircle by a
/// relative margin, so the Delaunay triangulation is unique.
fn is_unambiguous(tri: &Triangulator) -> bool {
    tri.iterate_triangles().all(|t| {
        let Ok(circle) = t.circumcircle() else {
            return false;
        };
        tri.registered_points()
            .iter()
            .filter(|p| !t.has_vertex(p, 1e-12))
            .all(|p| {
                (p.distance(&circle.center()) - circle.radius()).abs()
                    > UNIQUENESS_MARGIN * circle.radius()
            })
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No accepted point lies inside any circumcircle, after every insertion.
    #[test]
    fn prop_empty_circumcircle_after_each_insertion(points in points_in(100.0, 1..=30)) {
        let mut tri = Triangulator::new(1000.0).unwrap();
        for p in points {
            tri.insert(p).unwrap();
            let violations = find_delaunay_violations(tri.mesh(), tri.points()).unwrap();
            prop_assert!(violations.is_empty(), "violations after inserting {}: {:?}", p, violations);
        }
    }

    /// Finalized triangle count equals `2N - 2 - b`.
    #[test]
    fn prop_triangle_count_matches_hull_formula(points in points_in(10.0, 3..=8)) {
        prop_assume!(in_general_position(&points));

        let mut tri = Triangulator::new(1e5).unwrap();
        prop_assert_eq!(tri.add_points(points.iter().copied()).unwrap(), points.len());
        tri.finalize().unwrap();

        let n = points.len();
        let b = hull_vertex_count(&points);
        prop_assert_eq!(tri.number_of_triangles(), 2 * n - 2 - b);
    }

    /// Two insertion orders yield the same triangles when the result is unique.
    #[test]
    fn prop_insertion_order_invariance(
        (points, shuffled) in points_in(50.0, 3..=7)
            .prop_flat_map(|points| {
                let shuffled = Just(points.clone()).prop_shuffle();
                (Just(points), shuffled)
            })
    ) {
        let mut first = Triangulator::new(1000.0).unwrap();
        first.add_points(points.iter().copied()).unwrap();
        prop_assume!(first.number_of_points() == points.len());
        prop_assume!(is_unambiguous(&first));

        let mut second = Triangulator::new(1000.0).unwrap();
        second.add_points(shuffled.iter().copied()).unwrap();

        first.finalize().unwrap();
        second.finalize().unwrap();
        prop_assert_eq!(
            canonical(first.iterate_triangles()),
            canonical(second.iterate_triangles())
        );
    }

    /// Re-inserting every accepted point, exactly or within epsilon, is a no-op.
    #[test]
    fn prop_duplicates_do_not_change_the_mesh(
        points in points_in(100.0, 1..=20),
        jitter in -5e-5..5e-5_f64,
    ) {
        let mut tri = Triangulator::new(1000.0).unwrap();
        tri.add_points(points.iter().copied()).unwrap();
        let before: Vec<_> = tri.triangles_with_ids().collect();
        let accepted = tri.number_of_points();

        for p in tri.points().to_vec() {
            prop_assert!(!tri.add_point(p.x(), p.y()).unwrap());
            prop_assert!(!tri.add_point(p.x() + jitter, p.y()).unwrap());
        }
        prop_assert_eq!(tri.number_of_points(), accepted);
        prop_assert_eq!(tri.triangles_with_ids().collect::<Vec<_>>(), before);
    }

    /// Every live triangle references registered points only.
    #[test]
    fn prop_triangles_use_registered_vertices(points in points_in(100.0, 1..=25)) {
        let mut tri = Triangulator::new(1000.0).unwrap();
        tri.add_points(points).unwrap();
        let registered = tri.registered_points();
        for t in tri.iterate_triangles() {
            for v in t.vertices() {
                prop_assert!(registered.contains(&v));
            }
        }
    }
}

#[test]
fn hull_vertex_count_of_square_with_center() {
    let points = [
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
        Point::new(2.0, 2.0),
        Point::new(2.0, 0.0),
    ];
    assert_eq!(hull_vertex_count(&points), 4);
}
