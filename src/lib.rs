//! # delaunay2d
//!
//! An incremental 2D Delaunay triangulation engine based on the
//! Bowyer-Watson algorithm, plus the point-cloud glue that feeds it: point-file
//! I/O, voxel-mask thresholding and k-means reduction.
//!
//! # Features
//!
//! - Incremental insertion with circumcircle tests and cavity re-triangulation
//! - Epsilon-based point identity shared by deduplication, edge matching and
//!   bounding-corner pruning
//! - Slot-arena triangle storage with stable, monotonically increasing ids
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use delaunay2d::prelude::*;
//!
//! let mut tri = Triangulator::new(15.0).unwrap();
//! for (x, y) in [(0.0, 5.0), (4.33, 2.5), (4.33, -2.5), (0.0, -5.0), (-4.33, -2.5), (-4.33, 2.5)] {
//!     assert!(tri.add_point(x, y).unwrap());
//! }
//! tri.add_point(0.0, 0.0).unwrap();
//! tri.finalize().unwrap();
//!
//! let center = Point::new(0.0, 0.0);
//! assert_eq!(tri.number_of_triangles(), 6);
//! assert!(tri.iterate_triangles().all(|t| t.has_vertex(&center, 1e-9)));
//! ```
//!
//! # Triangulation Invariants
//!
//! Between insertions no inserted point lies strictly inside the circumcircle of
//! any live triangle. The check is exposed as
//! [`Triangulator::validate_delaunay`](core::triangulator::Triangulator::validate_delaunay)
//! and, for arbitrary meshes, as
//! [`find_delaunay_violations`](core::util::find_delaunay_violations).
//!
//! | Invariant | Maintained by |
//! |---|---|
//! | No two accepted points within epsilon | [`PointRegistry`](core::registry::PointRegistry) |
//! | Triangle ids never reused | [`Mesh`](core::mesh::Mesh) |
//! | Empty circumcircle | [`Triangulator::insert`](core::triangulator::Triangulator::insert) |
//! | Failed insertions leave the mesh untouched | [`extract_cavity`](core::algorithms::cavity::extract_cavity) runs before any mutation |
//!
//! # Limitations
//!
//! - Points must lie inside the bounding square given at construction.
//! - Points exactly on a circumcircle count as outside, so cocircular inputs
//!   can be triangulated differently depending on insertion order.
//! - After finalization the triangulation is the Delaunay triangulation of the
//!   input minus any hull triangles whose circumcircle reached a bounding
//!   corner. Choose a bounding radius well above the input extent.
//!
//! # Point-cloud glue
//!
//! ```rust
//! use delaunay2d::cluster::kmeans::reduce;
//! use delaunay2d::io::{Point3, read_points};
//!
//! let text = "# x y z\n0 0 0\n0.1 0 0\n10 10 0\n10.1 10 0\n";
//! let points = read_points(text.as_bytes()).unwrap();
//! let reduced = reduce(&points, 2).unwrap();
//! assert_eq!(reduced.len(), 2);
//! let _xy: Vec<_> = reduced.iter().map(Point3::to_xy).collect();
//! ```

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Triangulation data structures and the Bowyer-Watson driver.
pub mod core {
    /// Triangulation algorithms
    pub mod algorithms {
        /// Bad-triangle search and cavity boundary extraction
        pub mod cavity;
    }
    /// Collection aliases and inline buffer sizes
    pub mod collections;
    pub mod edge;
    pub mod mesh;
    pub mod registry;
    pub mod triangle;
    pub mod triangulator;
    pub mod util;

    pub use edge::*;
    pub use mesh::*;
    pub use registry::*;
    pub use triangle::*;
    pub use triangulator::*;
    pub use util::*;
}

/// Points, circumcircles and small geometric helpers.
pub mod geometry {
    pub mod circumcircle;
    pub mod point;
    /// Point comparison, orientation and random point generation
    pub mod util;

    pub use circumcircle::*;
    pub use point::*;
    pub use util::*;
}

/// Text and JSON persistence for point clouds and triangle lists.
pub mod io;

/// Voxel thresholding and k-means reduction of point clouds.
pub mod cluster;

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        algorithms::cavity::*, edge::*, mesh::*, registry::*, triangle::*, triangulator::*,
        util::*,
    };
    pub use crate::geometry::{circumcircle::*, point::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        cluster::{KMeansConfig, VoxelStack},
        core::{mesh::Mesh, registry::PointRegistry, triangle::Triangle, triangulator::Triangulator},
        geometry::Point,
        io::Point3,
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Point3>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<Mesh>());
        assert!(is_normal::<PointRegistry>());
        assert!(is_normal::<Triangulator>());
        assert!(is_normal::<KMeansConfig>());
        assert!(is_normal::<VoxelStack>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut tri = Triangulator::new(10.0).unwrap();
        assert!(tri.add_point(1.0, 1.0).unwrap());
        let first: Triangle = tri.iterate_triangles().next().unwrap();
        let circle: Circumcircle = first.circumcircle().unwrap();
        assert!(circle.radius() > 0.0);
        assert!(approx_eq(&Point::new(0.0, 0.0), &Point::new(0.0, 1e-6), DEFAULT_EPSILON));
        assert!(is_delaunay(tri.mesh(), tri.registered_points()).is_ok());
    }
}
