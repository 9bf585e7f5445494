//! Point-cloud preparation upstream of the triangulator.
//!
//! [`mask`] turns a stack of segmentation masks into voxel coordinates and
//! [`kmeans`] reduces or splits the resulting cloud. Neither depends on the
//! triangulation core; project with [`Point3::to_xy`](crate::io::Point3::to_xy)
//! before inserting.

use thiserror::Error;

pub mod kmeans;
pub mod mask;

pub use kmeans::*;
pub use mask::*;

/// Errors raised by the clustering glue.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClusterError {
    /// Sample buffer length does not match `frames × height × width`.
    #[error("Voxel stack shape {frames}x{height}x{width} needs {expected} samples, got {actual}")]
    ShapeMismatch {
        /// Number of frames.
        frames: usize,
        /// Rows per frame.
        height: usize,
        /// Columns per frame.
        width: usize,
        /// `frames × height × width`.
        expected: usize,
        /// Length of the provided buffer.
        actual: usize,
    },

    /// Voxel index outside the stack.
    #[error("Voxel ({frame}, {row}, {column}) is outside the stack")]
    OutOfBounds {
        /// Frame index.
        frame: usize,
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },

    /// The number of clusters must be at least one.
    #[error("Number of clusters must be positive")]
    ZeroClusters,

    /// Clustering needs at least one point.
    #[error("Cannot cluster an empty point set")]
    EmptyInput,

    /// More clusters requested than there are points.
    #[error("Cannot form {k} clusters from {points} points")]
    TooFewPoints {
        /// Requested number of clusters.
        k: usize,
        /// Number of input points.
        points: usize,
    },

    /// Invalid k-means settings.
    #[error("Invalid k-means configuration: {message}")]
    InvalidConfig {
        /// Description of the bad setting.
        message: String,
    },
}
