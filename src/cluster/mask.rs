//! Voxel mask stacks and thresholding.

#![forbid(unsafe_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterError;
use crate::io::points::Point3;

/// A `frames × height × width` stack of `u16` mask samples in row-major order.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::cluster::{VoxelStack, threshold_stack};
///
/// let mut stack = VoxelStack::zeros(2, 3, 4);
/// stack.set(1, 2, 3, 255).unwrap();
/// let points = threshold_stack(&stack);
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].coords(), [3.0, 2.0, 1.0]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelStack {
    frames: usize,
    height: usize,
    width: usize,
    samples: Vec<u16>,
}

impl VoxelStack {
    /// Wraps `samples`, which must hold exactly `frames × height × width` values.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ShapeMismatch`] if the length is wrong.
    pub fn new(
        frames: usize,
        height: usize,
        width: usize,
        samples: Vec<u16>,
    ) -> Result<Self, ClusterError> {
        let expected = frames
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width));
        match expected {
            Some(expected) if expected == samples.len() => Ok(Self {
                frames,
                height,
                width,
                samples,
            }),
            _ => Err(ClusterError::ShapeMismatch {
                frames,
                height,
                width,
                expected: expected.unwrap_or(usize::MAX),
                actual: samples.len(),
            }),
        }
    }

    /// An all-zero stack.
    #[must_use]
    pub fn zeros(frames: usize, height: usize, width: usize) -> Self {
        Self {
            frames,
            height,
            width,
            samples: vec![0; frames * height * width],
        }
    }

    /// `(frames, height, width)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize, usize) {
        (self.frames, self.height, self.width)
    }

    fn index(&self, frame: usize, row: usize, column: usize) -> Option<usize> {
        (frame < self.frames && row < self.height && column < self.width)
            .then(|| (frame * self.height + row) * self.width + column)
    }

    /// The sample at `(frame, row, column)`.
    #[must_use]
    pub fn get(&self, frame: usize, row: usize, column: usize) -> Option<u16> {
        self.index(frame, row, column).map(|i| self.samples[i])
    }

    /// Overwrites the sample at `(frame, row, column)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::OutOfBounds`] for an index outside the stack.
    pub fn set(
        &mut self,
        frame: usize,
        row: usize,
        column: usize,
        value: u16,
    ) -> Result<(), ClusterError> {
        let i = self
            .index(frame, row, column)
            .ok_or(ClusterError::OutOfBounds { frame, row, column })?;
        self.samples[i] = value;
        Ok(())
    }

    /// Samples of one frame, row-major.
    #[must_use]
    pub fn frame(&self, frame: usize) -> Option<&[u16]> {
        let len = self.height * self.width;
        (frame < self.frames).then(|| &self.samples[frame * len..(frame + 1) * len])
    }
}

#[expect(clippy::cast_precision_loss)]
const fn index_to_coordinate(index: usize) -> f64 {
    index as f64
}

/// One `(x, y, z)` = `(column, row, frame)` point per nonzero voxel.
///
/// Points come out frame by frame, then row by row, then column by column.
#[must_use]
pub fn threshold_stack(stack: &VoxelStack) -> Vec<Point3> {
    let mut points = Vec::new();
    if stack.width == 0 {
        return points;
    }
    for z in 0..stack.frames {
        let Some(frame) = stack.frame(z) else {
            continue;
        };
        for (y, row) in frame.chunks_exact(stack.width).enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value > 0 {
                    points.push(Point3::new(
                        index_to_coordinate(x),
                        index_to_coordinate(y),
                        index_to_coordinate(z),
                    ));
                }
            }
        }
    }
    tracing::debug!(
        frames = stack.frames,
        height = stack.height,
        width = stack.width,
        points = points.len(),
        "thresholded voxel stack"
    );
    points
}

/// At most `max_points` points drawn from `points` without replacement.
///
/// The draw is seeded, so a given `(points, max_points, seed)` always yields the
/// same subset. Selected points keep their input order. When `points` already
/// fits, it is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::cluster::sample_points;
/// use delaunay2d::io::Point3;
///
/// let cloud: Vec<Point3> = (0..100).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
/// let sample = sample_points(&cloud, 10, 7);
/// assert_eq!(sample.len(), 10);
/// assert_eq!(sample, sample_points(&cloud, 10, 7));
/// ```
#[must_use]
pub fn sample_points(points: &[Point3], max_points: usize, seed: u64) -> Vec<Point3> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, points.len(), max_points).into_vec();
    picked.sort_unstable();
    tracing::debug!(
        input = points.len(),
        kept = picked.len(),
        seed,
        "subsampled point cloud"
    );
    picked.into_iter().map(|i| points[i]).collect()
}
