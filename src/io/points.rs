//! Reading and writing `x y [z]` point files.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::geometry::point::Point;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while reading or writing point and triangle files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PointIoError {
    /// Underlying I/O failure.
    #[error("I/O error: {source}")]
    Io {
        /// The I/O error.
        #[from]
        source: io::Error,
    },

    /// A line could not be parsed as `x y [z]`.
    #[error("Line {line}: cannot parse {content:?} as `x y [z]`")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {source}")]
    Json {
        /// The serde_json error.
        #[from]
        source: serde_json::Error,
    },
}

// =============================================================================
// POINT3
// =============================================================================

/// A point in voxel space: column `x`, row `y`, frame `z`.
///
/// Serialized as a three-element array `[x, y, z]`.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::geometry::point::Point;
/// use delaunay2d::io::Point3;
///
/// let p = Point3::new(1.0, 2.0, 3.0);
/// assert_eq!(p.to_xy(), Point::new(1.0, 2.0));
/// assert_eq!(p.to_string(), "1.0000 2.0000 3.0000");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    /// Column coordinate.
    pub x: f64,
    /// Row coordinate.
    pub y: f64,
    /// Frame coordinate.
    pub z: f64,
}

impl Point3 {
    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the `xy` plane.
    #[inline]
    #[must_use]
    pub const fn to_xy(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Squared Euclidean distance.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dz.mul_add(dz, dy.mul_add(dy, dx * dx))
    }

    /// The coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.coords()
    }
}

impl From<Point> for Point3 {
    fn from(p: Point) -> Self {
        Self::new(p.x(), p.y(), 0.0)
    }
}

/// Four decimals per coordinate, the point-file format.
impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} {:.4} {:.4}", self.x, self.y, self.z)
    }
}

// =============================================================================
// READING
// =============================================================================

fn parse_line(text: &str) -> Option<Point3> {
    let mut values = [0.0_f64; 3];
    let mut count = 0;
    for token in text.split_whitespace() {
        if count == 3 {
            return None;
        }
        let value: f64 = token.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        values[count] = value;
        count += 1;
    }
    (count >= 2).then(|| values.into())
}

fn is_skipped(text: &str) -> bool {
    text.is_empty() || text.starts_with('#')
}

/// Reads every point from `reader`.
///
/// A missing `z` defaults to `0.0`.
///
/// # Errors
///
/// - [`PointIoError::Io`] if reading fails.
/// - [`PointIoError::Parse`] for the first line that is not two or three finite
///   numbers.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::io::{Point3, read_points};
///
/// let points = read_points("# comment\n1 2 3\n\n4 5\n".as_bytes()).unwrap();
/// assert_eq!(points, vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 0.0)]);
///
/// assert!(read_points("1 2\nfoo bar\n".as_bytes()).is_err());
/// ```
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Point3>, PointIoError> {
    let mut points = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if is_skipped(text) {
            continue;
        }
        let point = parse_line(text).ok_or_else(|| PointIoError::Parse {
            line: index + 1,
            content: text.to_owned(),
        })?;
        points.push(point);
    }
    tracing::debug!(points = points.len(), "read point file");
    Ok(points)
}

/// Reads every point from `reader`, skipping malformed lines with a warning.
///
/// # Errors
///
/// Returns [`PointIoError::Io`] if reading fails.
pub fn read_points_lenient<R: BufRead>(reader: R) -> Result<Vec<Point3>, PointIoError> {
    let mut points = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if is_skipped(text) {
            continue;
        }
        if let Some(point) = parse_line(text) {
            points.push(point);
        } else {
            skipped += 1;
            tracing::warn!(line = index + 1, content = text, "skipping malformed point line");
        }
    }
    tracing::debug!(points = points.len(), skipped, "read point file");
    Ok(points)
}

/// Opens `path` and reads it with [`read_points`].
///
/// # Errors
///
/// Same as [`read_points`], plus [`PointIoError::Io`] if the file cannot be opened.
pub fn read_points_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Point3>, PointIoError> {
    let file = File::open(path.as_ref())?;
    read_points(BufReader::new(file))
}

// =============================================================================
// WRITING
// =============================================================================

/// Writes one `x y z` line per point, four decimals per coordinate.
///
/// Coordinates are rounded, so reading the file back only reproduces points
/// given to four decimals. Use [`write_points_exact`] for a lossless dump.
///
/// # Errors
///
/// Returns [`PointIoError::Io`] if writing fails.
pub fn write_points<W: Write>(mut writer: W, points: &[Point3]) -> Result<(), PointIoError> {
    for point in points {
        writeln!(writer, "{point}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one `x y z` line per point at full precision.
///
/// Each coordinate is the shortest decimal that parses back to the same `f64`,
/// so [`read_points`] restores the points exactly.
///
/// # Errors
///
/// Returns [`PointIoError::Io`] if writing fails.
pub fn write_points_exact<W: Write>(mut writer: W, points: &[Point3]) -> Result<(), PointIoError> {
    for point in points {
        writeln!(writer, "{} {} {}", point.x, point.y, point.z)?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes `points` with [`write_points`].
///
/// # Errors
///
/// Returns [`PointIoError::Io`] if the file cannot be created or written.
pub fn write_points_to_path<P: AsRef<Path>>(path: P, points: &[Point3]) -> Result<(), PointIoError> {
    let file = File::create(path.as_ref())?;
    write_points(BufWriter::new(file), points)?;
    tracing::debug!(path = %path.as_ref().display(), points = points.len(), "wrote point file");
    Ok(())
}
