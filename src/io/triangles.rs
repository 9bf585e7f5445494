//! Writing triangle lists.

#![forbid(unsafe_code)]

use std::io::Write;

use crate::core::triangle::Triangle;
use crate::io::points::PointIoError;

/// Writes one triangle per line as `x1 y1 x2 y2 x3 y3`, four decimals each.
///
/// # Errors
///
/// Returns [`PointIoError::Io`] if writing fails.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::geometry::point::Point;
/// use delaunay2d::io::write_triangles;
///
/// let t = Triangle::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0));
/// let mut out = Vec::new();
/// write_triangles(&mut out, [t]).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "0.0000 0.0000 1.0000 0.0000 0.0000 1.0000\n"
/// );
/// ```
pub fn write_triangles<W, I>(mut writer: W, triangles: I) -> Result<(), PointIoError>
where
    W: Write,
    I: IntoIterator<Item = Triangle>,
{
    let mut count = 0_usize;
    for triangle in triangles {
        let (a, b, c) = triangle.as_tuple();
        writeln!(
            writer,
            "{:.4} {:.4} {:.4} {:.4} {:.4} {:.4}",
            a.x(),
            a.y(),
            b.x(),
            b.y(),
            c.x(),
            c.y()
        )?;
        count += 1;
    }
    writer.flush()?;
    tracing::debug!(triangles = count, "wrote triangle list");
    Ok(())
}

/// Serializes triangles as a JSON array of `[[x, y], [x, y], [x, y]]` entries.
///
/// # Errors
///
/// Returns [`PointIoError::Json`] if serialization fails.
pub fn triangles_to_json(triangles: &[Triangle]) -> Result<String, PointIoError> {
    Ok(serde_json::to_string(triangles)?)
}

/// Parses the output of [`triangles_to_json`].
///
/// # Errors
///
/// Returns [`PointIoError::Json`] if `json` is not a triangle list.
pub fn triangles_from_json(json: &str) -> Result<Vec<Triangle>, PointIoError> {
    Ok(serde_json::from_str(json)?)
}
