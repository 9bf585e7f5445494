//! Text and JSON persistence.
//!
//! Point files hold one point per line as whitespace-separated `x y [z]`
//! coordinates. Blank lines and lines starting with `#` are ignored. Triangle
//! lists are written either as plain text, six coordinates per line, or as JSON.

pub mod points;
pub mod triangles;

pub use points::*;
pub use triangles::*;
