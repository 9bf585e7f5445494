//! # Point Cloud Example
//!
//! Runs the full preparation pipeline on a synthetic mask stack: threshold the
//! voxels, reduce them with k-means, split them into two groups and triangulate
//! each group's `xy` projection.
//!
//! Pass a point file (`x y [z]` per line) to use it instead of the synthetic
//! stack, and optionally the number of clusters:
//!
//! ```bash
//! cargo run --example point_cloud -- points.txt 25
//! ```

use delaunay2d::cluster::{VoxelStack, reduce, split_groups, threshold_stack};
use delaunay2d::io::{Point3, read_points_from_path, write_points, write_triangles};
use delaunay2d::prelude::*;
use std::io::stdout;

/// Two discs in each of four frames.
fn synthetic_stack() -> Result<VoxelStack, Box<dyn std::error::Error>> {
    let (frames, height, width) = (4, 48, 96);
    let mut stack = VoxelStack::zeros(frames, height, width);
    for z in 0..frames {
        for y in 0..height {
            for x in 0..width {
                let (cx, cy, r) = if x < width / 2 { (22, 24, 12) } else { (70, 20 + z, 9) };
                let (dx, dy) = (x.abs_diff(cx), y.abs_diff(cy));
                if dx * dx + dy * dy <= r * r {
                    stack.set(z, y, x, 1)?;
                }
            }
        }
    }
    Ok(stack)
}

fn triangulate(points: &[Point3]) -> Result<Vec<Triangle>, TriangulationError> {
    let mut tri = Triangulator::new(1000.0)?;
    tri.add_points(points.iter().map(Point3::to_xy))?;
    tri.finalize()?;
    Ok(tri.iterate_triangles().collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let cloud = match args.next() {
        Some(path) => read_points_from_path(path)?,
        None => threshold_stack(&synthetic_stack()?),
    };
    let k = match args.next() {
        Some(k) => k.parse()?,
        None => 25,
    };
    println!("{} input points, reducing to {k}", cloud.len());

    let reduced = reduce(&cloud, k)?;
    println!("\n# reduced points");
    write_points(stdout().lock(), &reduced)?;

    for (label, group) in split_groups(&reduced, 2)?.iter().enumerate() {
        let triangles = triangulate(group)?;
        println!(
            "\n# group {label}: {} points, {} triangles",
            group.len(),
            triangles.len()
        );
        write_triangles(stdout().lock(), triangles)?;
    }
    Ok(())
}
