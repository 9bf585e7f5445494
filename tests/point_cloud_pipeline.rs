//! Mask stack → voxel points → k-means reduction → point file → triangulation.

#![allow(missing_docs)]

use delaunay2d::cluster::{KMeansConfigBuilder, VoxelStack, reduce_with, split_groups, threshold_stack};
use delaunay2d::io::{
    Point3, read_points, triangles_from_json, triangles_to_json, write_points, write_triangles,
};
use delaunay2d::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Two filled discs, one per half of a 3-frame 32×64 stack.
fn two_organ_stack() -> VoxelStack {
    let (frames, height, width) = (3, 32, 64);
    let mut stack = VoxelStack::zeros(frames, height, width);
    for z in 0..frames {
        for y in 0..height {
            for x in 0..width {
                let (cx, cy) = if x < width / 2 { (14, 16) } else { (48, 16) };
                let dx = x.abs_diff(cx);
                let dy = y.abs_diff(cy);
                if dx * dx + dy * dy <= 64 {
                    stack.set(z, y, x, 255).unwrap();
                }
            }
        }
    }
    stack
}

#[test]
fn mask_to_triangulation() {
    init_tracing();
    let voxels = threshold_stack(&two_organ_stack());
    assert!(voxels.len() > 100);
    assert!(voxels.iter().all(|p| p.z >= 0.0 && p.z < 3.0));

    let config = KMeansConfigBuilder::default().k(12).seed(0).build().unwrap();
    let reduced = reduce_with(&voxels, &config).unwrap();
    assert_eq!(reduced.len(), 12);

    // Persist and read back the reduced cloud.
    let mut file = Vec::new();
    write_points(&mut file, &reduced).unwrap();
    let reread = read_points(file.as_slice()).unwrap();
    assert_eq!(reread.len(), reduced.len());
    for (a, b) in reread.iter().zip(&reduced) {
        assert!(a.distance_squared(b) < 1e-8);
    }

    let mut tri = Triangulator::new(1000.0).unwrap();
    let accepted = tri.add_points(reread.iter().map(Point3::to_xy)).unwrap();
    assert!(accepted >= 3);
    assert!(tri.validate_delaunay().is_ok());
    tri.finalize().unwrap();
    assert!(tri.number_of_triangles() >= 1);

    let triangles: Vec<Triangle> = tri.iterate_triangles().collect();
    let mut text = Vec::new();
    write_triangles(&mut text, triangles.iter().copied()).unwrap();
    assert_eq!(String::from_utf8(text).unwrap().lines().count(), triangles.len());

    let json = triangles_to_json(&triangles).unwrap();
    assert_eq!(triangles_from_json(&json).unwrap(), triangles);
}

#[test]
fn split_separates_the_two_organs() {
    init_tracing();
    let voxels = threshold_stack(&two_organ_stack());
    let groups = split_groups(&voxels, 2).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), voxels.len());
    for group in &groups {
        let left = group[0].x < 32.0;
        assert!(group.iter().all(|p| (p.x < 32.0) == left));
    }
    assert_ne!(groups[0][0].x < 32.0, groups[1][0].x < 32.0);
}
