//! # Hexagon Triangulation Example
//!
//! Triangulates a regular hexagon and its center, printing the mesh after each
//! insertion and the final fan after finalization.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --example hexagon
//! ```

use delaunay2d::prelude::*;

fn print_mesh(tri: &Triangulator) {
    for (id, t) in tri.triangles_with_ids() {
        println!("  {id}: {} {} {}", t.p1(), t.p2(), t.p3());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=================================================================");
    println!("Hexagon + center, bounding half-width 15");
    println!("=================================================================");

    let mut tri = Triangulator::new(15.0)?;
    let hexagon = [
        (0.0, 5.0),
        (4.33, 2.5),
        (4.33, -2.5),
        (0.0, -5.0),
        (-4.33, -2.5),
        (-4.33, 2.5),
        (0.0, 0.0),
    ];

    for (x, y) in hexagon {
        let accepted = tri.add_point(x, y)?;
        println!(
            "\nadd_point({x}, {y}) -> {accepted}, {} triangles",
            tri.number_of_triangles()
        );
        print_mesh(&tri);
    }

    match tri.validate_delaunay() {
        Ok(()) => println!("\n✓ empty-circumcircle property holds"),
        Err(e) => println!("\n✗ {e}"),
    }

    let removed = tri.finalize()?;
    println!(
        "\nfinalize(): removed {removed}, {} triangles remain",
        tri.number_of_triangles()
    );
    print_mesh(&tri);
    Ok(())
}
