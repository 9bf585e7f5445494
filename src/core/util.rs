//! General helper utilities for the core data structures.

mod delaunay_validation;

pub use delaunay_validation::*;
