//! Collection types used by the mesh and the insertion path.
//!
//! # Storage Backend
//!
//! Triangles live in a [`slotmap::SlotMap`]: a growable vector of slots with an
//! internal free list. Removing a triangle frees its slot for the next insertion,
//! and the versioned [`TriangleKey`](crate::core::mesh::TriangleKey) makes a stale
//! key miss instead of aliasing the new occupant.
//!
//! # Small Buffers
//!
//! Cavities are small (bounded by local vertex degree), so the per-insertion
//! buffers are [`SmallVec`]s that stay on the stack for typical inputs.

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::core::edge::Edge;
use crate::core::mesh::TriangleKey;

/// Storage backend for the mesh.
///
/// [`Mesh`](crate::core::mesh::Mesh) keeps its map private and hands out
/// iterators instead.
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Stack-first vector for small working sets.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Inline capacity for cavity-sized buffers.
///
/// Interior insertions into a well-shaped mesh touch 3 to 8 triangles; 16 leaves
/// headroom before spilling to the heap.
pub const CAVITY_BUFFER_SIZE: usize = 16;

/// Keys of the triangles whose circumcircle contains the inserted point.
pub type BadTriangleBuffer = SmallBuffer<TriangleKey, CAVITY_BUFFER_SIZE>;

/// Boundary edges of a cavity.
pub type EdgeBuffer = SmallBuffer<Edge, CAVITY_BUFFER_SIZE>;
