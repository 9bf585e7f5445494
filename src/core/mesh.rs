//! Indexed arena of live triangles.
//!
//! [`Mesh`] maps a monotonically increasing [`TriangleId`] to a [`Triangle`]. The
//! storage is a slot arena ([`StorageMap`]) addressed by [`TriangleKey`]; removed
//! slots go onto the arena's free list and are reused, while ids are never reused.
//!
//! | Operation | Cost |
//! |---|---|
//! | [`Mesh::insert`] | O(1) amortized |
//! | [`Mesh::remove`] | O(1) |
//! | [`Mesh::get`] | O(1) |
//! | iteration | O(slots) |
//!
//! The mesh has exactly one writer, the owning
//! [`Triangulator`](crate::core::triangulator::Triangulator).

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

use crate::core::collections::StorageMap;
use crate::core::triangle::Triangle;

new_key_type! {
    /// Arena handle of a live triangle.
    ///
    /// Keys are versioned: once a triangle is removed its key never resolves
    /// again, even after the slot is reused.
    pub struct TriangleKey;
}

/// Stable, monotonically increasing identifier assigned when a triangle is
/// inserted.
///
/// The two bounding triangles receive ids 0 and 1; every later triangle gets the
/// next value of the counter. Ids of removed triangles are never handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId(u64);

impl TriangleId {
    /// The raw counter value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct MeshEntry {
    id: TriangleId,
    triangle: Triangle,
}

/// Collection of live triangles.
///
/// # Examples
///
/// ```rust
/// use delaunay2d::core::mesh::Mesh;
/// use delaunay2d::core::triangle::Triangle;
/// use delaunay2d::geometry::point::Point;
///
/// let mut mesh = Mesh::new();
/// let t = Triangle::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0));
/// let (key, id) = mesh.insert(t);
/// assert_eq!(id.get(), 0);
/// assert_eq!(mesh.len(), 1);
/// assert_eq!(mesh.remove(key), Some(t));
/// assert!(mesh.is_empty());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    triangles: StorageMap<TriangleKey, MeshEntry>,
    next_id: u64,
}

impl Mesh {
    /// Creates an empty mesh whose first triangle will get id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triangle under a freshly allocated id.
    pub fn insert(&mut self, triangle: Triangle) -> (TriangleKey, TriangleId) {
        let id = TriangleId(self.next_id);
        self.next_id += 1;
        let key = self.triangles.insert(MeshEntry { id, triangle });
        tracing::trace!(%id, ?key, ?triangle, "mesh insert");
        (key, id)
    }

    /// Removes a triangle, returning it if the key was live.
    pub fn remove(&mut self, key: TriangleKey) -> Option<Triangle> {
        self.triangles.remove(key).map(|entry| entry.triangle)
    }

    /// Removes every triangle for which `keep` returns `false`.
    ///
    /// Returns the number of removed triangles.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Triangle) -> bool,
    {
        let before = self.triangles.len();
        self.triangles.retain(|_, entry| keep(&entry.triangle));
        before - self.triangles.len()
    }

    /// The triangle stored under `key`, if it is still live.
    #[must_use]
    pub fn get(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key).map(|entry| &entry.triangle)
    }

    /// The id of the triangle stored under `key`, if it is still live.
    #[must_use]
    pub fn id_of(&self, key: TriangleKey) -> Option<TriangleId> {
        self.triangles.get(key).map(|entry| entry.id)
    }

    /// `true` if `key` refers to a live triangle.
    #[must_use]
    pub fn contains_key(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    /// Number of live triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// `true` if the mesh holds no triangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The id the next inserted triangle will receive.
    #[must_use]
    pub const fn next_id(&self) -> TriangleId {
        TriangleId(self.next_id)
    }

    /// `(key, triangle)` pairs for every live triangle.
    pub fn iter(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter().map(|(key, entry)| (key, &entry.triangle))
    }

    /// `(id, triangle)` pairs for every live triangle.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> {
        self.triangles.values().map(|entry| (entry.id, &entry.triangle))
    }

    /// Every live triangle.
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.values().map(|entry| &entry.triangle)
    }

    /// Keys of every live triangle.
    pub fn keys(&self) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles.keys()
    }
}
