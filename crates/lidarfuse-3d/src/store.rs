use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

use glam::{Vec3, Vec4};

use crate::grid::GridKey;

/// A colored point in world space. Immutable once inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in world coordinates (meters).
    pub position: Vec3,
    /// RGBA color with channels in [0, 1].
    pub color: Vec4,
}

/// The accumulated, deduplicated set of colored points, keyed by grid cell.
///
/// Single-writer, many-readers: all mutation goes through a [`PointStoreWriter`]
/// obtained from [`PointStore::writer`], which holds the write lock for the
/// duration of one frame's insert phase. Readers take consistent snapshots
/// that never alias live storage.
#[derive(Debug, Default)]
pub struct PointStore {
    points: RwLock<HashMap<GridKey, Vertex>>,
}

impl PointStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the writer role, blocking until concurrent readers release.
    pub fn writer(&self) -> PointStoreWriter<'_> {
        PointStoreWriter(lock_write(&self.points))
    }

    /// Insert a vertex unless its cell is already occupied.
    ///
    /// Returns `true` if the vertex was inserted. An occupied cell is left
    /// unchanged, first observation wins.
    pub fn insert_if_absent(&self, key: GridKey, vertex: Vertex) -> bool {
        self.writer().insert_if_absent(key, vertex)
    }

    /// Remove all points. Safe to call mid-capture; the next fusion pass
    /// starts from empty.
    pub fn clear(&self) {
        self.writer().clear();
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        match self.points.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out all vertices. Iteration order is unspecified.
    pub fn snapshot(&self) -> Vec<Vertex> {
        match self.points.read() {
            Ok(guard) => guard.values().copied().collect(),
            Err(poisoned) => poisoned.into_inner().values().copied().collect(),
        }
    }
}

fn lock_write(points: &RwLock<HashMap<GridKey, Vertex>>) -> RwLockWriteGuard<'_, HashMap<GridKey, Vertex>> {
    match points.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Exclusive write access to a [`PointStore`] for one frame's insert phase.
pub struct PointStoreWriter<'a>(RwLockWriteGuard<'a, HashMap<GridKey, Vertex>>);

impl PointStoreWriter<'_> {
    /// Check whether a cell is already occupied.
    #[inline]
    pub fn contains(&self, key: &GridKey) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a vertex unless its cell is already occupied; returns `true`
    /// if inserted.
    #[inline]
    pub fn insert_if_absent(&mut self, key: GridKey, vertex: Vertex) -> bool {
        use std::collections::hash_map::Entry;
        match self.0.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(vertex);
                true
            }
        }
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
