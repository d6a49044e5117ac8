use glam::Vec3;

/// Default grid density in cells per meter (~1 cm deduplication granularity).
pub const DEFAULT_GRID_DENSITY: f32 = 100.0;

/// Identifier of one voxel cell of the deduplication grid.
///
/// Each world coordinate is scaled by the grid density and rounded to the
/// nearest integer; two points share a key iff all three rounded coordinates
/// match. Keying the map on the full integer triple makes collisions between
/// distinct triples impossible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey(i32, i32, i32);

impl GridKey {
    /// Quantize a world-space point at the given grid density.
    #[inline]
    pub fn from_point(point: Vec3, density: f32) -> Self {
        Self(
            (point.x * density).round() as i32,
            (point.y * density).round() as i32,
            (point.z * density).round() as i32,
        )
    }
}
