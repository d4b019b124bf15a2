//! Distance and match threshold.

use glam::DVec3;

/// Maximum distance (exclusive) at which an output vertex is considered to
/// coincide with a base vertex.
///
/// Absolute, in scene units. Vertices farther away than this are assumed to
/// belong to a part of the output mesh the base mesh does not cover.
pub const MATCH_THRESHOLD: f64 = 0.001;

/// Euclidean distance between two world-space positions.
#[inline]
#[must_use]
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    a.distance(b)
}

/// Whether a nearest-vertex distance is close enough to copy weights.
#[inline]
#[must_use]
pub fn is_match(distance: f64) -> bool {
    distance < MATCH_THRESHOLD
}
