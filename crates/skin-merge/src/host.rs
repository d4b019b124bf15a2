//! The host collaborator interface.

use glam::DVec3;
use skin_merge_core::{BindingId, InfluenceWeight, MeshId, VertexId};

/// Access to a 3D host's meshes and skin bindings.
///
/// Everything the merge reads or writes goes through this trait, and the
/// host is always passed in explicitly. Reads take `&self`; the single
/// write takes `&mut self`, and the host is expected to serialize
/// access on its own side.
pub trait SkinHost {
    /// Error raised by the host. Its `Display` text is surfaced unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Vertex handles of a mesh in native index order.
    fn list_vertices(&self, mesh: &MeshId) -> Result<Vec<VertexId>, Self::Error>;

    /// World-space position of a vertex.
    fn world_position(&self, vertex: &VertexId) -> Result<DVec3, Self::Error>;

    /// Skin binding connected to the mesh's shape, if the mesh is skinned.
    fn skin_binding(&self, mesh: &MeshId) -> Result<Option<BindingId>, Self::Error>;

    /// Influences and weights bound to a vertex, in host order.
    fn influence_weights(
        &self,
        binding: &BindingId,
        vertex: &VertexId,
    ) -> Result<Vec<InfluenceWeight>, Self::Error>;

    /// Replace a vertex's influence weights.
    fn set_influence_weights(
        &mut self,
        binding: &BindingId,
        vertex: &VertexId,
        weights: &[InfluenceWeight],
    ) -> Result<(), Self::Error>;
}
