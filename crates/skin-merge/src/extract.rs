//! Snapshot extraction from a host.

use skin_merge_core::{MeshId, MeshSkinSnapshot, VertexRecord};

use crate::host::SkinHost;

/// Capture a mesh's vertex positions and skin weights.
///
/// Returns `Ok(None)` when the mesh has no skin binding; that is the normal
/// state of a mesh that has not been bound yet. Any host error aborts the
/// extraction and is returned as-is; no partial snapshot is produced.
pub fn extract<H: SkinHost + ?Sized>(
    host: &H,
    mesh: &MeshId,
) -> Result<Option<MeshSkinSnapshot>, H::Error> {
    let handles = host.list_vertices(mesh)?;

    let Some(binding) = host.skin_binding(mesh)? else {
        tracing::debug!(%mesh, "mesh has no skin binding");
        return Ok(None);
    };

    let mut vertices = Vec::with_capacity(handles.len());
    for id in handles {
        let position = host.world_position(&id)?;
        let influences = host.influence_weights(&binding, &id)?;
        vertices.push(VertexRecord {
            id,
            position,
            influences,
        });
    }

    tracing::debug!(
        %mesh,
        %binding,
        vertex_count = vertices.len(),
        "extracted skin snapshot"
    );

    Ok(Some(MeshSkinSnapshot::new(mesh.clone(), binding, vertices)))
}
