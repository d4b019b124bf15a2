//! JSON scene documents for [`MemoryHost`].
//!
//! A document lists meshes with their positions and optional skin binding,
//! plus the merge to run. Loading it builds a [`MemoryHost`]; after a merge
//! the document's weights can be refreshed from the host and saved again.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use skin_merge_core::{BindingId, InfluenceId, InfluenceWeight, MeshId};

use crate::host::SkinHost;
use crate::memory::{MemoryHost, MemoryHostError, vertex_handle};
use crate::merge::MergeSettings;

/// A complete scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub meshes: Vec<MeshDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeRequest>,
    #[serde(default)]
    pub settings: MergeSettings,
}

/// One mesh and, if skinned, its binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub name: MeshId,
    /// World-space positions in vertex index order.
    pub positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<SkinDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinDocument {
    pub binding: BindingId,
    pub influences: Vec<InfluenceId>,
    /// Per-vertex weights. Missing trailing rows mean empty lists.
    #[serde(default)]
    pub weights: Vec<Vec<InfluenceWeight>>,
}

/// Which meshes to merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub bases: Vec<MeshId>,
    pub output: MeshId,
}

impl SceneDocument {
    /// Build a host holding this scene.
    ///
    /// Weights are written through the host, so a row naming an influence
    /// outside its binding is rejected here. Mesh names must be unique.
    pub fn to_host(&self) -> Result<MemoryHost, MemoryHostError> {
        let mut host = MemoryHost::new();
        for mesh in &self.meshes {
            if host.contains_mesh(&mesh.name) {
                return Err(MemoryHostError::DuplicateMesh(mesh.name.clone()));
            }
            host.add_mesh(
                mesh.name.clone(),
                mesh.positions.iter().copied().map(DVec3::from_array),
            );
            let Some(skin) = &mesh.skin else {
                continue;
            };
            host.bind(
                mesh.name.clone(),
                skin.binding.clone(),
                skin.influences.iter().cloned(),
            )?;
            for (index, weights) in skin.weights.iter().enumerate() {
                host.set_influence_weights(
                    &skin.binding,
                    &vertex_handle(&mesh.name, index),
                    weights,
                )?;
            }
        }
        Ok(host)
    }

    /// Copy the current weights of every skinned mesh back from `host`.
    pub fn update_weights(&mut self, host: &MemoryHost) -> Result<(), MemoryHostError> {
        for mesh in &mut self.meshes {
            let Some(skin) = &mut mesh.skin else {
                continue;
            };
            skin.weights = (0..mesh.positions.len())
                .map(|index| host.weights(mesh.name.clone(), index).map(<[_]>::to_vec))
                .collect::<Result<_, _>>()?;
        }
        Ok(())
    }
}
