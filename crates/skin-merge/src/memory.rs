//! In-memory host.
//!
//! Holds meshes as plain position lists and skin bindings as per-vertex
//! influence lists. Vertex handles follow the `<mesh>.vtx[<index>]`
//! convention.

use std::collections::BTreeMap;

use glam::DVec3;
use skin_merge_core::{BindingId, InfluenceId, InfluenceWeight, MeshId, VertexId};
use thiserror::Error;

use crate::host::SkinHost;

/// Errors raised by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryHostError {
    #[error("no mesh named `{0}`")]
    UnknownMesh(MeshId),

    #[error("no vertex `{0}`")]
    UnknownVertex(VertexId),

    #[error("no skin binding named `{0}`")]
    UnknownBinding(BindingId),

    #[error("mesh `{0}` has no skin binding")]
    Unbound(MeshId),

    #[error("`{influence}` is not an influence of `{binding}`")]
    UnknownInfluence {
        binding: BindingId,
        influence: InfluenceId,
    },

    #[error("vertex `{vertex}` is not part of skin binding `{binding}`")]
    ForeignVertex {
        binding: BindingId,
        vertex: VertexId,
    },

    #[error("skin binding `{0}` is already attached to another mesh")]
    BindingInUse(BindingId),

    #[error("mesh `{0}` is defined more than once")]
    DuplicateMesh(MeshId),
}

#[derive(Debug, Clone)]
struct MeshEntry {
    positions: Vec<DVec3>,
    binding: Option<BindingId>,
}

#[derive(Debug, Clone)]
struct BindingEntry {
    mesh: MeshId,
    influences: Vec<InfluenceId>,
    weights: Vec<Vec<InfluenceWeight>>,
}

/// A scene kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    meshes: BTreeMap<MeshId, MeshEntry>,
    bindings: BTreeMap<BindingId, BindingEntry>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an unbound mesh.
    pub fn add_mesh(
        &mut self,
        mesh: impl Into<MeshId>,
        positions: impl IntoIterator<Item = DVec3>,
    ) -> &mut Self {
        let mesh = mesh.into();
        if let Some(old) = self.meshes.remove(&mesh)
            && let Some(binding) = old.binding
        {
            self.bindings.remove(&binding);
        }
        self.meshes.insert(
            mesh,
            MeshEntry {
                positions: positions.into_iter().collect(),
                binding: None,
            },
        );
        self
    }

    #[must_use]
    pub fn contains_mesh(&self, mesh: &MeshId) -> bool {
        self.meshes.contains_key(mesh)
    }

    /// Attach a skin binding with the given influences to a mesh.
    ///
    /// Every vertex starts with an empty influence list. Rebinding a mesh
    /// drops its previous binding.
    pub fn bind<I>(
        &mut self,
        mesh: impl Into<MeshId>,
        binding: impl Into<BindingId>,
        influences: I,
    ) -> Result<&mut Self, MemoryHostError>
    where
        I: IntoIterator,
        I::Item: Into<InfluenceId>,
    {
        let mesh = mesh.into();
        let binding = binding.into();

        if let Some(existing) = self.bindings.get(&binding)
            && existing.mesh != mesh
        {
            return Err(MemoryHostError::BindingInUse(binding));
        }

        let entry = self
            .meshes
            .get_mut(&mesh)
            .ok_or_else(|| MemoryHostError::UnknownMesh(mesh.clone()))?;
        if let Some(previous) = entry.binding.replace(binding.clone()) {
            self.bindings.remove(&previous);
        }

        let vertex_count = entry.positions.len();
        self.bindings.insert(
            binding,
            BindingEntry {
                mesh,
                influences: influences.into_iter().map(Into::into).collect(),
                weights: vec![Vec::new(); vertex_count],
            },
        );
        Ok(self)
    }

    /// Set one vertex's weights by mesh name and index.
    pub fn set_weights<I, N>(
        &mut self,
        mesh: impl Into<MeshId>,
        index: usize,
        weights: I,
    ) -> Result<&mut Self, MemoryHostError>
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<InfluenceId>,
    {
        let mesh = mesh.into();
        let binding = self
            .skin_binding(&mesh)?
            .ok_or_else(|| MemoryHostError::Unbound(mesh.clone()))?;
        let weights: Vec<_> = weights
            .into_iter()
            .map(|(influence, weight)| InfluenceWeight::new(influence, weight))
            .collect();
        self.set_influence_weights(&binding, &vertex_handle(&mesh, index), &weights)?;
        Ok(self)
    }

    /// Current weights of a vertex by mesh name and index.
    pub fn weights(
        &self,
        mesh: impl Into<MeshId>,
        index: usize,
    ) -> Result<&[InfluenceWeight], MemoryHostError> {
        let mesh = mesh.into();
        let entry = self.mesh(&mesh)?;
        let binding = entry
            .binding
            .as_ref()
            .ok_or_else(|| MemoryHostError::Unbound(mesh.clone()))?;
        let binding = self.binding(binding)?;
        binding
            .weights
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| MemoryHostError::UnknownVertex(vertex_handle(&mesh, index)))
    }

    /// Influence list of a binding.
    pub fn influences(&self, binding: &BindingId) -> Result<&[InfluenceId], MemoryHostError> {
        Ok(&self.binding(binding)?.influences)
    }

    fn mesh(&self, mesh: &MeshId) -> Result<&MeshEntry, MemoryHostError> {
        self.meshes
            .get(mesh)
            .ok_or_else(|| MemoryHostError::UnknownMesh(mesh.clone()))
    }

    fn binding(&self, binding: &BindingId) -> Result<&BindingEntry, MemoryHostError> {
        self.bindings
            .get(binding)
            .ok_or_else(|| MemoryHostError::UnknownBinding(binding.clone()))
    }

    fn resolve(&self, vertex: &VertexId) -> Result<(MeshId, usize), MemoryHostError> {
        let unknown = || MemoryHostError::UnknownVertex(vertex.clone());
        let (mesh, index) = parse_vertex_handle(vertex.as_str()).ok_or_else(unknown)?;
        let mesh = MeshId::from(mesh);
        let entry = self.meshes.get(&mesh).ok_or_else(unknown)?;
        if index >= entry.positions.len() {
            return Err(unknown());
        }
        Ok((mesh, index))
    }
}

/// Handle of vertex `index` on `mesh`.
#[must_use]
pub fn vertex_handle(mesh: &MeshId, index: usize) -> VertexId {
    VertexId::new(format!("{mesh}.vtx[{index}]"))
}

fn parse_vertex_handle(handle: &str) -> Option<(&str, usize)> {
    let (mesh, rest) = handle.rsplit_once(".vtx[")?;
    let index = rest.strip_suffix(']')?.parse().ok()?;
    Some((mesh, index))
}

impl SkinHost for MemoryHost {
    type Error = MemoryHostError;

    fn list_vertices(&self, mesh: &MeshId) -> Result<Vec<VertexId>, Self::Error> {
        let entry = self.mesh(mesh)?;
        Ok((0..entry.positions.len())
            .map(|index| vertex_handle(mesh, index))
            .collect())
    }

    fn world_position(&self, vertex: &VertexId) -> Result<DVec3, Self::Error> {
        let (mesh, index) = self.resolve(vertex)?;
        Ok(self.mesh(&mesh)?.positions[index])
    }

    fn skin_binding(&self, mesh: &MeshId) -> Result<Option<BindingId>, Self::Error> {
        Ok(self.mesh(mesh)?.binding.clone())
    }

    fn influence_weights(
        &self,
        binding: &BindingId,
        vertex: &VertexId,
    ) -> Result<Vec<InfluenceWeight>, Self::Error> {
        let entry = self.binding(binding)?;
        let (mesh, index) = self.resolve(vertex)?;
        if entry.mesh != mesh {
            return Err(MemoryHostError::ForeignVertex {
                binding: binding.clone(),
                vertex: vertex.clone(),
            });
        }
        Ok(entry.weights[index].clone())
    }

    fn set_influence_weights(
        &mut self,
        binding: &BindingId,
        vertex: &VertexId,
        weights: &[InfluenceWeight],
    ) -> Result<(), Self::Error> {
        let (mesh, index) = self.resolve(vertex)?;
        let entry = self
            .bindings
            .get_mut(binding)
            .ok_or_else(|| MemoryHostError::UnknownBinding(binding.clone()))?;
        if entry.mesh != mesh {
            return Err(MemoryHostError::ForeignVertex {
                binding: binding.clone(),
                vertex: vertex.clone(),
            });
        }
        if let Some(unknown) = weights
            .iter()
            .find(|w| !entry.influences.contains(&w.influence))
        {
            return Err(MemoryHostError::UnknownInfluence {
                binding: binding.clone(),
                influence: unknown.influence.clone(),
            });
        }
        entry.weights[index] = weights.to_vec();
        Ok(())
    }
}
