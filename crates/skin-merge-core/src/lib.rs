//! Nearest-vertex skin weight transfer between mesh snapshots.
//!
//! This crate holds the host-independent half of a skin weight merge: the
//! snapshot data model, the distance function, and the transfer engine that
//! decides which output vertex receives which base vertex's weights. Reading
//! snapshots out of a 3D host and writing weights back lives in `skin-merge`.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **User-controlled parallelism**: The optional `rayon` feature adds
//!   [`transfer_par`]; nothing spawns threads otherwise
//! - **Deterministic**: Ties always resolve to the earliest candidate
//!
//! # Key functions
//!
//! - [`distance`]: Euclidean distance between two positions
//! - [`is_match`]: The strict [`MATCH_THRESHOLD`] policy
//! - [`CandidatePool::nearest`]: Exhaustive nearest-vertex search
//! - [`transfer`]: Produce write instructions for an output snapshot

mod distance;
mod ids;

pub mod pool;
pub mod transfer;

pub use distance::{MATCH_THRESHOLD, distance, is_match};
pub use ids::{BindingId, InfluenceId, MeshId, VertexId};
pub use pool::{CandidatePool, CandidateRef, Nearest};
#[cfg(feature = "rayon")]
pub use transfer::transfer_par;
pub use transfer::{TransferSummary, WriteInstruction, summarize, transfer};

use glam::DVec3;

/// One influence and its weight on a vertex.
///
/// Weights are passed through untouched; they are not clamped or
/// renormalized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfluenceWeight {
    pub influence: InfluenceId,
    pub weight: f64,
}

impl InfluenceWeight {
    pub fn new(influence: impl Into<InfluenceId>, weight: f64) -> Self {
        Self {
            influence: influence.into(),
            weight,
        }
    }
}

/// A vertex as captured from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    /// Host handle used to write weights back.
    pub id: VertexId,
    /// World-space position.
    pub position: DVec3,
    /// Influence list in host order.
    pub influences: Vec<InfluenceWeight>,
}

/// Immutable capture of a skinned mesh's vertex positions and weights.
///
/// Vertices are stored in the host's native index order, so the index of a
/// record is also the index of the vertex on the host mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSkinSnapshot {
    mesh: MeshId,
    binding: BindingId,
    vertices: Vec<VertexRecord>,
}

impl MeshSkinSnapshot {
    #[must_use]
    pub fn new(mesh: MeshId, binding: BindingId, vertices: Vec<VertexRecord>) -> Self {
        Self {
            mesh,
            binding,
            vertices,
        }
    }

    #[must_use]
    pub fn mesh(&self) -> &MeshId {
        &self.mesh
    }

    /// The skin binding the weights were read from.
    #[must_use]
    pub fn binding(&self) -> &BindingId {
        &self.binding
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&VertexRecord> {
        self.vertices.get(index)
    }
}
