//! Nearest-vertex weight transfer.

use crate::distance::is_match;
use crate::pool::{CandidatePool, CandidateRef};
use crate::{InfluenceWeight, MeshSkinSnapshot, VertexId, VertexRecord};

/// Pending weight update for one output vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteInstruction {
    /// Index of the vertex in the output snapshot.
    pub output_index: usize,
    /// Host handle of the output vertex.
    pub vertex: VertexId,
    /// Influences copied verbatim from the matched base vertex.
    pub influences: Vec<InfluenceWeight>,
    /// Base vertex the influences came from.
    pub source: CandidateRef,
    /// Distance between the output vertex and its source.
    pub distance: f64,
}

/// Counts describing one transfer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub output_vertices: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// Compute weight copies from `bases` onto `output`.
///
/// All base snapshots are searched together as one pool. For each output
/// vertex, in index order, the nearest base vertex is found; if it lies
/// strictly within [`MATCH_THRESHOLD`](crate::MATCH_THRESHOLD) its influences
/// are copied, otherwise the vertex is left alone.
#[must_use]
pub fn transfer(bases: &[MeshSkinSnapshot], output: &MeshSkinSnapshot) -> Vec<WriteInstruction> {
    let pool = CandidatePool::new(bases);
    if pool.is_empty() {
        return Vec::new();
    }

    output
        .vertices()
        .iter()
        .enumerate()
        .filter_map(|(index, record)| instruction_for(&pool, index, record))
        .collect()
}

/// Parallel [`transfer`].
///
/// Output vertices are searched independently; the result is identical to
/// the sequential version, element for element.
#[cfg(feature = "rayon")]
#[must_use]
pub fn transfer_par(
    bases: &[MeshSkinSnapshot],
    output: &MeshSkinSnapshot,
) -> Vec<WriteInstruction> {
    use rayon::prelude::*;

    let pool = CandidatePool::new(bases);
    if pool.is_empty() {
        return Vec::new();
    }

    output
        .vertices()
        .par_iter()
        .enumerate()
        .filter_map(|(index, record)| instruction_for(&pool, index, record))
        .collect()
}

fn instruction_for(
    pool: &CandidatePool<'_>,
    output_index: usize,
    record: &VertexRecord,
) -> Option<WriteInstruction> {
    let nearest = pool.nearest(record.position)?;
    if !is_match(nearest.distance) {
        return None;
    }
    let source = pool.get(nearest.candidate)?;
    Some(WriteInstruction {
        output_index,
        vertex: record.id.clone(),
        influences: source.influences.clone(),
        source: nearest.candidate,
        distance: nearest.distance,
    })
}

/// Summarize the instructions produced for `output`.
#[must_use]
pub fn summarize(output: &MeshSkinSnapshot, instructions: &[WriteInstruction]) -> TransferSummary {
    let output_vertices = output.vertex_count();
    let matched = instructions.len();
    TransferSummary {
        output_vertices,
        matched,
        unmatched: output_vertices.saturating_sub(matched),
    }
}
