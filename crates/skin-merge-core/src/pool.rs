//! Flattened candidate pool and nearest-vertex search.

use glam::DVec3;

use crate::distance::distance;
use crate::{MeshSkinSnapshot, VertexRecord};

/// Location of a candidate vertex: which base snapshot, and which vertex in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateRef {
    pub snapshot: usize,
    pub vertex: usize,
}

/// Result of a nearest-vertex query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub candidate: CandidateRef,
    pub distance: f64,
}

/// All base vertices, flattened in snapshot order and then vertex order.
///
/// Mesh boundaries do not matter to the search; the pool only remembers
/// them so a match can be traced back to its source.
#[derive(Debug, Clone)]
pub struct CandidatePool<'a> {
    snapshots: &'a [MeshSkinSnapshot],
    refs: Vec<CandidateRef>,
}

impl<'a> CandidatePool<'a> {
    #[must_use]
    pub fn new(snapshots: &'a [MeshSkinSnapshot]) -> Self {
        let refs = snapshots
            .iter()
            .enumerate()
            .flat_map(|(snapshot, snap)| {
                (0..snap.vertex_count()).map(move |vertex| CandidateRef { snapshot, vertex })
            })
            .collect();
        Self { snapshots, refs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    #[must_use]
    pub fn get(&self, candidate: CandidateRef) -> Option<&'a VertexRecord> {
        self.snapshots
            .get(candidate.snapshot)?
            .vertex(candidate.vertex)
    }

    /// Iterate candidates in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateRef, &'a VertexRecord)> + '_ {
        let snapshots = self.snapshots;
        self.refs
            .iter()
            .map(move |&r| (r, &snapshots[r.snapshot].vertices()[r.vertex]))
    }

    /// Find the candidate closest to `position`.
    ///
    /// Scans every candidate. When several share the minimum distance the
    /// first in pool order wins. A NaN distance never beats a number.
    /// Returns `None` only for an empty pool.
    #[must_use]
    pub fn nearest(&self, position: DVec3) -> Option<Nearest> {
        let mut best: Option<Nearest> = None;
        for (candidate, record) in self.iter() {
            let d = distance(position, record.position);
            let closer = match best {
                None => true,
                Some(current) => {
                    d < current.distance || (current.distance.is_nan() && !d.is_nan())
                }
            };
            if closer {
                best = Some(Nearest {
                    candidate,
                    distance: d,
                });
            }
        }
        best
    }
}
