//! Error types for the merge.

use skin_merge_core::MeshId;
use thiserror::Error;

/// Errors that abort a merge.
///
/// Write-back failures are not errors; they are collected per vertex in the
/// [`MergeReport`](crate::MergeReport).
#[derive(Debug, Error)]
pub enum MergeError<E: std::error::Error + 'static> {
    /// A host query failed while reading a mesh.
    #[error("failed to read mesh `{mesh}`: {source}")]
    Extract { mesh: MeshId, source: E },
}

impl<E: std::error::Error + 'static> MergeError<E> {
    /// The mesh that was being read when the host failed.
    #[must_use]
    pub fn mesh(&self) -> &MeshId {
        match self {
            Self::Extract { mesh, .. } => mesh,
        }
    }

    /// The host's own error.
    #[must_use]
    pub fn host_error(&self) -> &E {
        match self {
            Self::Extract { source, .. } => source,
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T, E> = Result<T, MergeError<E>>;
