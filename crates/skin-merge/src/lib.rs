//! Merge skin weights from base meshes onto an output mesh.
//!
//! This crate connects the transfer engine in [`skin_merge_core`] to a 3D
//! host. The host is reached only through the [`SkinHost`] trait and is
//! always passed in by the caller; [`MemoryHost`] is an in-memory
//! implementation for tests and offline use.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use skin_merge::{MemoryHost, MergeSettings, MeshId, merge};
//!
//! let mut host = MemoryHost::new();
//! host.add_mesh("body", [DVec3::ZERO]);
//! host.bind("body", "body_skinCluster", ["jointA"])?;
//! host.set_weights("body", 0, [("jointA", 1.0)])?;
//! host.add_mesh("hair", [DVec3::new(0.0, 0.0, 0.0005)]);
//! host.bind("hair", "hair_skinCluster", ["jointA"])?;
//!
//! let report = merge(
//!     &mut host,
//!     &[MeshId::from("body")],
//!     &MeshId::from("hair"),
//!     &MergeSettings::default(),
//! )?;
//! assert_eq!(report.applied(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Key functions
//!
//! - [`extract`]: Read a [`MeshSkinSnapshot`] from the host
//! - [`apply`]: Write instructions back, collecting per-vertex failures
//! - [`merge`]: Run the whole merge for a list of base meshes

mod error;
mod extract;
mod host;
mod memory;
mod merge;
#[cfg(feature = "serde")]
mod scene;
mod write;

pub use error::{MergeError, MergeResult};
pub use extract::extract;
pub use host::SkinHost;
pub use memory::{MemoryHost, MemoryHostError, vertex_handle};
pub use merge::{BaseReport, MergeMode, MergeReport, MergeSettings, WriteFailure, merge};
#[cfg(feature = "serde")]
pub use scene::{MergeRequest, MeshDocument, SceneDocument, SkinDocument};
pub use write::{VertexWrite, WriteOutcome, WriteReport, apply};

pub use skin_merge_core::{
    BindingId, InfluenceId, InfluenceWeight, MATCH_THRESHOLD, MeshId, MeshSkinSnapshot, VertexId,
    VertexRecord, WriteInstruction,
};
