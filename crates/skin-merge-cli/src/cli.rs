//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use skin_merge::{MergeMode, MergeSettings};

/// Copy skin weights from base meshes onto an output mesh.
///
/// Every output vertex that sits on top of a base vertex (closer than
/// 0.001 units) takes that base vertex's influence weights.
#[derive(Debug, Parser)]
#[command(name = "skin-merge", version)]
pub struct Args {
    /// Scene document (JSON) to read.
    pub scene: PathBuf,

    /// Where to write the updated scene. Defaults to overwriting the input.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Base mesh to copy from; repeat for several. Overrides the scene's
    /// merge request.
    #[arg(long = "base", value_name = "MESH")]
    pub bases: Vec<String>,

    /// Mesh to copy onto. Overrides the scene's merge request.
    #[arg(long = "into", value_name = "MESH")]
    pub target: Option<String>,

    /// Search all base meshes at once instead of one after another.
    #[arg(long)]
    pub flatten: bool,

    /// Search output vertices on all cores.
    #[arg(long)]
    pub parallel: bool,
}

impl Args {
    /// Apply command-line overrides to the scene's settings.
    #[must_use]
    pub fn settings(&self, mut settings: MergeSettings) -> MergeSettings {
        if self.flatten {
            settings.mode = MergeMode::Flattened;
        }
        if self.parallel {
            settings.parallel = true;
        }
        settings
    }
}
