//! The merge entry point.

use skin_merge_core::{MeshId, MeshSkinSnapshot, VertexId, WriteInstruction, summarize};

use crate::error::{MergeError, MergeResult};
use crate::extract::extract;
use crate::host::SkinHost;
use crate::write::{WriteOutcome, WriteReport, apply};

/// How multiple base meshes are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MergeMode {
    /// Each base mesh is transferred on its own, in list order. An output
    /// vertex within range of several bases ends up with the weights of
    /// the last one.
    #[default]
    Sequential,
    /// All base meshes are searched together in one pass, so each output
    /// vertex takes the weights of the globally nearest base vertex. Exact
    /// ties go to the earlier base.
    Flattened,
}

/// Settings for [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeSettings {
    pub mode: MergeMode,
    /// Search output vertices in parallel. Ignored unless the `rayon`
    /// feature is enabled.
    pub parallel: bool,
}

/// Per-base counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseReport {
    pub mesh: MeshId,
    pub vertex_count: usize,
    /// Output vertices whose nearest base vertex was in range.
    pub matched: usize,
    pub applied: usize,
    pub failed: usize,
}

/// A write the host refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Base mesh the weights came from.
    pub base: MeshId,
    pub vertex: VertexId,
    pub reason: String,
}

/// What a [`merge`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// False when the output mesh has no skin binding; nothing was done.
    pub output_bound: bool,
    pub output_vertices: usize,
    /// Bound bases, in the order they were processed.
    pub bases: Vec<BaseReport>,
    /// Bases skipped because they have no skin binding.
    pub unbound_bases: Vec<MeshId>,
    pub failures: Vec<WriteFailure>,
}

impl MergeReport {
    /// Total successful writes. A vertex written by several bases counts once
    /// per write.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.bases.iter().map(|b| b.applied).sum()
    }

    #[must_use]
    pub fn matched(&self) -> usize {
        self.bases.iter().map(|b| b.matched).sum()
    }

    /// No bases were skipped and every write succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.output_bound && self.unbound_bases.is_empty() && self.failures.is_empty()
    }
}

/// Copy skin weights from `bases` onto `output`.
///
/// The output mesh is read once up front, then every base in order. If the
/// output has no skin binding nothing is written and the report has
/// `output_bound == false`; the bases are still read, so an invalid base
/// still fails the call. Bases without a binding are skipped. A failing host query aborts the merge
/// with [`MergeError::Extract`]; a rejected weight write does not, and is
/// listed in [`MergeReport::failures`] instead.
pub fn merge<H: SkinHost + ?Sized>(
    host: &mut H,
    bases: &[MeshId],
    output: &MeshId,
    settings: &MergeSettings,
) -> MergeResult<MergeReport, H::Error> {
    let Some(output_snapshot) = read(&*host, output)? else {
        let mut report = MergeReport::default();
        for base in bases {
            if read(&*host, base)?.is_none() {
                report.unbound_bases.push(base.clone());
            }
        }
        tracing::info!(%output, "output mesh has no skin binding, nothing to merge");
        return Ok(report);
    };

    tracing::info!(
        %output,
        bases = bases.len(),
        output_vertices = output_snapshot.vertex_count(),
        mode = ?settings.mode,
        "merging skin weights"
    );

    let mut report = MergeReport {
        output_bound: true,
        output_vertices: output_snapshot.vertex_count(),
        ..MergeReport::default()
    };

    match settings.mode {
        MergeMode::Sequential => {
            for base in bases {
                let Some(snapshot) = read(&*host, base)? else {
                    report.unbound_bases.push(base.clone());
                    continue;
                };
                run_pass(host, &mut report, &[snapshot], &output_snapshot, settings);
            }
        }
        MergeMode::Flattened => {
            let mut snapshots = Vec::with_capacity(bases.len());
            for base in bases {
                match read(&*host, base)? {
                    Some(snapshot) => snapshots.push(snapshot),
                    None => report.unbound_bases.push(base.clone()),
                }
            }
            run_pass(host, &mut report, &snapshots, &output_snapshot, settings);
        }
    }

    for skipped in &report.unbound_bases {
        tracing::debug!(base = %skipped, "skipped base mesh without skin binding");
    }

    tracing::info!(
        %output,
        matched = report.matched(),
        applied = report.applied(),
        failed = report.failures.len(),
        skipped = report.unbound_bases.len(),
        "Done"
    );

    Ok(report)
}

fn read<H: SkinHost + ?Sized>(
    host: &H,
    mesh: &MeshId,
) -> MergeResult<Option<MeshSkinSnapshot>, H::Error> {
    extract(host, mesh).map_err(|source| MergeError::Extract {
        mesh: mesh.clone(),
        source,
    })
}

/// Transfer `bases` onto `output`, write the result, and record it.
fn run_pass<H: SkinHost + ?Sized>(
    host: &mut H,
    report: &mut MergeReport,
    bases: &[MeshSkinSnapshot],
    output: &MeshSkinSnapshot,
    settings: &MergeSettings,
) {
    let instructions = compute(bases, output, settings.parallel);
    let summary = summarize(output, &instructions);
    tracing::debug!(
        bases = bases.len(),
        matched = summary.matched,
        unmatched = summary.unmatched,
        "transfer pass"
    );
    let written = apply(host, output.binding(), &instructions);
    record(report, bases, &instructions, &written);
}

#[cfg(feature = "rayon")]
fn compute(
    bases: &[MeshSkinSnapshot],
    output: &MeshSkinSnapshot,
    parallel: bool,
) -> Vec<WriteInstruction> {
    if parallel {
        skin_merge_core::transfer_par(bases, output)
    } else {
        skin_merge_core::transfer(bases, output)
    }
}

#[cfg(not(feature = "rayon"))]
fn compute(
    bases: &[MeshSkinSnapshot],
    output: &MeshSkinSnapshot,
    _parallel: bool,
) -> Vec<WriteInstruction> {
    skin_merge_core::transfer(bases, output)
}

/// Fold one transfer pass into the report, attributing each instruction to
/// the base it came from.
fn record(
    report: &mut MergeReport,
    snapshots: &[MeshSkinSnapshot],
    instructions: &[WriteInstruction],
    written: &WriteReport,
) {
    let first = report.bases.len();
    report
        .bases
        .extend(snapshots.iter().map(|snapshot| BaseReport {
            mesh: snapshot.mesh().clone(),
            vertex_count: snapshot.vertex_count(),
            matched: 0,
            applied: 0,
            failed: 0,
        }));

    for (instruction, write) in instructions.iter().zip(&written.writes) {
        let base = &mut report.bases[first + instruction.source.snapshot];
        base.matched += 1;
        match &write.outcome {
            WriteOutcome::Applied => base.applied += 1,
            WriteOutcome::Failed { reason } => {
                base.failed += 1;
                report.failures.push(WriteFailure {
                    base: base.mesh.clone(),
                    vertex: write.vertex.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }
}
