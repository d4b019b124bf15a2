//! Best-effort weight write-back.
//!
//! A rejected write never stops the pass. Each instruction gets its own
//! [`WriteOutcome`], and the failures are handed back to the caller instead
//! of being dropped.

use skin_merge_core::{BindingId, VertexId, WriteInstruction};

use crate::host::SkinHost;

/// Result of writing one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// The host rejected the write; `reason` is its error text.
    Failed { reason: String },
}

impl WriteOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Outcome of one write instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexWrite {
    pub output_index: usize,
    pub vertex: VertexId,
    pub outcome: WriteOutcome,
}

/// Every outcome of one [`apply`] call, in instruction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    pub writes: Vec<VertexWrite>,
}

impl WriteReport {
    #[must_use]
    pub fn applied(&self) -> usize {
        self.writes.iter().filter(|w| w.outcome.is_applied()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &VertexWrite> {
        self.writes.iter().filter(|w| !w.outcome.is_applied())
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Write every instruction to `binding`, continuing past failures.
pub fn apply<H: SkinHost + ?Sized>(
    host: &mut H,
    binding: &BindingId,
    instructions: &[WriteInstruction],
) -> WriteReport {
    let writes = instructions
        .iter()
        .map(|instruction| {
            let outcome =
                match host.set_influence_weights(binding, &instruction.vertex, &instruction.influences)
                {
                    Ok(()) => {
                        tracing::trace!(
                            vertex = %instruction.vertex,
                            distance = instruction.distance,
                            "weights written"
                        );
                        WriteOutcome::Applied
                    }
                    Err(err) => {
                        tracing::warn!(
                            vertex = %instruction.vertex,
                            %binding,
                            error = %err,
                            "host rejected weight write"
                        );
                        WriteOutcome::Failed {
                            reason: err.to_string(),
                        }
                    }
                };
            VertexWrite {
                output_index: instruction.output_index,
                vertex: instruction.vertex.clone(),
                outcome,
            }
        })
        .collect();

    WriteReport { writes }
}
