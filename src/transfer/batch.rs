//! Batch transfers
//!
//! A batch copies every checked parameter to every target node. It runs
//! synchronously on the calling thread inside a single host undo group, and
//! a failing pair never stops the remaining pairs. Outcomes are counted into
//! a [`BatchSummary`].
//!
//! An optional progress callback sees each pair before it is processed and
//! may stop the batch early; pairs already written stay written.

use std::ops::ControlFlow;

use crate::error::{BatchPrecondition, Result};
use crate::scene::SceneApi;
use crate::snapshot::ParameterDescriptor;
use crate::types::NodeId;

use super::{TransferOptions, TransferOutcome, TransferResolver};

/// Label of the undo group wrapping every batch
pub const UNDO_GROUP_LABEL: &str = "Parameter Transfer";

/// Number of target paths listed in the confirmation prompt
pub const PROMPT_TARGET_LIMIT: usize = 5;

/// Everything a batch needs
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    pub source: Option<NodeId>,
    pub parameters: &'a [ParameterDescriptor],
    pub targets: &'a [NodeId],
    pub options: TransferOptions,
}

impl BatchRequest<'_> {
    /// Check the preconditions in the order they are reported to the user
    pub fn validate(&self, scene: &dyn SceneApi) -> Result<NodeId> {
        let source = match self.source {
            Some(node) if scene.node_exists(node) => node,
            _ => return Err(BatchPrecondition::NoSource.into()),
        };
        if self.parameters.is_empty() {
            return Err(BatchPrecondition::NoParameters.into());
        }
        if self.targets.is_empty() {
            return Err(BatchPrecondition::NoTargets.into());
        }
        Ok(source)
    }

    /// Number of (target, parameter) pairs
    pub fn pair_count(&self) -> usize {
        self.parameters.len() * self.targets.len()
    }
}

/// Position within a running batch, handed to the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Pairs finished so far
    pub completed: usize,
    pub total: usize,
    pub target: NodeId,
}

/// Diagnostics for one failed pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub parameter: String,
    pub target: NodeId,
    pub message: String,
}

/// Aggregated outcome counts of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Number of target nodes in the batch
    pub target_count: usize,
    /// The progress callback stopped the batch early
    pub cancelled: bool,
    /// Kept for logs; user-facing text reports counts only
    pub failures: Vec<FailureRecord>,
}

impl BatchSummary {
    fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Success => self.succeeded += 1,
            TransferOutcome::Skipped => self.skipped += 1,
            TransferOutcome::Failed => self.failed += 1,
        }
    }

    /// Pairs processed
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Text of the completion notice
    pub fn completion_message(&self) -> String {
        let mut msg = if self.cancelled {
            "Transfer cancelled.\n\n".to_string()
        } else {
            "Transfer complete!\n\n".to_string()
        };
        msg.push_str(&format!("✓ Transferred: {}\n", self.succeeded));
        if self.skipped > 0 {
            msg.push_str(&format!("⊘ Skipped: {}\n", self.skipped));
        }
        if self.failed > 0 {
            msg.push_str(&format!("✗ Failed: {}\n", self.failed));
        }
        msg
    }

    /// One-line status after the batch
    pub fn status_line(&self) -> String {
        format!(
            "Transferred {} parameters to {} node(s)",
            self.succeeded, self.target_count
        )
    }
}

/// Text of the confirmation prompt shown before a batch
pub fn confirmation_prompt(
    source_path: &str,
    parameter_count: usize,
    target_paths: &[String],
) -> String {
    let mut msg = format!(
        "Transfer {} parameters to {} node(s)?\n\n",
        parameter_count,
        target_paths.len()
    );
    msg.push_str(&format!("Source: {}\n", source_path));
    msg.push_str("Targets:\n");
    for path in target_paths.iter().take(PROMPT_TARGET_LIMIT) {
        msg.push_str(&format!("  - {}\n", path));
    }
    if target_paths.len() > PROMPT_TARGET_LIMIT {
        msg.push_str(&format!(
            "  ... and {} more\n",
            target_paths.len() - PROMPT_TARGET_LIMIT
        ));
    }
    msg
}

/// Run a batch to completion
pub fn run_batch(scene: &mut dyn SceneApi, request: &BatchRequest<'_>) -> Result<BatchSummary> {
    run_batch_with_progress(scene, request, |_| ControlFlow::Continue(()))
}

/// Run a batch, asking `progress` before each pair whether to continue
pub fn run_batch_with_progress<F>(
    scene: &mut dyn SceneApi,
    request: &BatchRequest<'_>,
    mut progress: F,
) -> Result<BatchSummary>
where
    F: FnMut(BatchProgress) -> ControlFlow<()>,
{
    let source = request.validate(scene)?;
    let total = request.pair_count();

    tracing::info!(
        "Transferring {} parameters from {} to {} node(s)",
        request.parameters.len(),
        source,
        request.targets.len()
    );

    let mut summary = BatchSummary {
        target_count: request.targets.len(),
        ..BatchSummary::default()
    };

    scene.begin_undo_group(UNDO_GROUP_LABEL);
    {
        let mut resolver = TransferResolver::new(&mut *scene, request.options);

        'targets: for &target in request.targets {
            for descriptor in request.parameters {
                let position = BatchProgress {
                    completed: summary.total(),
                    total,
                    target,
                };
                if progress(position).is_break() {
                    summary.cancelled = true;
                    break 'targets;
                }

                let result = resolver.transfer(descriptor, target);
                summary.record(result.outcome);

                if let Some(error) = result.error {
                    tracing::warn!("Failed to transfer {}: {}", descriptor.name(), error);
                    summary.failures.push(FailureRecord {
                        parameter: descriptor.name().to_string(),
                        target,
                        message: error.to_string(),
                    });
                }
            }
        }
    }
    scene.end_undo_group();

    tracing::info!(
        "Transfer finished: {} transferred, {} skipped, {} failed{}",
        summary.succeeded,
        summary.skipped,
        summary.failed,
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    Ok(summary)
}
