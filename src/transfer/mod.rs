//! Transfer resolution
//!
//! Given a [`ParameterDescriptor`] from the source node and a target node,
//! [`TransferResolver`] decides how the parameter is copied and reports a
//! [`TransferOutcome`]. The first matching step wins:
//!
//! 1. The target has no parameter with the descriptor's name: **Failed**
//! 2. `skip_locked` and either side is locked: **Skipped**
//! 3. `copy_keyframes` and the source is animated: replace the target's
//!    keyframes with the source's
//! 4. `copy_expressions` and the source has an expression: copy text and
//!    language. If the target refuses it, continue with step 5
//! 5. Copy the plain value. Strings copy the raw unexpanded text, every
//!    other class copies the live evaluated value
//!
//! Each (target, parameter) pair is independent. A failing pair never stops
//! the caller from processing the next one.
//!
//! # Modules
//!
//! - [`batch`] - Runs the resolver over targets x parameters inside one undo group

pub mod batch;

pub use batch::{
    confirmation_prompt, run_batch, run_batch_with_progress, BatchProgress, BatchRequest,
    BatchSummary, FailureRecord, PROMPT_TARGET_LIMIT, UNDO_GROUP_LABEL,
};

use crate::error::{ParmTransferError, Result, ResultExt};
use crate::scene::SceneApi;
use crate::snapshot::ParameterDescriptor;
use crate::types::{NodeId, ParmHandle, ParmValue, TypeClass};
use serde::{Deserialize, Serialize};

/// What to copy and how to treat locked parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOptions {
    /// Copy attached expressions instead of their evaluated values
    pub copy_expressions: bool,
    /// Copy the full animation curve instead of the current frame's value
    pub copy_keyframes: bool,
    /// Leave pairs alone when either side is locked
    pub skip_locked: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            copy_expressions: true,
            copy_keyframes: true,
            skip_locked: true,
        }
    }
}

/// Classification of one (target, parameter) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferOutcome {
    Success,
    /// Left alone by policy; not an error
    Skipped,
    Failed,
}

/// How a successful pair was copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyStrategy {
    Keyframes,
    Expression,
    /// Unexpanded string text
    RawString,
    /// Evaluated value
    Value,
}

impl std::fmt::Display for CopyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyStrategy::Keyframes => write!(f, "keyframes"),
            CopyStrategy::Expression => write!(f, "expression"),
            CopyStrategy::RawString => write!(f, "raw string"),
            CopyStrategy::Value => write!(f, "value"),
        }
    }
}

/// Result of transferring one parameter to one target
#[derive(Debug)]
pub struct PairResult {
    pub outcome: TransferOutcome,
    /// Set when the outcome is `Success`
    pub strategy: Option<CopyStrategy>,
    /// Set when the outcome is `Failed`
    pub error: Option<ParmTransferError>,
}

impl PairResult {
    fn success(strategy: CopyStrategy) -> Self {
        Self {
            outcome: TransferOutcome::Success,
            strategy: Some(strategy),
            error: None,
        }
    }

    fn skipped() -> Self {
        Self {
            outcome: TransferOutcome::Skipped,
            strategy: None,
            error: None,
        }
    }

    fn failed(error: ParmTransferError) -> Self {
        Self {
            outcome: TransferOutcome::Failed,
            strategy: None,
            error: Some(error),
        }
    }
}

/// Resolves and applies single-parameter transfers against a scene
pub struct TransferResolver<'a> {
    scene: &'a mut dyn SceneApi,
    options: TransferOptions,
}

impl<'a> TransferResolver<'a> {
    pub fn new(scene: &'a mut dyn SceneApi, options: TransferOptions) -> Self {
        Self { scene, options }
    }

    /// Transfer one parameter to one target node
    pub fn transfer(&mut self, descriptor: &ParameterDescriptor, target: NodeId) -> PairResult {
        let Some(target_parm) = self.scene.find_parameter(target, descriptor.name()) else {
            return PairResult::failed(ParmTransferError::ParmNotFound {
                node: target,
                name: descriptor.name().to_string(),
            });
        };

        if self.options.skip_locked {
            match self.either_locked(descriptor.handle(), target_parm) {
                Ok(true) => return PairResult::skipped(),
                Ok(false) => {}
                Err(e) => return PairResult::failed(e),
            }
        }

        match self.apply(descriptor, target_parm) {
            Ok(strategy) => {
                tracing::debug!(
                    "Copied '{}' to {} as {}",
                    descriptor.name(),
                    target,
                    strategy
                );
                PairResult::success(strategy)
            }
            Err(e) => PairResult::failed(e),
        }
    }

    fn either_locked(&self, source: ParmHandle, target: ParmHandle) -> Result<bool> {
        Ok(self.scene.is_locked(target)? || self.scene.is_locked(source)?)
    }

    fn apply(&mut self, descriptor: &ParameterDescriptor, target: ParmHandle) -> Result<CopyStrategy> {
        let source = descriptor.handle();

        if self.options.copy_keyframes && descriptor.has_keyframes() {
            self.copy_keyframes(source, target)
                .with_context(|| format!("Failed to copy keyframes of '{}'", descriptor.name()))?;
            return Ok(CopyStrategy::Keyframes);
        }

        if self.options.copy_expressions && descriptor.has_expression() {
            match self.copy_expression(source, target) {
                Ok(()) => return Ok(CopyStrategy::Expression),
                Err(e) => tracing::debug!(
                    "Expression copy of '{}' refused, copying value instead: {}",
                    descriptor.name(),
                    e
                ),
            }
        }

        self.copy_value(descriptor.type_class(), source, target)
            .with_context(|| format!("Failed to copy value of '{}'", descriptor.name()))
    }

    fn copy_keyframes(&mut self, source: ParmHandle, target: ParmHandle) -> Result<()> {
        let keyframes = self.scene.keyframes(source)?;
        self.scene.delete_all_keyframes(target)?;
        for keyframe in &keyframes {
            self.scene.set_keyframe(target, keyframe)?;
        }
        Ok(())
    }

    fn copy_expression(&mut self, source: ParmHandle, target: ParmHandle) -> Result<()> {
        let expression = self.scene.expression(source)?;
        self.scene.set_expression(target, &expression)
    }

    fn copy_value(
        &mut self,
        type_class: TypeClass,
        source: ParmHandle,
        target: ParmHandle,
    ) -> Result<CopyStrategy> {
        match type_class {
            TypeClass::String => {
                let raw = self.scene.raw_string(source)?;
                self.scene.set(target, ParmValue::String(raw))?;
                Ok(CopyStrategy::RawString)
            }
            TypeClass::Ramp
            | TypeClass::Toggle
            | TypeClass::Menu
            | TypeClass::Numeric
            | TypeClass::Other => {
                let value = self.scene.evaluate(source)?;
                self.scene.set(target, value)?;
                Ok(CopyStrategy::Value)
            }
        }
    }
}

/// Transfer one parameter to one target node with the given options
pub fn transfer(
    scene: &mut dyn SceneApi,
    descriptor: &ParameterDescriptor,
    target: NodeId,
    options: TransferOptions,
) -> TransferOutcome {
    TransferResolver::new(scene, options)
        .transfer(descriptor, target)
        .outcome
}
