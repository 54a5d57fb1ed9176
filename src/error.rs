//! Error handling for parm-transfer
//!
//! This module defines the error type shared by the scene abstraction, the
//! transfer resolver and the configuration layer, plus a Result alias.

use crate::types::{ExpressionLanguage, NodeId};
use thiserror::Error;

/// Reasons a transfer batch refuses to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPrecondition {
    /// No source node has been chosen
    NoSource,
    /// No parameters are checked for transfer
    NoParameters,
    /// No target nodes have been chosen
    NoTargets,
}

impl BatchPrecondition {
    /// Title for the blocking notice shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            BatchPrecondition::NoSource => "No Source",
            BatchPrecondition::NoParameters => "Nothing Selected",
            BatchPrecondition::NoTargets => "No Targets",
        }
    }
}

impl std::fmt::Display for BatchPrecondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchPrecondition::NoSource => write!(f, "No source node selected."),
            BatchPrecondition::NoParameters => {
                write!(f, "No parameters selected for transfer.")
            }
            BatchPrecondition::NoTargets => write!(f, "No target nodes selected."),
        }
    }
}

/// Main error type for parm-transfer operations
#[derive(Error, Debug)]
pub enum ParmTransferError {
    /// A node handle or path no longer resolves
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The node has no parameter with this name
    #[error("Parameter '{name}' not found on node {node}")]
    ParmNotFound { node: NodeId, name: String },

    /// A parameter could not be evaluated
    #[error("Evaluation error on '{parm}': {message}")]
    Evaluation { parm: String, message: String },

    /// The parameter carries no expression
    #[error("Parameter '{0}' has no expression")]
    NoExpression(String),

    /// The host does not accept expressions in this language
    #[error("Expression language {language} is not supported on '{parm}'")]
    UnsupportedLanguage {
        parm: String,
        language: ExpressionLanguage,
    },

    /// Writes to a locked parameter are refused
    #[error("Parameter '{0}' is locked")]
    Locked(String),

    /// The value does not fit the parameter's template
    #[error("Type mismatch on '{parm}': expected {expected}, got {found}")]
    TypeMismatch {
        parm: String,
        expected: String,
        found: String,
    },

    /// The host refused a write
    #[error("Write error on '{parm}': {message}")]
    Write { parm: String, message: String },

    /// Reading or writing animation samples failed
    #[error("Keyframe error on '{parm}': {message}")]
    Keyframes { parm: String, message: String },

    /// Errors raised by the expression engine
    #[error("Script error: {0}")]
    Script(String),

    /// Errors related to configuration loading
    #[error("Configuration error: {0}")]
    Config(String),

    /// A batch could not start
    #[error("{0}")]
    Precondition(BatchPrecondition),

    /// There was nothing to pick from the host selection
    #[error("{0}")]
    NoSelection(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ParmTransferError>,
    },
}

impl ParmTransferError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ParmTransferError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a script error from a Rhai error
    pub fn from_rhai_error(err: Box<rhai::EvalAltResult>) -> Self {
        ParmTransferError::Script(err.to_string())
    }

    /// The batch precondition behind this error, looking through context
    pub fn precondition(&self) -> Option<BatchPrecondition> {
        match self {
            ParmTransferError::Precondition(p) => Some(*p),
            ParmTransferError::WithContext { source, .. } => source.precondition(),
            _ => None,
        }
    }
}

impl From<BatchPrecondition> for ParmTransferError {
    fn from(p: BatchPrecondition) -> Self {
        ParmTransferError::Precondition(p)
    }
}

/// Result type alias for parm-transfer operations
pub type Result<T> = std::result::Result<T, ParmTransferError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, Box<rhai::EvalAltResult>> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ParmTransferError::from_rhai_error(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ParmTransferError::from_rhai_error(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParmTransferError::Locked("tx".to_string());
        assert_eq!(err.to_string(), "Parameter 'tx' is locked");
    }

    #[test]
    fn test_error_with_context() {
        let err = ParmTransferError::NoExpression("ty".to_string());
        let with_ctx = err.with_context("Failed to copy expression");
        assert!(with_ctx.to_string().contains("Failed to copy expression"));
        assert!(with_ctx.to_string().contains("ty"));
    }

    #[test]
    fn test_parm_not_found_error() {
        let err = ParmTransferError::ParmNotFound {
            node: NodeId(7),
            name: "scale".to_string(),
        };
        assert!(err.to_string().contains("scale"));
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn test_precondition_through_context() {
        let err = ParmTransferError::from(BatchPrecondition::NoTargets).with_context("batch");
        assert_eq!(err.precondition(), Some(BatchPrecondition::NoTargets));
        assert_eq!(
            BatchPrecondition::NoParameters.to_string(),
            "No parameters selected for transfer."
        );
    }
}
