//! Host scene abstraction
//!
//! The transfer logic never talks to a host application directly. It goes
//! through [`SceneApi`], which exposes node lookup, parameter evaluation,
//! locking and keyframe access. [`MemoryScene`] is a complete in-process
//! implementation used by the desktop binary and by the tests.
//!
//! # Modules
//!
//! - [`memory`] - In-memory scene graph with expression evaluation and fault injection
//! - [`demo`] - A small ready-made network for the desktop binary

pub mod demo;
pub mod memory;

pub use memory::{MemoryNode, MemoryParm, MemoryScene, ParmFault};

use crate::error::Result;
use crate::types::{Expression, Keyframe, NodeId, ParmHandle, ParmInfo, ParmValue};

/// Unified interface to the host scene graph
///
/// All reads take `&self`; everything that mutates the scene takes
/// `&mut self`. Implementations provide their own consistency guarantees;
/// callers never lock anything beyond honoring [`SceneApi::is_locked`].
///
/// # Example
///
/// ```ignore
/// fn modified_names(scene: &dyn SceneApi, node: NodeId) -> Result<Vec<String>> {
///     let mut names = Vec::new();
///     for info in scene.list_parameters(node)? {
///         if !scene.is_at_default(info.handle)? {
///             names.push(info.name);
///         }
///     }
///     Ok(names)
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait SceneApi {
    /// Look up a node by its full path
    fn find_node(&self, path: &str) -> Option<NodeId>;

    /// Full path of a node, e.g. `/obj/geo1/transform1`
    fn node_path(&self, node: NodeId) -> Result<String>;

    /// Short name of a node (last path component)
    fn node_name(&self, node: NodeId) -> Result<String>;

    /// Whether the handle still refers to a live node
    fn node_exists(&self, node: NodeId) -> bool {
        self.node_path(node).is_ok()
    }

    /// Nodes currently selected in the host's network editor
    fn selected_nodes(&self) -> Vec<NodeId>;

    /// All parameters of a node in declaration order, structural ones included
    fn list_parameters(&self, node: NodeId) -> Result<Vec<ParmInfo>>;

    /// Find a parameter on a node by name
    fn find_parameter(&self, node: NodeId, name: &str) -> Option<ParmHandle>;

    /// Evaluate a parameter at the current time
    fn evaluate(&self, parm: ParmHandle) -> Result<ParmValue>;

    /// The unevaluated string form (unexpanded variables, expression text)
    fn raw_string(&self, parm: ParmHandle) -> Result<String>;

    /// Whether the parameter sits at its factory default
    fn is_at_default(&self, parm: ParmHandle) -> Result<bool>;

    /// Whether the parameter is driven by stored animation samples
    fn is_time_dependent(&self, parm: ParmHandle) -> Result<bool>;

    /// The attached expression; fails when none is attached
    fn expression(&self, parm: ParmHandle) -> Result<Expression>;

    /// Animation samples ordered by time
    fn keyframes(&self, parm: ParmHandle) -> Result<Vec<Keyframe>>;

    /// Whether the parameter is locked against edits
    fn is_locked(&self, parm: ParmHandle) -> Result<bool>;

    /// Set a plain value, replacing any expression or animation
    fn set(&mut self, parm: ParmHandle, value: ParmValue) -> Result<()>;

    /// Attach an expression in the given language
    fn set_expression(&mut self, parm: ParmHandle, expression: &Expression) -> Result<()>;

    /// Insert a keyframe, replacing one at the same time
    fn set_keyframe(&mut self, parm: ParmHandle, keyframe: &Keyframe) -> Result<()>;

    /// Remove every keyframe from the parameter
    fn delete_all_keyframes(&mut self, parm: ParmHandle) -> Result<()>;

    /// Open an undoable group; every edit until the matching
    /// [`SceneApi::end_undo_group`] undoes as one unit
    fn begin_undo_group(&mut self, _label: &str) {}

    /// Close the innermost undo group
    fn end_undo_group(&mut self) {}
}
