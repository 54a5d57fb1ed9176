//! Action types for the frontend
//!
//! Panels render from borrowed state and return [`AppAction`]s for anything
//! that touches the scene. The app applies them in one place.

use crate::types::NodeId;

/// Actions that any panel can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Source
    /// Resolve a typed source path
    SetSourcePath(String),
    /// Use the first selected node as the source
    PickSource,
    ClearSource,
    /// Snapshot the source again
    Refresh,

    // Targets
    /// Append the selected nodes to the target list
    AddTargetsFromSelection,
    /// Remove target list entries by position
    RemoveTargets(Vec<usize>),
    ClearTargets,

    // Transfer
    /// Check preconditions and ask for confirmation
    RequestTransfer,

    // Scene
    /// Replace the network editor selection
    SelectNodes(Vec<NodeId>),
    /// Move the current frame
    SetFrame(f64),
}
