//! Transfer session
//!
//! [`TransferSession`] is the headless state behind the transfer panel: the
//! source node and its parameter table, the target list, the transfer
//! options and the status line. The frontend renders it and forwards user
//! input to it; every host access goes through a borrowed [`SceneApi`].
//!
//! A transfer is two steps. [`TransferSession::prepare_transfer`] checks the
//! preconditions and builds the confirmation prompt;
//! [`TransferSession::execute`] runs the confirmed batch.
//!
//! # Modules
//!
//! - [`table`] - Checkable, filterable parameter table
//! - [`targets`] - Target node list

pub mod table;
pub mod targets;

pub use table::{ParameterRow, ParameterTable};
pub use targets::TargetList;

use std::ops::ControlFlow;

use crate::error::{ParmTransferError, Result};
use crate::scene::SceneApi;
use crate::snapshot::{load_parameters, ParameterDescriptor};
use crate::transfer::{
    confirmation_prompt, run_batch_with_progress, BatchProgress, BatchRequest, BatchSummary,
    TransferOptions,
};
use crate::types::NodeId;

/// Status text shown while no source is loaded
pub const IDLE_STATUS: &str = "Select a source node to begin";

/// A validated batch waiting for confirmation
///
/// Options are not captured here: the batch runs with the session's options
/// as they are when it is executed.
#[derive(Debug, Clone)]
pub struct PendingTransfer {
    pub source: NodeId,
    pub parameters: Vec<ParameterDescriptor>,
    pub targets: Vec<NodeId>,
    /// Confirmation prompt text
    pub prompt: String,
}

/// Headless model of the transfer panel
#[derive(Debug, Clone)]
pub struct TransferSession {
    source: Option<NodeId>,
    /// Contents of the source path field
    source_path: String,
    source_path_invalid: bool,
    table: ParameterTable,
    targets: TargetList,
    options: TransferOptions,
    status: String,
}

impl Default for TransferSession {
    fn default() -> Self {
        Self::new(TransferOptions::default(), false)
    }
}

impl TransferSession {
    pub fn new(options: TransferOptions, show_only_modified: bool) -> Self {
        Self {
            source: None,
            source_path: String::new(),
            source_path_invalid: false,
            table: ParameterTable::new(show_only_modified),
            targets: TargetList::new(),
            options,
            status: IDLE_STATUS.to_string(),
        }
    }

    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// The last typed path did not resolve to a node
    pub fn source_path_invalid(&self) -> bool {
        self.source_path_invalid
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ParameterTable {
        &mut self.table
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetList {
        &mut self.targets
    }

    pub fn options(&self) -> TransferOptions {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut TransferOptions {
        &mut self.options
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selection_label(&self) -> String {
        self.table.selection_label()
    }

    /// Load a new source node, or clear the source with `None`
    ///
    /// The table is rebuilt from scratch and every row starts unchecked.
    pub fn set_source(&mut self, scene: &dyn SceneApi, node: Option<NodeId>) -> Result<()> {
        self.source_path_invalid = false;
        let Some(node) = node else {
            self.clear_source();
            return Ok(());
        };

        let path = scene.node_path(node)?;
        let descriptors = load_parameters(scene, node)?;
        self.source = Some(node);
        self.source_path = path;
        self.table.set_parameters(descriptors);
        self.update_loaded_status(scene, node);
        Ok(())
    }

    pub fn clear_source(&mut self) {
        self.source = None;
        self.source_path.clear();
        self.source_path_invalid = false;
        self.table.clear();
        self.status = IDLE_STATUS.to_string();
    }

    /// Resolve a typed path
    ///
    /// An empty path clears the source. A path that does not resolve keeps
    /// the current source and marks the field invalid.
    pub fn set_source_path(&mut self, scene: &dyn SceneApi, path: &str) -> Result<()> {
        let path = path.trim();
        if path.is_empty() {
            self.clear_source();
            return Ok(());
        }
        match scene.find_node(path) {
            Some(node) => self.set_source(scene, Some(node)),
            None => {
                tracing::debug!("Source path '{}' does not resolve", path);
                self.source_path = path.to_string();
                self.source_path_invalid = true;
                Err(ParmTransferError::NodeNotFound(path.to_string()))
            }
        }
    }

    /// Use the first selected node as the source
    pub fn pick_source_from_selection(&mut self, scene: &dyn SceneApi) -> Result<()> {
        let Some(&node) = scene.selected_nodes().first() else {
            return Err(ParmTransferError::NoSelection(
                "Please select a node in the network editor first.".to_string(),
            ));
        };
        self.set_source(scene, Some(node))
    }

    /// Snapshot the source again, keeping checked parameter names
    pub fn refresh(&mut self, scene: &dyn SceneApi) -> Result<()> {
        let Some(node) = self.source else {
            return Ok(());
        };
        if !scene.node_exists(node) {
            tracing::info!("Source node {} was removed", node);
            self.clear_source();
            return Ok(());
        }
        let descriptors = load_parameters(scene, node)?;
        self.table.reload(descriptors);
        self.update_loaded_status(scene, node);
        Ok(())
    }

    fn update_loaded_status(&mut self, scene: &dyn SceneApi, node: NodeId) {
        let name = scene.node_name(node).unwrap_or_else(|_| node.to_string());
        self.status = format!(
            "Loaded {} parameters from {} ({} modified)",
            self.table.len(),
            name,
            self.table.modified_count()
        );
        tracing::info!("{}", self.status);
    }

    /// Add every selected node to the targets; returns how many were new
    pub fn add_targets_from_selection(&mut self, scene: &dyn SceneApi) -> Result<usize> {
        let selected = scene.selected_nodes();
        if selected.is_empty() {
            return Err(ParmTransferError::NoSelection(
                "Please select one or more nodes in the network editor.".to_string(),
            ));
        }
        Ok(self.targets.add(selected))
    }

    /// Check preconditions and build the confirmation prompt
    ///
    /// Stale targets are pruned first. Nothing is written.
    pub fn prepare_transfer(&mut self, scene: &dyn SceneApi) -> Result<PendingTransfer> {
        self.targets.prune_stale(scene);

        let parameters: Vec<ParameterDescriptor> =
            self.table.checked_descriptors().cloned().collect();
        let request = BatchRequest {
            source: self.source,
            parameters: &parameters,
            targets: self.targets.nodes(),
            options: self.options,
        };
        let source = request.validate(scene)?;

        let source_path = scene.node_path(source)?;
        let prompt = confirmation_prompt(&source_path, parameters.len(), &self.targets.paths(scene));

        Ok(PendingTransfer {
            source,
            targets: self.targets.nodes().to_vec(),
            parameters,
            prompt,
        })
    }

    /// Run a confirmed batch and update the status line
    pub fn execute(
        &mut self,
        scene: &mut dyn SceneApi,
        pending: &PendingTransfer,
    ) -> Result<BatchSummary> {
        self.execute_with_progress(scene, pending, |_| ControlFlow::Continue(()))
    }

    pub fn execute_with_progress<F>(
        &mut self,
        scene: &mut dyn SceneApi,
        pending: &PendingTransfer,
        progress: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(BatchProgress) -> ControlFlow<()>,
    {
        let request = BatchRequest {
            source: Some(pending.source),
            parameters: &pending.parameters,
            targets: &pending.targets,
            options: self.options,
        };
        let summary = run_batch_with_progress(scene, &request, progress)?;
        self.status = summary.status_line();
        Ok(summary)
    }
}

/// Title and body of a user notice for an error
pub fn notice_for(error: &ParmTransferError) -> (&'static str, String) {
    match error {
        ParmTransferError::Precondition(p) => (p.title(), p.to_string()),
        ParmTransferError::NoSelection(message) => ("No Selection", message.clone()),
        ParmTransferError::NodeNotFound(path) => ("Node Not Found", format!("No node at '{}'.", path)),
        ParmTransferError::WithContext { source, .. } => notice_for(source),
        other => ("Error", other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchPrecondition;
    use crate::scene::{MemoryNode, MemoryParm, MemoryScene};
    use crate::types::{Interpolation, Keyframe, ParmValue};

    fn scene() -> (MemoryScene, NodeId, NodeId, NodeId) {
        let mut scene = MemoryScene::new();
        let src = scene.add_node(
            MemoryNode::new("/obj/geo1/transform1")
                .with_parm(MemoryParm::float("tx", "Translate X", 0.0).with_value(ParmValue::Float(4.5)))
                .with_parm(MemoryParm::float("ty", "Translate Y", 0.0)),
        );
        let a = scene.add_node(
            MemoryNode::new("/obj/geo1/transform2").with_parm(MemoryParm::float("tx", "Translate X", 0.0)),
        );
        let b = scene.add_node(
            MemoryNode::new("/obj/geo2/transform3").with_parm(MemoryParm::float("tx", "Translate X", 0.0)),
        );
        (scene, src, a, b)
    }

    #[test]
    fn test_idle_status() {
        let session = TransferSession::default();
        assert_eq!(session.status(), IDLE_STATUS);
        assert_eq!(session.selection_label(), "0 parameters selected");
    }

    #[test]
    fn test_load_source_by_path() {
        let (scene, src, _, _) = scene();
        let mut session = TransferSession::default();
        session.set_source_path(&scene, "  /obj/geo1/transform1 ").unwrap();
        assert_eq!(session.source(), Some(src));
        assert_eq!(session.status(), "Loaded 2 parameters from transform1 (1 modified)");

        let err = session.set_source_path(&scene, "/obj/nope").unwrap_err();
        assert!(matches!(err, ParmTransferError::NodeNotFound(_)));
        assert!(session.source_path_invalid());
        assert_eq!(session.source(), Some(src));

        session.set_source_path(&scene, "").unwrap();
        assert_eq!(session.source(), None);
        assert_eq!(session.status(), IDLE_STATUS);
        assert!(session.table().is_empty());
    }

    #[test]
    fn test_pick_from_empty_selection() {
        let (scene, _, _, _) = scene();
        let mut session = TransferSession::default();
        let err = session.pick_source_from_selection(&scene).unwrap_err();
        assert_eq!(notice_for(&err).0, "No Selection");
        assert!(session.add_targets_from_selection(&scene).is_err());
    }

    #[test]
    fn test_prepare_reports_preconditions() {
        let (mut scene, src, a, _) = scene();
        let mut session = TransferSession::default();

        let err = session.prepare_transfer(&scene).unwrap_err();
        assert_eq!(err.precondition(), Some(BatchPrecondition::NoSource));

        session.set_source(&scene, Some(src)).unwrap();
        let err = session.prepare_transfer(&scene).unwrap_err();
        assert_eq!(err.precondition(), Some(BatchPrecondition::NoParameters));

        session.table_mut().check_non_default();
        let err = session.prepare_transfer(&scene).unwrap_err();
        assert_eq!(notice_for(&err), ("No Targets", "No target nodes selected.".to_string()));

        scene.select(&[a]);
        session.add_targets_from_selection(&scene).unwrap();
        scene.remove_node(a);
        let err = session.prepare_transfer(&scene).unwrap_err();
        assert_eq!(err.precondition(), Some(BatchPrecondition::NoTargets));
    }

    #[test]
    fn test_full_workflow() {
        let (mut scene, src, a, b) = scene();
        let mut session = TransferSession::default();
        scene.select(&[src]);
        session.pick_source_from_selection(&scene).unwrap();
        session.table_mut().check_all_visible();

        scene.select(&[a, b, a]);
        assert_eq!(session.add_targets_from_selection(&scene).unwrap(), 2);

        let pending = session.prepare_transfer(&scene).unwrap();
        assert!(pending.prompt.starts_with("Transfer 2 parameters to 2 node(s)?"));
        assert!(pending.prompt.contains("Source: /obj/geo1/transform1\n"));

        let summary = session.execute(&mut scene, &pending).unwrap();
        // ty does not exist on the targets
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(session.status(), "Transferred 2 parameters to 2 node(s)");
        assert_eq!(scene.parm(b, "tx").unwrap().value, ParmValue::Float(4.5));
    }

    #[test]
    fn test_options_changed_after_prepare_apply() {
        let mut scene = MemoryScene::new();
        let src = scene.add_node(MemoryNode::new("/obj/src").with_parm(
            MemoryParm::float("scale", "Uniform Scale", 1.0).with_keyframes([
                Keyframe::new(1.0, 2.0, Interpolation::Linear),
                Keyframe::new(10.0, 4.0, Interpolation::Linear),
            ]),
        ));
        let dst = scene.add_node(
            MemoryNode::new("/obj/dst").with_parm(MemoryParm::float("scale", "Uniform Scale", 1.0)),
        );

        let mut session = TransferSession::default();
        session.set_source(&scene, Some(src)).unwrap();
        session.table_mut().check_all_visible();
        session.targets_mut().add([dst]);
        let pending = session.prepare_transfer(&scene).unwrap();

        session.options_mut().copy_keyframes = false;
        session.execute(&mut scene, &pending).unwrap();

        let parm = scene.parm(dst, "scale").unwrap();
        assert!(parm.keyframes.is_empty());
        assert_eq!(parm.value, ParmValue::Float(2.0));
    }

    #[test]
    fn test_refresh_after_source_removed() {
        let (mut scene, src, _, _) = scene();
        let mut session = TransferSession::default();
        session.set_source(&scene, Some(src)).unwrap();
        session.table_mut().set_checked("tx", true);

        scene.parm_mut(src, "ty").unwrap().value = ParmValue::Float(1.0);
        session.refresh(&scene).unwrap();
        assert_eq!(session.table().modified_count(), 2);
        assert_eq!(session.table().checked_count(), 1);

        scene.remove_node(src);
        session.refresh(&scene).unwrap();
        assert_eq!(session.source(), None);
        assert_eq!(session.status(), IDLE_STATUS);
    }
}
