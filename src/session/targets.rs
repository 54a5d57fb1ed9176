//! Target node list

use crate::scene::SceneApi;
use crate::types::NodeId;

/// Ordered, duplicate-free list of target nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    nodes: Vec<NodeId>,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append nodes not already listed; returns how many were added
    pub fn add(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> usize {
        let mut added = 0;
        for node in nodes {
            if !self.nodes.contains(&node) {
                self.nodes.push(node);
                added += 1;
            }
        }
        added
    }

    /// Remove the entries at the given list positions
    pub fn remove_at(&mut self, positions: &[usize]) {
        let mut index = 0;
        self.nodes.retain(|_| {
            let keep = !positions.contains(&index);
            index += 1;
            keep
        });
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Drop nodes that no longer exist in the scene
    ///
    /// Returns how many entries were removed.
    pub fn prune_stale(&mut self, scene: &dyn SceneApi) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| scene.node_exists(*node));
        let removed = before - self.nodes.len();
        if removed > 0 {
            tracing::debug!("Dropped {} stale target node(s)", removed);
        }
        removed
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Paths of the listed nodes; stale entries are skipped
    pub fn paths(&self, scene: &dyn SceneApi) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|node| scene.node_path(*node).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryNode, MemoryScene};

    #[test]
    fn test_add_skips_duplicates() {
        let mut list = TargetList::new();
        assert_eq!(list.add([NodeId(1), NodeId(2)]), 2);
        assert_eq!(list.add([NodeId(2), NodeId(3), NodeId(1)]), 1);
        assert_eq!(list.nodes(), &[NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_remove_at_positions() {
        let mut list = TargetList::new();
        list.add([NodeId(4), NodeId(5), NodeId(6), NodeId(7)]);
        list.remove_at(&[0, 2]);
        assert_eq!(list.nodes(), &[NodeId(5), NodeId(7)]);
        list.remove_at(&[1, 9]);
        assert_eq!(list.nodes(), &[NodeId(5)]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_prune_stale_nodes() {
        let mut scene = MemoryScene::new();
        let a = scene.add_node(MemoryNode::new("/obj/a"));
        let b = scene.add_node(MemoryNode::new("/obj/b"));
        let mut list = TargetList::new();
        list.add([a, b]);

        scene.remove_node(a);
        assert_eq!(list.paths(&scene), vec!["/obj/b".to_string()]);
        assert_eq!(list.prune_stale(&scene), 1);
        assert_eq!(list.nodes(), &[b]);
    }
}
