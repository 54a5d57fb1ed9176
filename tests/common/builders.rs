//! Test data builders for transfer scenarios

use parm_transfer::scene::{MemoryNode, MemoryParm, MemoryScene};
use parm_transfer::types::NodeId;

/// A scene with one source node and any number of targets
pub struct Scenario {
    pub scene: MemoryScene,
    pub source: NodeId,
    pub targets: Vec<NodeId>,
}

/// Builder for [`Scenario`]
pub struct ScenarioBuilder {
    source: MemoryNode,
    targets: Vec<MemoryNode>,
    variables: Vec<(String, String)>,
    frame: f64,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            source: MemoryNode::new("/obj/geo1/source"),
            targets: Vec::new(),
            variables: Vec::new(),
            frame: 1.0,
        }
    }

    /// Add a parameter to the source node
    pub fn source_parm(mut self, parm: MemoryParm) -> Self {
        self.source = self.source.with_parm(parm);
        self
    }

    /// Add a target node
    pub fn target(mut self, node: MemoryNode) -> Self {
        self.targets.push(node);
        self
    }

    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.variables.push((name.to_string(), value.to_string()));
        self
    }

    pub fn frame(mut self, frame: f64) -> Self {
        self.frame = frame;
        self
    }

    pub fn build(self) -> Scenario {
        let mut scene = MemoryScene::new();
        for (name, value) in &self.variables {
            scene.set_variable(name, value);
        }
        scene.set_frame(self.frame);
        let source = scene.add_node(self.source);
        let targets = self
            .targets
            .into_iter()
            .map(|node| scene.add_node(node))
            .collect();
        Scenario {
            scene,
            source,
            targets,
        }
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parm_transfer::SceneApi;

    #[test]
    fn test_scenario_builder() {
        let scenario = ScenarioBuilder::new()
            .source_parm(MemoryParm::float("tx", "Translate X", 0.0))
            .target(MemoryNode::new("/obj/geo1/target1"))
            .variable("HIP", "/tmp")
            .frame(12.0)
            .build();

        assert_eq!(scenario.targets.len(), 1);
        assert_eq!(scenario.scene.frame(), 12.0);
        assert!(scenario.scene.find_parameter(scenario.source, "tx").is_some());
    }
}
