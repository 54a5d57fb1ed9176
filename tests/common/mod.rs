//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use parm_transfer::scene::MemoryScene;
use parm_transfer::snapshot::{load_parameters, ParameterDescriptor};
use parm_transfer::types::NodeId;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Snapshot a single named parameter of a node
pub fn descriptor(scene: &MemoryScene, node: NodeId, name: &str) -> ParameterDescriptor {
    load_parameters(scene, node)
        .expect("source node should load")
        .into_iter()
        .find(|d| d.name() == name)
        .unwrap_or_else(|| panic!("no parameter named {}", name))
}
