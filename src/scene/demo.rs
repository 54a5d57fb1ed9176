//! Ready-made demo network
//!
//! The desktop binary has no host application to attach to, so it starts on
//! this small network instead. It covers every parameter kind the transfer
//! logic distinguishes: plain values, animated channels, expressions,
//! unexpanded file paths, menus, toggles, ramps and locked targets.

use crate::types::{
    Expression, ExpressionLanguage, Interpolation, Keyframe, ParmTemplateType, ParmValue, Ramp,
    RampBasis,
};

use super::memory::{MemoryNode, MemoryParm, MemoryScene};

/// Value of `$HIP` in the demo scene
pub const DEMO_HIP: &str = "/home/artist/projects/shot010";

fn transform_parms(node: MemoryNode) -> MemoryNode {
    node.with_parm(MemoryParm::structural("xform", "Transform", ParmTemplateType::FolderSet))
        .with_parm(MemoryParm::menu("xOrd", "Transform Order", &["SRT", "STR", "RST", "RTS", "TSR", "TRS"], 0))
        .with_parm(MemoryParm::float("tx", "Translate X", 0.0))
        .with_parm(MemoryParm::float("ty", "Translate Y", 0.0))
        .with_parm(MemoryParm::float("tz", "Translate Z", 0.0))
        .with_parm(MemoryParm::float("rx", "Rotate X", 0.0))
        .with_parm(MemoryParm::float("ry", "Rotate Y", 0.0))
        .with_parm(MemoryParm::float("rz", "Rotate Z", 0.0))
        .with_parm(MemoryParm::float("scale", "Uniform Scale", 1.0))
        .with_parm(MemoryParm::structural("sepparm", "", ParmTemplateType::Separator))
        .with_parm(MemoryParm::toggle("invertxform", "Invert Transformation", false))
        .with_parm(MemoryParm::button("reload", "Reload"))
}

fn file_parms(node: MemoryNode) -> MemoryNode {
    node.with_parm(MemoryParm::string("file", "Geometry File", "default.bgeo"))
        .with_parm(MemoryParm::menu("missingframe", "Missing Frame", &["Report Error", "No Geometry"], 0))
        .with_parm(MemoryParm::int("loadtype", "Load", 0))
        .with_parm(MemoryParm::ramp(
            "falloff",
            "Falloff",
            Ramp::new(RampBasis::Linear, [(0.0, 0.0), (1.0, 1.0)]),
        ))
}

/// Build the demo network and select the first transform node
pub fn demo_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.set_variable("HIP", DEMO_HIP);
    scene.set_variable("JOB", "/home/artist/projects");

    let transform1 = scene.add_node(transform_parms(MemoryNode::new("/obj/geo1/transform1")));
    if let Some(parm) = scene.parm_mut(transform1, "tx") {
        parm.value = ParmValue::Float(4.5);
    }
    if let Some(parm) = scene.parm_mut(transform1, "ry") {
        parm.expression = Some(Expression::hscript("frame * 3.6"));
    }
    if let Some(parm) = scene.parm_mut(transform1, "scale") {
        parm.keyframes = vec![
            Keyframe::new(1.0, 0.5, Interpolation::Bezier),
            Keyframe::new(24.0, 2.0, Interpolation::Bezier),
            Keyframe::new(48.0, 1.0, Interpolation::Linear),
        ];
    }
    if let Some(parm) = scene.parm_mut(transform1, "xOrd") {
        parm.value = ParmValue::Int(3);
    }
    if let Some(parm) = scene.parm_mut(transform1, "invertxform") {
        parm.value = ParmValue::Toggle(true);
    }
    if let Some(parm) = scene.parm_mut(transform1, "rz") {
        parm.expression = Some(Expression::python("hou.frame() * 2"));
    }

    scene.add_node(
        transform_parms(MemoryNode::new("/obj/geo1/transform2"))
            .accepting(&[ExpressionLanguage::Hscript]),
    );

    let transform3 = scene.add_node(transform_parms(MemoryNode::new("/obj/geo2/transform3")));
    if let Some(parm) = scene.parm_mut(transform3, "tx") {
        parm.locked = true;
    }

    let file1 = scene.add_node(file_parms(MemoryNode::new("/obj/geo1/file1")));
    if let Some(parm) = scene.parm_mut(file1, "file") {
        parm.value = ParmValue::String("$HIP/tex.png".to_string());
    }
    if let Some(parm) = scene.parm_mut(file1, "falloff") {
        parm.value = ParmValue::Ramp(Ramp::new(
            RampBasis::Bezier,
            [(0.0, 1.0), (0.4, 0.8), (1.0, 0.0)],
        ));
    }
    scene.add_node(file_parms(MemoryNode::new("/obj/geo2/file2")));

    scene.select(&[transform1]);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneApi;

    #[test]
    fn test_demo_scene_layout() {
        let scene = demo_scene();
        assert_eq!(scene.nodes().count(), 5);
        let transform1 = scene.find_node("/obj/geo1/transform1").unwrap();
        assert_eq!(scene.selected_nodes(), vec![transform1]);
        assert!(scene.find_node("/obj/geo2/file2").is_some());
    }

    #[test]
    fn test_demo_file_path_expands() {
        let scene = demo_scene();
        let file1 = scene.find_node("/obj/geo1/file1").unwrap();
        let parm = scene.find_parameter(file1, "file").unwrap();
        assert_eq!(scene.raw_string(parm).unwrap(), "$HIP/tex.png");
        assert_eq!(
            scene.evaluate(parm).unwrap(),
            ParmValue::String(format!("{}/tex.png", DEMO_HIP))
        );
    }
}
