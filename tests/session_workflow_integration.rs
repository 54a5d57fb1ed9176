//! Integration tests for the panel workflow
//!
//! These tests run whole batches through the session on the demo network:
//! - Source loading, filtering and checking
//! - Target management and stale node pruning
//! - Preconditions, confirmation and completion text
//! - Undo grouping and cancellation

mod common;

use std::ops::ControlFlow;

use common::builders::ScenarioBuilder;
use parm_transfer::error::BatchPrecondition;
use parm_transfer::scene::demo::demo_scene;
use parm_transfer::scene::{MemoryNode, MemoryParm};
use parm_transfer::session::{notice_for, TransferSession};
use parm_transfer::transfer::{TransferOptions, UNDO_GROUP_LABEL};
use parm_transfer::types::{Expression, ParmValue};
use parm_transfer::SceneApi;

#[test]
fn test_demo_transfer_to_two_targets() {
    let mut scene = demo_scene();
    let mut session = TransferSession::default();

    session.pick_source_from_selection(&scene).unwrap();
    assert_eq!(session.status(), "Loaded 10 parameters from transform1 (6 modified)");

    session.table_mut().set_filter("translate");
    session.table_mut().check_all_visible();
    session.table_mut().set_filter("");
    assert_eq!(session.selection_label(), "3 parameters selected");

    let transform2 = scene.find_node("/obj/geo1/transform2").unwrap();
    let transform3 = scene.find_node("/obj/geo2/transform3").unwrap();
    scene.select(&[transform2, transform3]);
    assert_eq!(session.add_targets_from_selection(&scene).unwrap(), 2);

    let pending = session.prepare_transfer(&scene).unwrap();
    assert_eq!(
        pending.prompt,
        "Transfer 3 parameters to 2 node(s)?\n\n\
         Source: /obj/geo1/transform1\n\
         Targets:\n  - /obj/geo1/transform2\n  - /obj/geo2/transform3\n"
    );

    let summary = session.execute(&mut scene, &pending).unwrap();
    // tx is locked on transform3
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        summary.completion_message(),
        "Transfer complete!\n\n✓ Transferred: 5\n⊘ Skipped: 1\n"
    );
    assert_eq!(session.status(), "Transferred 5 parameters to 2 node(s)");

    assert_eq!(scene.parm(transform2, "tx").unwrap().value, ParmValue::Float(4.5));
    assert_eq!(scene.parm(transform3, "tx").unwrap().value, ParmValue::Float(0.0));
    assert_eq!(scene.undo_groups(), [UNDO_GROUP_LABEL.to_string()]);
    assert_eq!(scene.open_undo_groups(), 0);
}

#[test]
fn test_demo_modified_parameters() {
    let mut scene = demo_scene();
    let mut session = TransferSession::default();
    session.pick_source_from_selection(&scene).unwrap();
    session.table_mut().check_non_default();

    let names: Vec<_> = session
        .table()
        .checked_descriptors()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(names, vec!["xOrd", "tx", "ry", "rz", "scale", "invertxform"]);

    let transform2 = scene.find_node("/obj/geo1/transform2").unwrap();
    session.targets_mut().add([transform2]);
    let pending = session.prepare_transfer(&scene).unwrap();
    let summary = session.execute(&mut scene, &pending).unwrap();

    // The Python expression on rz cannot be copied or evaluated on an
    // Hscript-only node
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].parameter, "rz");

    let ry = scene.parm(transform2, "ry").unwrap();
    assert_eq!(ry.expression, Some(Expression::hscript("frame * 3.6")));
    assert_eq!(scene.parm(transform2, "scale").unwrap().keyframes.len(), 3);
    assert_eq!(scene.parm(transform2, "xOrd").unwrap().value, ParmValue::Int(3));
}

#[test]
fn test_file_path_transfer_keeps_variable() {
    let mut scene = demo_scene();
    let mut session = TransferSession::default();
    session.set_source_path(&scene, "/obj/geo1/file1").unwrap();
    session.table_mut().set_checked("file", true);

    let file2 = scene.find_node("/obj/geo2/file2").unwrap();
    session.targets_mut().add([file2]);
    let pending = session.prepare_transfer(&scene).unwrap();
    session.execute(&mut scene, &pending).unwrap();

    let parm = scene.find_parameter(file2, "file").unwrap();
    assert_eq!(scene.raw_string(parm).unwrap(), "$HIP/tex.png");
}

#[test]
fn test_preconditions_in_order() {
    let mut scene = demo_scene();
    let mut session = TransferSession::default();

    let err = session.prepare_transfer(&scene).unwrap_err();
    assert_eq!(err.precondition(), Some(BatchPrecondition::NoSource));

    session.pick_source_from_selection(&scene).unwrap();
    let err = session.prepare_transfer(&scene).unwrap_err();
    assert_eq!(
        notice_for(&err),
        ("Nothing Selected", "No parameters selected for transfer.".to_string())
    );

    session.table_mut().check_non_default();
    let err = session.prepare_transfer(&scene).unwrap_err();
    assert_eq!(err.precondition(), Some(BatchPrecondition::NoTargets));

    // A target deleted after it was added counts as no target
    let file2 = scene.find_node("/obj/geo2/file2").unwrap();
    session.targets_mut().add([file2]);
    scene.remove_node(file2);
    let err = session.prepare_transfer(&scene).unwrap_err();
    assert_eq!(err.precondition(), Some(BatchPrecondition::NoTargets));
    assert!(session.targets().is_empty());
    assert!(scene.undo_groups().is_empty());
}

#[test]
fn test_cancelled_batch_closes_undo_group() {
    let mut s = ScenarioBuilder::new()
        .source_parm(MemoryParm::float("tx", "Translate X", 0.0).with_value(ParmValue::Float(2.0)))
        .source_parm(MemoryParm::float("ty", "Translate Y", 0.0).with_value(ParmValue::Float(3.0)))
        .target(
            MemoryNode::new("/obj/geo1/a")
                .with_parm(MemoryParm::float("tx", "Translate X", 0.0))
                .with_parm(MemoryParm::float("ty", "Translate Y", 0.0)),
        )
        .target(
            MemoryNode::new("/obj/geo1/b")
                .with_parm(MemoryParm::float("tx", "Translate X", 0.0))
                .with_parm(MemoryParm::float("ty", "Translate Y", 0.0)),
        )
        .build();

    let mut session = TransferSession::new(TransferOptions::default(), false);
    session.set_source(&s.scene, Some(s.source)).unwrap();
    session.table_mut().check_all_visible();
    session.targets_mut().add(s.targets.clone());

    let pending = session.prepare_transfer(&s.scene).unwrap();
    let summary = session
        .execute_with_progress(&mut s.scene, &pending, |p| {
            if p.target == s.targets[1] {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(s.scene.open_undo_groups(), 0);
    assert_eq!(s.scene.parm(s.targets[1], "tx").unwrap().value, ParmValue::Float(0.0));
}

#[test]
fn test_show_only_modified_from_options() {
    let scene = demo_scene();
    let mut session = TransferSession::new(TransferOptions::default(), true);
    session.set_source_path(&scene, "/obj/geo1/file1").unwrap();
    let visible: Vec<_> = session
        .table()
        .visible_rows()
        .map(|r| r.descriptor.name().to_string())
        .collect();
    assert_eq!(visible, vec!["file", "falloff"]);
    assert_eq!(session.status(), "Loaded 4 parameters from file1 (2 modified)");
}
