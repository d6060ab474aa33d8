mod common;

use ar_drawing_engine::engine::anchors::{AnchorCallback, AnchorId, PlaneAlignment, PlatformAnchor};
use ar_drawing_engine::tools::placement::freeform_transform;
use ar_drawing_engine::{PlacementMode, SceneCore, SceneEvent, ViewPhase};
use bevy::math::{Mat4, Vec2, Vec3};
use common::{ScriptedSession, prototype};

fn plane(identifier: u64, extent: Vec3, center: Vec3) -> PlatformAnchor {
    PlatformAnchor::plane(
        identifier,
        Mat4::IDENTITY,
        extent,
        center,
        PlaneAlignment::Horizontal,
    )
}

fn activated(session: &mut ScriptedSession) -> SceneCore {
    let mut core = SceneCore::default();
    core.view_lifecycle(ViewPhase::Activated, session);
    core
}

#[test]
fn placed_count_tracks_adds_minus_successful_undos() {
    let mut session = ScriptedSession::with_camera(Mat4::IDENTITY);
    let mut core = activated(&mut session);
    let lamp = prototype("lamp");
    core.select_prototype(&lamp);

    for _ in 0..3 {
        core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);
        core.dispatch(SceneEvent::PointerUp, &session);
    }
    assert!(core.undo_last());
    assert_eq!(core.status().placed_count, 2);

    assert!(core.undo_last());
    assert!(core.undo_last());
    assert!(!core.undo_last());
    assert_eq!(core.status().placed_count, 0);
}

#[test]
fn undo_on_empty_scene_changes_nothing() {
    let mut session = ScriptedSession::with_camera(Mat4::IDENTITY);
    let mut core = activated(&mut session);
    core.ingest(
        &AnchorCallback::Added(plane(1, Vec3::ONE, Vec3::ZERO)),
        &session,
    );
    let before = core.status();

    assert!(!core.undo_last());
    assert_eq!(core.status(), before);
}

#[test]
fn reset_empties_placed_and_overlay_lists() {
    let mut session = ScriptedSession::with_camera(Mat4::IDENTITY);
    let mut core = activated(&mut session);
    let lamp = prototype("lamp");
    core.select_prototype(&lamp);
    core.ingest(&AnchorCallback::Added(plane(1, Vec3::ONE, Vec3::ZERO)), &session);
    core.ingest(&AnchorCallback::Added(plane(2, Vec3::ONE, Vec3::ZERO)), &session);
    core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);

    core.reset(&mut session);

    let status = core.status();
    assert_eq!(status.placed_count, 0);
    assert_eq!(status.overlay_count, 0);
    let (_, options) = session.runs.last().unwrap();
    assert!(options.remove_existing_anchors);
}

#[test]
fn one_overlay_per_plane_between_detection_and_removal() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);

    let added = AnchorCallback::Added(plane(1, Vec3::ONE, Vec3::ZERO));
    core.ingest(&added, &session);
    core.ingest(&added, &session);
    core.ingest(
        &AnchorCallback::Updated(plane(1, Vec3::new(2.0, 0.0, 2.0), Vec3::ZERO)),
        &session,
    );
    assert_eq!(core.status().overlay_count, 1);

    core.ingest(&AnchorCallback::Removed(1), &session);
    core.ingest(&AnchorCallback::Removed(1), &session);
    assert_eq!(core.status().overlay_count, 0);
    assert!(core.store().overlay(AnchorId(1)).is_none());
}

#[test]
fn toggling_overlay_twice_restores_visibility() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);
    core.set_mode(PlacementMode::PlaneSnap, &mut session);
    core.ingest(&AnchorCallback::Added(plane(1, Vec3::ONE, Vec3::ZERO)), &session);
    core.ingest(&AnchorCallback::Added(plane(2, Vec3::ONE, Vec3::ZERO)), &session);

    let hidden = |core: &SceneCore| -> Vec<bool> {
        [AnchorId(1), AnchorId(2)]
            .iter()
            .map(|id| core.store().overlay_node(*id).unwrap().hidden)
            .collect()
    };
    let before = hidden(&core);
    assert_eq!(before, vec![false, false]);

    core.toggle_plane_overlay();
    assert_eq!(hidden(&core), vec![true, true]);
    core.toggle_plane_overlay();
    assert_eq!(hidden(&core), before);
}

#[test]
fn overlays_created_later_inherit_the_flag() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);
    assert!(!core.status().show_plane_overlay);

    core.ingest(&AnchorCallback::Added(plane(1, Vec3::ONE, Vec3::ZERO)), &session);
    assert!(core.store().overlay_node(AnchorId(1)).unwrap().hidden);

    core.toggle_plane_overlay();
    core.ingest(&AnchorCallback::Added(plane(2, Vec3::ONE, Vec3::ZERO)), &session);
    assert!(!core.store().overlay_node(AnchorId(2)).unwrap().hidden);
}

#[test]
fn plane_snap_drag_respects_minimum_distance() {
    let hit = Mat4::from_translation(Vec3::new(0.3, 0.0, -1.2));
    let mut session = ScriptedSession::with_hit(hit);
    let mut core = activated(&mut session);
    core.set_mode(PlacementMode::PlaneSnap, &mut session);
    let vase = prototype("vase");
    core.select_prototype(&vase);

    let first = core
        .dispatch(SceneEvent::PointerDown(Vec2::new(200.0, 300.0)), &session)
        .unwrap();
    assert_eq!(core.placed_world_transform(first), Some(hit));
    assert_eq!(core.status().placed_count, 1);

    // Squared distance 1000: below the threshold.
    assert!(core
        .dispatch(SceneEvent::PointerMove(Vec2::new(230.0, 310.0)), &session)
        .is_none());
    assert_eq!(core.status().placed_count, 1);

    // Squared distance 2000: places again.
    assert!(core
        .dispatch(SceneEvent::PointerMove(Vec2::new(240.0, 320.0)), &session)
        .is_some());
    assert_eq!(core.status().placed_count, 2);

    core.dispatch(SceneEvent::PointerUp, &session);
    assert!(core.last_place_point().is_none());
}

#[test]
fn freeform_places_just_in_front_of_the_camera() {
    let camera = Mat4::from_translation(Vec3::new(0.5, 1.4, 2.0));
    let mut session = ScriptedSession::with_camera(camera);
    let mut core = activated(&mut session);
    let cup = prototype("cup");
    core.select_prototype(&cup);

    let key = core
        .dispatch(SceneEvent::PointerDown(Vec2::new(12.0, 900.0)), &session)
        .unwrap();

    let expected = camera * Mat4::from_translation(Vec3::new(0.0, 0.0, -0.2));
    assert_eq!(core.placed_world_transform(key), Some(expected));
    assert_eq!(freeform_transform(camera, 0.2), expected);
    assert_eq!(core.status().placed_count, 1);
}

#[test]
fn detected_image_gets_selection_attached() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);
    core.set_mode(PlacementMode::ImageAttach, &mut session);
    let frame = prototype("frame");
    core.select_prototype(&frame);

    let image_pose = Mat4::from_translation(Vec3::new(1.0, 1.0, -2.0));
    let key = core
        .ingest(
            &AnchorCallback::Added(PlatformAnchor::image(9, image_pose, Some("poster".into()))),
            &session,
        )
        .unwrap();

    assert_eq!(core.store().placed_anchor(key), Some(AnchorId(9)));
    assert_eq!(core.placed_world_transform(key), Some(image_pose));

    // Pointer input never places in image mode.
    assert!(core
        .dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session)
        .is_none());
    assert_eq!(core.status().placed_count, 1);
}

#[test]
fn detected_image_without_selection_places_nothing() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);

    let placed = core.ingest(
        &AnchorCallback::Added(PlatformAnchor::image(9, Mat4::IDENTITY, None)),
        &session,
    );
    assert!(placed.is_none());
    assert_eq!(core.status().anchor_count, 1);
    assert_eq!(core.status().placed_count, 0);
}

#[test]
fn removed_image_anchor_leaves_objects_at_their_last_pose() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);
    let frame = prototype("frame");
    core.select_prototype(&frame);

    let pose = Mat4::from_translation(Vec3::new(0.0, 2.0, -1.0));
    let key = core
        .ingest(&AnchorCallback::Added(PlatformAnchor::image(4, pose, None)), &session)
        .unwrap();
    core.ingest(&AnchorCallback::Removed(4), &session);

    assert_eq!(core.store().placed_anchor(key), None);
    assert_eq!(core.placed_world_transform(key), Some(pose));
    assert_eq!(core.status().placed_count, 1);
}

#[test]
fn plane_overlay_follows_extent_and_center() {
    let mut session = ScriptedSession::default();
    let mut core = activated(&mut session);

    core.ingest(
        &AnchorCallback::Added(plane(1, Vec3::new(1.0, 0.0, 2.0), Vec3::ZERO)),
        &session,
    );
    let overlay = core.store().overlay(AnchorId(1)).unwrap();
    assert_eq!((overlay.width, overlay.depth), (1.0, 2.0));
    assert_eq!(overlay.opacity, 0.25);

    core.ingest(
        &AnchorCallback::Updated(plane(1, Vec3::new(1.5, 0.0, 2.0), Vec3::new(0.1, 0.0, 0.2))),
        &session,
    );
    let overlay = core.store().overlay(AnchorId(1)).unwrap();
    assert_eq!((overlay.width, overlay.depth), (1.5, 2.0));
    let position = core.store().overlay_node(AnchorId(1)).unwrap().translation();
    assert!(position.abs_diff_eq(Vec3::new(0.1, 0.0, 0.2), 1e-6));
}

#[test]
fn mode_change_reconfigures_without_purging() {
    let mut session = ScriptedSession::with_camera(Mat4::IDENTITY);
    let mut core = activated(&mut session);
    let lamp = prototype("lamp");
    core.select_prototype(&lamp);
    core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);

    core.set_mode(PlacementMode::ImageAttach, &mut session);
    core.set_mode(PlacementMode::PlaneSnap, &mut session);

    assert_eq!(session.runs.len(), 3);
    assert!(session.runs.iter().all(|(_, options)| !options.remove_existing_anchors));
    assert!(!session.runs[2].0.detects_images());
    assert_eq!(core.status().placed_count, 1);
}
