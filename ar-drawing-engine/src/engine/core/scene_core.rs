use std::sync::Arc;

use bevy::log::{debug, info};
use bevy::math::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

use crate::engine::anchors::{AnchorCallback, AnchorEventAdapter, AnchorKind, TrackedAnchor};
use crate::engine::events::SceneEvent;
use crate::engine::mode::PlacementMode;
use crate::engine::scene::{
    NodeKey, ParentRef, PlaneOverlaySynchronizer, Prototype, SceneStore, SelectedPrototype,
};
use crate::engine::session::{SessionConfigManager, SessionState, TrackingSession};
use crate::engine::settings::EngineSettings;
use crate::tools::animation::{AnimationCommand, apply_animation_command};
use crate::tools::placement::{PlacementPolicy, PlacementRequest};

use super::status::SceneStatus;

/// Host view lifecycle phases that drive the tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Activated,
    Appeared,
    Disappeared,
}

/// The scene-anchor synchronisation core.
///
/// Owns the scene store and every component that writes to it. All input
/// arrives as discrete calls on one thread: anchor callbacks and pointer
/// gestures through `dispatch`, options commands through the named methods.
#[derive(Debug)]
pub struct SceneCore {
    store: SceneStore,
    overlays: PlaneOverlaySynchronizer,
    placement: PlacementPolicy,
    session: SessionConfigManager,
    adapter: AnchorEventAdapter,
    selection: SelectedPrototype,
    mode: PlacementMode,
}

impl Default for SceneCore {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}

impl SceneCore {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            store: SceneStore::new(),
            overlays: PlaneOverlaySynchronizer::new(settings.overlay_opacity, settings.overlay_colour),
            placement: PlacementPolicy::from_settings(settings),
            session: SessionConfigManager::new(
                settings.plane_detection,
                settings.reference_image_group.clone(),
            ),
            adapter: AnchorEventAdapter::new(),
            selection: SelectedPrototype::none(),
            mode: PlacementMode::default(),
        }
    }

    /// Apply one scene event. Returns the node of an object placed as a
    /// result, if any.
    pub fn dispatch(&mut self, event: SceneEvent, session: &dyn TrackingSession) -> Option<NodeKey> {
        match event {
            SceneEvent::AnchorAdded(anchor) => self.anchor_added(&anchor),
            SceneEvent::AnchorUpdated(anchor) => {
                self.anchor_updated(&anchor);
                None
            }
            SceneEvent::AnchorRemoved(id) => {
                if self.store.remove_anchor(id) {
                    debug!("{} removed", id);
                } else {
                    debug!("removal of untracked {}, ignored", id);
                }
                None
            }
            SceneEvent::PointerDown(point) => {
                let request = self
                    .placement
                    .pointer_down(point, self.mode, &self.selection, session)?;
                self.place(request)
            }
            SceneEvent::PointerMove(point) => {
                let request = self
                    .placement
                    .pointer_move(point, self.mode, &self.selection, session)?;
                self.place(request)
            }
            SceneEvent::PointerUp => {
                self.placement.pointer_up();
                None
            }
        }
    }

    /// Normalise a raw tracking callback and dispatch it.
    pub fn ingest(&mut self, callback: &AnchorCallback, session: &dyn TrackingSession) -> Option<NodeKey> {
        let event = self.adapter.translate(callback)?;
        self.dispatch(event, session)
    }

    fn anchor_added(&mut self, anchor: &TrackedAnchor) -> Option<NodeKey> {
        if self.store.anchor_node(anchor.id).is_some() {
            debug!("{} already tracked, treated as update", anchor.id);
            self.anchor_updated(anchor);
            return None;
        }
        self.store.register_anchor(anchor)?;

        match &anchor.kind {
            AnchorKind::Plane(plane) => {
                self.overlays.on_detected(&mut self.store, anchor.id, plane);
                None
            }
            AnchorKind::Image { reference_name } => {
                debug!(
                    "image {} detected ({})",
                    anchor.id,
                    reference_name.as_deref().unwrap_or("unnamed")
                );
                let Some(prototype) = self.selection.get() else {
                    debug!("nothing selected, {} left empty", anchor.id);
                    return None;
                };
                self.store
                    .add_object(&prototype, ParentRef::Anchor(anchor.id), prototype.transform)
            }
        }
    }

    fn anchor_updated(&mut self, anchor: &TrackedAnchor) {
        if self.store.update_anchor_pose(anchor.id, anchor.pose).is_none() {
            debug!("update for untracked {}, ignored", anchor.id);
            return;
        }
        if let Some(plane) = anchor.as_plane() {
            self.overlays.on_updated(&mut self.store, anchor.id, plane);
        }
    }

    fn place(&mut self, request: PlacementRequest) -> Option<NodeKey> {
        self.store
            .add_object(&request.prototype, ParentRef::Root, request.transform)
    }

    // Options

    pub fn select_prototype(&mut self, prototype: &Arc<Prototype>) {
        self.selection = SelectedPrototype::of(prototype);
        info!("Selected prototype '{}'", prototype.name);
    }

    pub fn clear_selection(&mut self) {
        self.selection = SelectedPrototype::none();
        debug!("Selection cleared");
    }

    pub fn selection(&self) -> &SelectedPrototype {
        &self.selection
    }

    /// Flip overlay visibility. Returns the new flag.
    pub fn toggle_plane_overlay(&mut self) -> bool {
        let visible = self.store.toggle_overlay_visible();
        info!("Plane overlay {}", if visible { "shown" } else { "hidden" });
        visible
    }

    pub fn undo_last(&mut self) -> bool {
        let undone = self.store.undo_last().is_some();
        if !undone {
            debug!("nothing to undo");
        }
        undone
    }

    /// Purge everything and restart tracking without anchors.
    pub fn reset(&mut self, session: &mut dyn TrackingSession) {
        self.session
            .reconfigure(self.mode, true, &mut self.store, session);
        self.adapter.clear();
        self.placement.pointer_up();
    }

    /// Switch placement mode. Applies the mode's overlay visibility and
    /// reconfigures tracking, keeping anchors and objects.
    pub fn set_mode(&mut self, mode: PlacementMode, session: &mut dyn TrackingSession) {
        self.mode = mode;
        self.store.set_overlay_visible(mode.shows_plane_overlay());
        self.placement.pointer_up();
        info!("Placement mode set to {}", mode.as_str());
        self.session
            .reconfigure(self.mode, false, &mut self.store, session);
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    /// Apply an animation command to the most recent placement.
    pub fn animation_control(&mut self, command: AnimationCommand) -> bool {
        let Some(object) = self.store.last_placed_mut() else {
            debug!("no placed object to animate");
            return false;
        };
        apply_animation_command(object, command)
    }

    pub fn view_lifecycle(&mut self, phase: ViewPhase, session: &mut dyn TrackingSession) {
        match phase {
            ViewPhase::Activated | ViewPhase::Appeared => {
                self.session
                    .reconfigure(self.mode, false, &mut self.store, session);
            }
            ViewPhase::Disappeared => self.session.pause(session),
        }
    }

    // Observation

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn last_place_point(&self) -> Option<Vec2> {
        self.placement.last_place_point()
    }

    /// World transform of a placed object.
    pub fn placed_world_transform(&self, key: NodeKey) -> Option<Mat4> {
        self.store.world_transform(key)
    }

    pub fn status(&self) -> SceneStatus {
        SceneStatus {
            mode: self.mode,
            show_plane_overlay: self.store.show_plane_overlay(),
            placed_count: self.store.placed_count(),
            overlay_count: self.store.overlay_count(),
            anchor_count: self.store.anchor_count(),
            session: self.session.state(),
            selected_prototype: self.selection.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{Quat, Vec3};

    use super::*;
    use crate::engine::anchors::{PlaneAlignment, PlatformAnchor};
    use crate::engine::scene::SharedGeometry;
    use crate::engine::session::SimulatedSession;

    fn chair() -> Arc<Prototype> {
        Arc::new(
            Prototype::new(
                "chair",
                SharedGeometry {
                    mesh: "chair.mesh".into(),
                    material: "oak".into(),
                },
            )
            .with_animation("rock", 2.0),
        )
    }

    fn started() -> (SceneCore, SimulatedSession) {
        let mut core = SceneCore::default();
        let mut session = SimulatedSession::new(Vec2::new(100.0, 100.0), 1.0);
        core.view_lifecycle(ViewPhase::Activated, &mut session);
        session.set_camera(Mat4::from_rotation_translation(
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 1.0, 0.0),
        ));
        (core, session)
    }

    fn floor_added(identifier: u64) -> AnchorCallback {
        AnchorCallback::Added(PlatformAnchor::plane(
            identifier,
            Mat4::IDENTITY,
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::ZERO,
            PlaneAlignment::Horizontal,
        ))
    }

    #[test]
    fn activation_runs_session() {
        let (core, session) = started();
        assert_eq!(core.session_state(), SessionState::Running);
        assert_eq!(session.runs().len(), 1);
        assert!(!session.runs()[0].1.remove_existing_anchors);
    }

    #[test]
    fn plane_snap_tap_places_on_detected_plane() {
        let (mut core, mut session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);
        core.set_mode(PlacementMode::PlaneSnap, &mut session);

        let floor = floor_added(1);
        session.track(&floor);
        core.ingest(&floor, &session);

        let placed = core.dispatch(SceneEvent::PointerDown(Vec2::new(50.0, 50.0)), &session);
        let key = placed.unwrap();
        let world = core.placed_world_transform(key).unwrap();
        assert!(world.w_axis.truncate().abs_diff_eq(Vec3::ZERO, 1e-5));
        assert_eq!(core.status().overlay_count, 1);
        assert!(core.status().show_plane_overlay);
    }

    #[test]
    fn image_anchor_attaches_selection() {
        let (mut core, session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);

        let image = AnchorCallback::Added(PlatformAnchor::image(
            5,
            Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)),
            Some("poster".into()),
        ));
        let key = core.ingest(&image, &session).unwrap();

        assert_eq!(core.store().placed_anchor(key), Some(crate::engine::anchors::AnchorId(5)));

        // Re-announcing the same image must not place a second copy.
        assert!(core.ingest(&image, &session).is_none());
        assert_eq!(core.status().placed_count, 1);
    }

    #[test]
    fn repeated_image_detection_moves_instead_of_attaching_again() {
        let (mut core, session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);

        let id = crate::engine::anchors::AnchorId(3);
        let first = TrackedAnchor::image(id, Mat4::IDENTITY, Some("poster".into()));
        let moved = TrackedAnchor::image(
            id,
            Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0)),
            Some("poster".into()),
        );

        let key = core.dispatch(SceneEvent::AnchorAdded(first), &session).unwrap();
        assert!(core.dispatch(SceneEvent::AnchorAdded(moved), &session).is_none());

        assert_eq!(core.status().placed_count, 1);
        assert_eq!(core.status().anchor_count, 1);
        let world = core.placed_world_transform(key).unwrap();
        assert!(world.w_axis.truncate().abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn reset_purges_scene_and_forgets_anchors() {
        let (mut core, mut session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);
        core.ingest(&floor_added(1), &session);
        core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);

        core.reset(&mut session);

        let status = core.status();
        assert_eq!(status.placed_count, 0);
        assert_eq!(status.overlay_count, 0);
        assert_eq!(status.anchor_count, 0);
        assert!(session.runs().last().unwrap().1.remove_existing_anchors);

        // The session re-detects the plane after the purge.
        core.ingest(&floor_added(1), &session);
        assert_eq!(core.status().overlay_count, 1);
    }

    #[test]
    fn mode_change_sets_overlay_visibility_and_keeps_objects() {
        let (mut core, mut session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);
        core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);

        core.set_mode(PlacementMode::PlaneSnap, &mut session);
        assert!(core.status().show_plane_overlay);
        core.set_mode(PlacementMode::ImageAttach, &mut session);
        assert!(!core.status().show_plane_overlay);

        assert_eq!(core.status().placed_count, 1);
        assert!(session.runs().iter().all(|(_, options)| !options.remove_existing_anchors));
    }

    #[test]
    fn animation_control_targets_last_placement() {
        let (mut core, session) = started();
        assert!(!core.animation_control(AnimationCommand::HoldMidpoint));

        let prototype = chair();
        core.select_prototype(&prototype);
        let first = core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session).unwrap();
        let second = core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session).unwrap();

        assert!(core.animation_control(AnimationCommand::HoldMidpoint));
        assert!(core.store().placed_object(second).unwrap().paused);
        assert!(!core.store().placed_object(first).unwrap().paused);
    }

    #[test]
    fn disappearing_pauses_without_losing_state() {
        let (mut core, mut session) = started();
        let prototype = chair();
        core.select_prototype(&prototype);
        core.dispatch(SceneEvent::PointerDown(Vec2::ZERO), &session);

        core.view_lifecycle(ViewPhase::Disappeared, &mut session);
        assert_eq!(core.session_state(), SessionState::Paused);
        assert_eq!(core.status().placed_count, 1);

        core.view_lifecycle(ViewPhase::Appeared, &mut session);
        assert_eq!(core.session_state(), SessionState::Running);
        assert_eq!(core.status().placed_count, 1);
    }
}
