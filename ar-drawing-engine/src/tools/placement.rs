use std::sync::Arc;

use bevy::log::debug;
use bevy::math::{Mat4, Vec2, Vec3};
use constants::placement::{DRAG_MIN_DISTANCE_SQUARED, FREEFORM_FORWARD_OFFSET};

use crate::engine::mode::PlacementMode;
use crate::engine::scene::{Prototype, SelectedPrototype};
use crate::engine::session::{HitTestType, TrackingSession};
use crate::engine::settings::EngineSettings;

/// Where the policy decided a new copy of the selection should go.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub prototype: Arc<Prototype>,
    /// World transform; placements from pointer input attach to the root.
    pub transform: Mat4,
}

/// Pose in front of the camera at which freeform placements land.
pub fn freeform_transform(camera: Mat4, forward_offset: f32) -> Mat4 {
    camera * Mat4::from_translation(Vec3::new(0.0, 0.0, -forward_offset))
}

/// Decides whether a pointer gesture places a new object, and where.
///
/// Holds the last placement point of the current gesture so plane-snap drags
/// only re-place after the pointer has moved far enough.
#[derive(Debug, Clone)]
pub struct PlacementPolicy {
    forward_offset: f32,
    drag_min_distance_squared: f32,
    drag_placement: bool,
    last_place_point: Option<Vec2>,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::new(FREEFORM_FORWARD_OFFSET, DRAG_MIN_DISTANCE_SQUARED, true)
    }
}

impl PlacementPolicy {
    pub fn new(forward_offset: f32, drag_min_distance_squared: f32, drag_placement: bool) -> Self {
        Self {
            forward_offset,
            drag_min_distance_squared,
            drag_placement,
            last_place_point: None,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(
            settings.freeform_forward_offset,
            settings.drag_min_distance_squared(),
            settings.drag_placement,
        )
    }

    pub fn pointer_down(
        &mut self,
        point: Vec2,
        mode: PlacementMode,
        selection: &SelectedPrototype,
        session: &dyn TrackingSession,
    ) -> Option<PlacementRequest> {
        let Some(prototype) = selection.get() else {
            debug!("pointer down with nothing selected");
            return None;
        };

        match mode {
            PlacementMode::Freeform => {
                let Some(camera) = session.current_camera_transform() else {
                    debug!("no camera frame yet, freeform placement skipped");
                    return None;
                };
                Some(PlacementRequest {
                    prototype,
                    transform: freeform_transform(camera, self.forward_offset),
                })
            }
            PlacementMode::PlaneSnap => self.snap_to_plane(point, prototype, session),
            PlacementMode::ImageAttach => None,
        }
    }

    /// Drag continuation. Only plane-snap places, and only once the pointer
    /// is strictly further than the minimum distance from the last placement.
    pub fn pointer_move(
        &mut self,
        point: Vec2,
        mode: PlacementMode,
        selection: &SelectedPrototype,
        session: &dyn TrackingSession,
    ) -> Option<PlacementRequest> {
        if mode != PlacementMode::PlaneSnap || !self.drag_placement {
            return None;
        }
        let last = self.last_place_point?;
        if point.distance_squared(last) <= self.drag_min_distance_squared {
            return None;
        }
        let Some(prototype) = selection.get() else {
            debug!("drag with nothing selected");
            return None;
        };

        self.snap_to_plane(point, prototype, session)
    }

    pub fn pointer_up(&mut self) {
        self.last_place_point = None;
    }

    pub fn last_place_point(&self) -> Option<Vec2> {
        self.last_place_point
    }

    fn snap_to_plane(
        &mut self,
        point: Vec2,
        prototype: Arc<Prototype>,
        session: &dyn TrackingSession,
    ) -> Option<PlacementRequest> {
        let hits = session.hit_test(point, &[HitTestType::ExistingPlaneUsingExtent]);
        let Some(hit) = hits.first() else {
            debug!("no plane under {:?}", point);
            return None;
        };

        self.last_place_point = Some(point);
        Some(PlacementRequest {
            prototype,
            transform: hit.world_transform,
        })
    }
}
