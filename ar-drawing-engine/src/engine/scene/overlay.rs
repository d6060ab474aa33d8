use bevy::log::debug;
use bevy::math::{Mat4, Quat, Vec3};
use constants::coordinate_system::{OVERLAY_LAY_FLAT_ANGLE_X, OVERLAY_LOCAL_HEIGHT};
use constants::render_settings::{PLANE_OVERLAY_COLOUR, PLANE_OVERLAY_OPACITY};

use super::graph::{NodeContent, NodeKey};
use super::store::SceneStore;
use crate::engine::anchors::{AnchorId, PlaneGeometry};

/// Translucent floor quad drawn over a detected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneOverlay {
    pub width: f32,
    pub depth: f32,
    pub opacity: f32,
    pub colour: [f32; 4],
}

/// Local transform of an overlay: laid flat and centred on the plane, with the
/// anchor's center.y dropped.
pub fn overlay_transform(center: Vec3) -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_rotation_x(OVERLAY_LAY_FLAT_ANGLE_X),
        Vec3::new(center.x, OVERLAY_LOCAL_HEIGHT, center.z),
    )
}

/// Keeps one overlay per tracked plane anchor in step with the anchor.
///
/// Lifecycle per plane: `Detected -> Updated* -> Removed`. Removal needs no
/// call here: the overlay lives under the anchor's node and leaves with it in
/// `SceneStore::remove_anchor`.
#[derive(Debug, Clone, Copy)]
pub struct PlaneOverlaySynchronizer {
    opacity: f32,
    colour: [f32; 4],
}

impl Default for PlaneOverlaySynchronizer {
    fn default() -> Self {
        Self {
            opacity: PLANE_OVERLAY_OPACITY,
            colour: PLANE_OVERLAY_COLOUR,
        }
    }
}

impl PlaneOverlaySynchronizer {
    pub fn new(opacity: f32, colour: [f32; 4]) -> Self {
        Self { opacity, colour }
    }

    fn overlay_for(&self, plane: &PlaneGeometry) -> PlaneOverlay {
        PlaneOverlay {
            width: plane.width(),
            depth: plane.depth(),
            opacity: self.opacity,
            colour: self.colour,
        }
    }

    /// Create the overlay for a newly detected plane. A plane that already has
    /// one is synced instead, so there is never more than one.
    pub fn on_detected(&self, store: &mut SceneStore, anchor: AnchorId, plane: &PlaneGeometry) -> Option<NodeKey> {
        if let Some(existing) = store.overlay_key(anchor) {
            self.on_updated(store, anchor, plane);
            return Some(existing);
        }

        let key = store.insert_overlay(anchor, self.overlay_for(plane), overlay_transform(plane.center))?;
        debug!(
            "overlay {:.2} x {:.2} created for {}",
            plane.width(),
            plane.depth(),
            anchor
        );
        Some(key)
    }

    /// Re-derive size and centre from the anchor's latest estimate.
    pub fn on_updated(&self, store: &mut SceneStore, anchor: AnchorId, plane: &PlaneGeometry) -> bool {
        let Some(node) = store.overlay_node_mut(anchor) else {
            return false;
        };
        let NodeContent::Overlay(overlay) = &mut node.content else {
            return false;
        };

        overlay.width = plane.width();
        overlay.depth = plane.depth();
        node.transform = overlay_transform(plane.center);
        true
    }
}
