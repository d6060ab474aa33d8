use bevy::math::Vec2;

use crate::engine::anchors::{AnchorId, TrackedAnchor};

/// Every input the scene core reacts to, already normalised.
///
/// Anchor variants come from `AnchorEventAdapter`; pointer variants come from
/// the host's touch handling, in view coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    AnchorAdded(TrackedAnchor),
    AnchorUpdated(TrackedAnchor),
    AnchorRemoved(AnchorId),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
}
