use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::engine::mode::PlacementMode;
use crate::engine::session::SessionState;

/// Snapshot of what the options UI can observe about the scene.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStatus {
    pub mode: PlacementMode,
    pub show_plane_overlay: bool,
    pub placed_count: usize,
    pub overlay_count: usize,
    pub anchor_count: usize,
    pub session: SessionState,
    pub selected_prototype: Option<String>,
}
