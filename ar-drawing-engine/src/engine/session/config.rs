use serde::{Deserialize, Serialize};

use super::platform::ReferenceImageSet;
use crate::engine::mode::PlacementMode;

/// Which plane orientations the session looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneDetectionScope {
    Horizontal,
    #[default]
    HorizontalAndVertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl From<PlaneDetectionScope> for PlaneDetection {
    fn from(scope: PlaneDetectionScope) -> Self {
        match scope {
            PlaneDetectionScope::Horizontal => Self {
                horizontal: true,
                vertical: false,
            },
            PlaneDetectionScope::HorizontalAndVertical => Self {
                horizontal: true,
                vertical: true,
            },
        }
    }
}

/// Tracking configuration, recomputed from scratch for every (re)run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfiguration {
    pub plane_detection: PlaneDetection,
    /// Images to recognise, only ever set in image-attach mode.
    pub detection_images: Option<ReferenceImageSet>,
}

impl TrackingConfiguration {
    pub fn for_mode(
        mode: PlacementMode,
        scope: PlaneDetectionScope,
        images: Option<ReferenceImageSet>,
    ) -> Self {
        Self {
            plane_detection: scope.into(),
            detection_images: match mode {
                PlacementMode::ImageAttach => images,
                PlacementMode::Freeform | PlacementMode::PlaneSnap => None,
            },
        }
    }

    pub fn detects_images(&self) -> bool {
        self.detection_images.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Discard every anchor the session currently tracks.
    pub remove_existing_anchors: bool,
}
