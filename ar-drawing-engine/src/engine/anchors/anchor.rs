use bevy::math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque identity the tracking subsystem assigns to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAlignment {
    #[default]
    Horizontal,
    Vertical,
}

/// Plane-specific anchor data, expressed in the anchor's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGeometry {
    /// Estimated size; only `x` (width) and `z` (depth) are meaningful.
    pub extent: Vec3,
    /// Offset of the plane's centre from the anchor origin.
    pub center: Vec3,
    pub alignment: PlaneAlignment,
}

impl PlaneGeometry {
    pub fn new(extent: Vec3, center: Vec3, alignment: PlaneAlignment) -> Self {
        Self {
            extent,
            center,
            alignment,
        }
    }

    pub fn width(&self) -> f32 {
        self.extent.x
    }

    pub fn depth(&self) -> f32 {
        self.extent.z
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind {
    Plane(PlaneGeometry),
    Image { reference_name: Option<String> },
}

/// Anchor as seen by the scene core. Lives exactly as long as the tracking
/// subsystem keeps reporting it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAnchor {
    pub id: AnchorId,
    /// World transform of the anchor.
    pub pose: Mat4,
    pub kind: AnchorKind,
}

impl TrackedAnchor {
    pub fn plane(id: AnchorId, pose: Mat4, geometry: PlaneGeometry) -> Self {
        Self {
            id,
            pose,
            kind: AnchorKind::Plane(geometry),
        }
    }

    pub fn image(id: AnchorId, pose: Mat4, reference_name: Option<String>) -> Self {
        Self {
            id,
            pose,
            kind: AnchorKind::Image { reference_name },
        }
    }

    pub fn as_plane(&self) -> Option<&PlaneGeometry> {
        match &self.kind {
            AnchorKind::Plane(geometry) => Some(geometry),
            AnchorKind::Image { .. } => None,
        }
    }
}
