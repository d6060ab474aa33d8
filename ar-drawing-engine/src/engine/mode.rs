use serde::{Deserialize, Serialize};

/// How a pointer press turns into a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// In front of the camera, wherever it points.
    #[default]
    Freeform,
    /// Onto a detected plane under the pointer.
    PlaneSnap,
    /// Onto recognised reference images, driven by detection rather than touch.
    ImageAttach,
}

impl PlacementMode {
    /// Convert string identifier to placement mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "freeform" => Some(Self::Freeform),
            "plane" | "plane_snap" => Some(Self::PlaneSnap),
            "image" | "image_attach" => Some(Self::ImageAttach),
            _ => None,
        }
    }

    /// Identifier sent to the options UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freeform => "freeform",
            Self::PlaneSnap => "plane_snap",
            Self::ImageAttach => "image_attach",
        }
    }

    /// Overlay visibility the mode selector applies when switching to this mode.
    pub fn shows_plane_overlay(&self) -> bool {
        matches!(self, Self::PlaneSnap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!(PlacementMode::from_string("plane"), Some(PlacementMode::PlaneSnap));
        assert_eq!(PlacementMode::from_string("Image_Attach"), Some(PlacementMode::ImageAttach));
        assert_eq!(PlacementMode::from_string("freeform"), Some(PlacementMode::Freeform));
        assert_eq!(PlacementMode::from_string("sketch"), None);
    }

    #[test]
    fn only_plane_snap_shows_overlays() {
        assert!(!PlacementMode::Freeform.shows_plane_overlay());
        assert!(PlacementMode::PlaneSnap.shows_plane_overlay());
        assert!(!PlacementMode::ImageAttach.shows_plane_overlay());
    }
}
