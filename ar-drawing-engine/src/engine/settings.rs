use std::path::Path;

use bevy::prelude::Resource;
use constants::placement::{DRAG_MIN_DISTANCE, FREEFORM_FORWARD_OFFSET};
use constants::render_settings::{PLANE_OVERLAY_COLOUR, PLANE_OVERLAY_OPACITY};
use constants::session::{DEFAULT_LOG_FILTER, REFERENCE_IMAGE_GROUP};
use serde::{Deserialize, Serialize};

use super::session::config::PlaneDetectionScope;

#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::IoError(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::ParseError(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error: {}", e),
            SettingsError::ParseError(e) => write!(f, "Settings parse error: {}", e),
            SettingsError::Invalid(reason) => write!(f, "Invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Engine tuning loaded from JSON. Every field falls back to the constant
/// tables, so `{}` is a complete settings file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub plane_detection: PlaneDetectionScope,
    /// Keep placing while the pointer drags across a plane.
    pub drag_placement: bool,
    /// Metres in front of the camera for freeform placements.
    pub freeform_forward_offset: f32,
    /// Screen units a drag must travel before the next placement.
    pub drag_min_distance: f32,
    pub reference_image_group: String,
    pub overlay_opacity: f32,
    pub overlay_colour: [f32; 4],
    pub log_filter: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetectionScope::default(),
            drag_placement: true,
            freeform_forward_offset: FREEFORM_FORWARD_OFFSET,
            drag_min_distance: DRAG_MIN_DISTANCE,
            reference_image_group: REFERENCE_IMAGE_GROUP.to_string(),
            overlay_opacity: PLANE_OVERLAY_OPACITY,
            overlay_colour: PLANE_OVERLAY_COLOUR,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.freeform_forward_offset.is_finite() || self.freeform_forward_offset < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "freeform_forward_offset must be a non-negative number, got {}",
                self.freeform_forward_offset
            )));
        }
        if !self.drag_min_distance.is_finite() || self.drag_min_distance < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "drag_min_distance must be a non-negative number, got {}",
                self.drag_min_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(SettingsError::Invalid(format!(
                "overlay_opacity must be within 0..=1, got {}",
                self.overlay_opacity
            )));
        }
        if self.reference_image_group.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "reference_image_group must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn drag_min_distance_squared(&self) -> f32 {
        self.drag_min_distance * self.drag_min_distance
    }
}
