use bevy::math::{Mat4, Vec2};

use super::config::{RunOptions, TrackingConfiguration};
use crate::engine::anchors::AnchorId;

/// What a hit-test may intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTestType {
    /// Detected planes, limited to their estimated extent.
    ExistingPlaneUsingExtent,
    /// Detected planes treated as infinite.
    ExistingPlane,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitTestResult {
    pub world_transform: Mat4,
    /// Distance from the camera along the ray.
    pub distance: f32,
    pub anchor: Option<AnchorId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub name: String,
    /// Printed width in metres.
    pub physical_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImageSet {
    pub group: String,
    pub images: Vec<ReferenceImage>,
}

/// The tracking and rendering subsystem the scene core drives.
///
/// Implementations wrap the platform session; anchor callbacks flow back
/// separately as `AnchorCallback`s.
pub trait TrackingSession {
    fn run(&mut self, configuration: &TrackingConfiguration, options: RunOptions);

    fn pause(&mut self);

    /// Camera pose of the latest frame, `None` before the first frame.
    fn current_camera_transform(&self) -> Option<Mat4>;

    /// Results nearest first.
    fn hit_test(&self, point: Vec2, types: &[HitTestType]) -> Vec<HitTestResult>;

    fn reference_images(&self, group: &str) -> Option<ReferenceImageSet>;
}
