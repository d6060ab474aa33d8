/// Distance in front of the camera, along its local -Z axis, at which freeform
/// placements land.
pub const FREEFORM_FORWARD_OFFSET: f32 = 0.2;

/// Minimum screen-space spacing between two placements of one drag gesture.
pub const DRAG_MIN_DISTANCE: f32 = 40.0;

/// Squared form of `DRAG_MIN_DISTANCE`, compared against squared pointer deltas.
pub const DRAG_MIN_DISTANCE_SQUARED: f32 = DRAG_MIN_DISTANCE * DRAG_MIN_DISTANCE;
