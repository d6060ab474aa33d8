/// Rotation about the local X axis that lays a vertical quad flat on an
/// anchor's XZ plane: -90° X rotation (Y→-Z, Z→Y, X→X).
pub const OVERLAY_LAY_FLAT_ANGLE_X: f32 = -std::f32::consts::FRAC_PI_2;

/// Local Y offset of a plane overlay. The anchor's center.y is never used.
pub const OVERLAY_LOCAL_HEIGHT: f32 = 0.0;
