/// Opacity of plane overlay surrogates.
pub const PLANE_OVERLAY_OPACITY: f32 = 0.25;

/// Diffuse colour of plane overlay surrogates (linear RGBA).
pub const PLANE_OVERLAY_COLOUR: [f32; 4] = [0.0, 0.478_431_37, 1.0, 1.0];
