/// Resource group holding the reference images recognised in image-attach mode.
pub const REFERENCE_IMAGE_GROUP: &str = "AR Resources";

/// Log filter used when settings do not provide one.
pub const DEFAULT_LOG_FILTER: &str = "info,ar_drawing_engine=debug";

/// Viewport used by the simulated session when a trace does not set one.
pub const SIMULATED_VIEWPORT_SIZE: [f32; 2] = [1170.0, 2532.0];

/// Vertical field of view of the simulated camera, in radians.
pub const SIMULATED_VERTICAL_FOV: f32 = 1.047_197_6;
