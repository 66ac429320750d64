//! Simulation constants shared across systems.
//!
//! Tunable behaviour lives in [`crate::config`]; the values here are the
//! fixed numeric choices the systems are built around.

/// Lower bound applied to every scale component of a transform.
pub const MIN_SCALE: f32 = 0.01;

/// Vertical camera angle restored by the reset action, in radians.
pub const RESET_ROTATION_V: f32 = 0.2;

/// Wheel deltas at or below this magnitude do not zoom the camera.
pub const WHEEL_DEADZONE: f32 = 0.1;
/// Distance change per normalised wheel unit.
pub const WHEEL_ZOOM_STEP: f32 = 2.0;
/// Scale applied to raw wheel `deltaY` values; the sign is inverted so that
/// scrolling up zooms out.
pub const WHEEL_SCALE: f32 = 0.01;

/// Exponential smoothing factor pulling the actual camera distance toward
/// its target each frame.
pub const DISTANCE_SMOOTHING: f32 = 0.1;
/// Fraction of the raycast hit distance kept when pulling the camera in
/// front of an occluder.
pub const OCCLUSION_MARGIN: f32 = 0.9;

/// Largest physics sub-step taken for a single frame, in seconds.
pub const MAX_PHYSICS_STEP: f32 = 1.0 / 30.0;

/// Height tolerance for treating the player as grounded.
pub const GROUNDED_EPSILON: f32 = 0.1;
/// Raw movement axes below this magnitude are treated as idle.
pub const MOVEMENT_DEADZONE: f32 = 0.01;
/// Pointer deltas below this magnitude do not rotate the notched camera.
pub const POINTER_DEADZONE: f32 = 0.001;
/// Deadband corrections shorter than this are skipped.
pub const MIN_DEADBAND_STEP: f32 = 0.001;
