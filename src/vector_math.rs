//! Basic vector and angle helpers.
//! Small helpers for camera orbits, headings and input curves.
use std::f32::consts::TAU;

use glam::Vec3;

/// Clamps `value` into `[low, high]` without panicking on inverted bounds.
///
/// The lower bound wins when the bounds are inverted, which keeps zoom and
/// occlusion clamps well defined for degenerate configurations.
///
/// # Examples
/// ```
/// use wayfarer::vector_math::clamp_range;
/// assert!((clamp_range(30.0, 3.0, 25.0) - 25.0).abs() < f32::EPSILON);
/// assert!((clamp_range(1.0, 3.0, 25.0) - 3.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn clamp_range(value: f32, low: f32, high: f32) -> f32 {
    value.min(high).max(low)
}

/// Linear interpolation between `from` and `to` by factor `t`.
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (to - from).mul_add(t, from)
}

/// Wraps an angle in radians into `[0, 2π)`.
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use wayfarer::vector_math::wrap_angle;
/// assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
/// assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
/// ```
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU itself for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Sign-preserving power curve applied to raw pointer deltas.
///
/// `sign(d) * (|d| / 100)^power * 100 * sensitivity`. A power of 1 gives a
/// linear response; larger powers damp small movements and amplify large
/// sweeps.
///
/// # Examples
/// ```
/// use wayfarer::vector_math::sensitivity_curve;
/// let linear = sensitivity_curve(-50.0, 1.0, 0.01);
/// assert!((linear + 0.5).abs() < 1e-6);
/// assert_eq!(sensitivity_curve(0.0, 2.0, 0.01), 0.0);
/// ```
#[must_use]
pub fn sensitivity_curve(delta: f32, power: f32, sensitivity: f32) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    delta.signum() * (delta.abs() / 100.0).powf(power) * 100.0 * sensitivity
}

/// Offset of an orbiting camera from its target.
///
/// `rotation_h` spins around the vertical axis (0 places the camera on the
/// positive Z side), `rotation_v` lifts it above the horizon, and `height`
/// is added on top of the vertical component.
#[must_use]
pub fn spherical_offset(rotation_h: f32, rotation_v: f32, distance: f32, height: f32) -> Vec3 {
    let (sin_h, cos_h) = rotation_h.sin_cos();
    let (sin_v, cos_v) = rotation_v.sin_cos();
    Vec3::new(
        sin_h * cos_v * distance,
        sin_v.mul_add(distance, height),
        cos_h * cos_v * distance,
    )
}

/// Rotates raw strafe/forward axes by a horizontal heading.
///
/// `strafe` is the right-hand axis and `forward` the axis pointing away from
/// a camera at heading `heading`. The result lies in the XZ plane and is not
/// normalised.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use wayfarer::vector_math::heading_relative;
/// let dir = heading_relative(1.0, 0.0, 0.0);
/// assert!(dir.abs_diff_eq(Vec3::X, 1e-6));
/// let fwd = heading_relative(0.0, 1.0, 0.0);
/// assert!(fwd.abs_diff_eq(Vec3::NEG_Z, 1e-6));
/// ```
#[must_use]
pub fn heading_relative(strafe: f32, forward: f32, heading: f32) -> Vec3 {
    let (sin_h, cos_h) = heading.sin_cos();
    let right = Vec3::new(cos_h, 0.0, -sin_h);
    let away = Vec3::new(-sin_h, 0.0, -cos_h);
    right * strafe + away * forward
}
