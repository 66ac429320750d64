//! Third-person camera rig.
//!
//! The rig is a single entity carrying [`CameraRig`] state, the resolved
//! [`CameraPose`] and a [`Transform`](crate::components::Transform) mirroring
//! that pose. Two systems drive it each frame: [`camera_input_system`] turns
//! pointer and wheel input into rotation and zoom targets, then
//! [`camera_follow_system`] places the camera around the player, smoothing
//! distance, avoiding occluders and optionally lagging inside a deadband.
use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::Serialize;

use crate::config::CameraSettings;
use crate::RESET_ROTATION_V;

mod follow;
mod input;

pub use follow::{camera_follow_system, occlusion_distance};
pub use input::{apply_camera_input, camera_input_system};

/// Camera behaviour selected by the zone classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CameraMode {
    /// Static offset from the player; input does not move the camera.
    #[default]
    Fixed,
    /// Player-controlled orbit.
    Free,
}

/// Orbit state of the camera.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraRig {
    /// Current mode.
    pub mode: CameraMode,
    /// Distance used for the last placement.
    pub distance: f32,
    /// Height used for the last placement.
    pub height: f32,
    /// Horizontal angle in radians, wrapped into `[0, 2π)`.
    pub rotation_h: f32,
    /// Vertical angle in radians, within the configured limits.
    pub rotation_v: f32,
    /// Horizontal angular velocity of the inertia policy.
    pub velocity_h: f32,
    /// Vertical angular velocity of the inertia policy.
    pub velocity_v: f32,
    /// Zoom distance requested by the wheel.
    pub target_distance: f32,
    /// Smoothed and occlusion-corrected distance.
    pub actual_distance: f32,
    /// Deadbanded look-at point.
    pub look_pos: Vec3,
    /// Height of the deadband camera above `look_pos`.
    pub current_height: f32,
}

impl CameraRig {
    /// Rig in fixed mode at the configured distance and the reset angle.
    #[must_use]
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            mode: CameraMode::Fixed,
            distance: settings.distance,
            height: settings.height,
            rotation_h: 0.0,
            rotation_v: RESET_ROTATION_V,
            velocity_h: 0.0,
            velocity_v: 0.0,
            target_distance: settings.distance,
            actual_distance: settings.distance,
            look_pos: Vec3::new(0.0, settings.look_at_offset, 0.0),
            current_height: settings.height,
        }
    }

    /// Restores the default orientation and stops any rotation.
    pub fn reset_rotation(&mut self) {
        self.rotation_h = 0.0;
        self.rotation_v = RESET_ROTATION_V;
        self.velocity_h = 0.0;
        self.velocity_v = 0.0;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

/// Resolved camera placement for the current frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Distance from the player after occlusion correction.
    pub resolved_distance: f32,
}

impl CameraPose {
    /// Pose before the first follow update.
    #[must_use]
    pub fn initial(settings: &CameraSettings) -> Self {
        Self {
            position: Vec3::new(0.0, settings.height, settings.distance),
            look_at: Vec3::new(0.0, settings.look_at_offset, 0.0),
            resolved_distance: settings.distance,
        }
    }

    /// Euler rotation (pitch, yaw, 0) of a camera at `position` facing
    /// `look_at`, with zero yaw looking down -Z.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use wayfarer::camera::CameraPose;
    /// let pose = CameraPose {
    ///     position: Vec3::new(0.0, 0.0, 10.0),
    ///     look_at: Vec3::ZERO,
    ///     resolved_distance: 10.0,
    /// };
    /// assert!(pose.euler().abs_diff_eq(Vec3::ZERO, 1e-6));
    /// ```
    #[must_use]
    pub fn euler(&self) -> Vec3 {
        let dir = (self.look_at - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return Vec3::ZERO;
        }
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        Vec3::new(pitch, yaw, 0.0)
    }
}
