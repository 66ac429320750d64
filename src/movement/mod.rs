//! Player locomotion.
//!
//! Movement is resolved once per frame from the [`InputState`] snapshot:
//! WASD moves the player in the configured frame of reference, the vertical
//! axis follows either discrete gravity with an instant jump or direct
//! flight thrust, and the result is hard-clamped to the world bounds. A left
//! click picks a ground destination that the player then walks to on its
//! own until manual input or a right click cancels it.
//!
//! Gravity and thrust are per-frame steps rather than time-scaled, so the
//! player's vertical speed follows the frame rate.
use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3, Vec3Swizzles};
use log::debug;

use crate::camera::{CameraPose, CameraRig};
use crate::components::{Flying, MoveTarget, MovementStats, Player, Transform};
use crate::config::{CameraSettings, MovementFrame, MovementSettings};
use crate::input::InputState;
use crate::vector_math::heading_relative;
use crate::{GROUNDED_EPSILON, MOVEMENT_DEADZONE};

mod pick;

pub use pick::{pick_ground, Projection};

/// Horizontal displacement for raw WASD `axes`.
///
/// Axes under the deadzone count as idle and yield zero; otherwise the
/// direction is normalised and scaled by `speed`.
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use wayfarer::config::MovementFrame;
/// use wayfarer::movement::planar_step;
/// let step = planar_step(Vec2::new(1.0, 0.0), MovementFrame::CameraRelative, 0.0, 0.25);
/// assert!(step.abs_diff_eq(Vec3::new(0.25, 0.0, 0.0), 1e-6));
/// assert_eq!(planar_step(Vec2::ZERO, MovementFrame::WorldAxes, 0.0, 0.25), Vec3::ZERO);
/// ```
#[must_use]
pub fn planar_step(axes: Vec2, frame: MovementFrame, heading: f32, speed: f32) -> Vec3 {
    let x = if axes.x.abs() < MOVEMENT_DEADZONE {
        0.0
    } else {
        axes.x
    };
    let y = if axes.y.abs() < MOVEMENT_DEADZONE {
        0.0
    } else {
        axes.y
    };
    let raw = match frame {
        MovementFrame::CameraRelative => heading_relative(x, y, heading),
        MovementFrame::WorldAxes => Vec3::new(x, 0.0, -y),
    };
    raw.normalize_or_zero() * speed
}

/// Height after one frame of vertical locomotion.
///
/// Grounded players fall by `gravity_step` while above ground and snap to it
/// otherwise; a jump while within [`GROUNDED_EPSILON`] of the ground lifts
/// straight to `ground + jump_height`. Flying players climb or sink by
/// `flight_speed` instead.
#[must_use]
pub fn vertical_step(
    y: f32,
    input: &InputState,
    flying: bool,
    stats: &MovementStats,
    settings: &MovementSettings,
) -> f32 {
    let ground = settings.ground_level;
    if flying {
        let thrust = f32::from(i8::from(input.jump) - i8::from(input.descend));
        return thrust.mul_add(settings.flight_speed, y);
    }
    let settled = if y > ground {
        y - settings.gravity_step
    } else {
        ground
    };
    if input.jump && (settled - ground).abs() < GROUNDED_EPSILON {
        ground + stats.jump_height
    } else {
        settled
    }
}

/// Moves `from` toward `target` in the XZ plane by at most `step`.
///
/// Returns the new position and whether the target was reached; the height
/// of `from` is preserved.
#[must_use]
pub fn approach(from: Vec3, target: Vec3, step: f32) -> (Vec3, bool) {
    let offset = target.xz() - from.xz();
    let distance = offset.length();
    if distance <= step {
        return (Vec3::new(target.x, from.y, target.z), true);
    }
    let moved = from.xz() + offset / distance * step;
    (Vec3::new(moved.x, from.y, moved.y), false)
}

type PlayerQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static MovementStats,
        Option<&'static mut MoveTarget>,
        Has<Flying>,
    ),
    With<Player>,
>;

/// Applies one frame of player locomotion.
///
/// A no-op without both a player and an input snapshot. Without a camera the
/// heading is taken as zero and click-to-move picks are skipped.
pub fn player_movement_system(
    settings: Res<MovementSettings>,
    camera_settings: Res<CameraSettings>,
    inputs: Query<&InputState>,
    cameras: Query<(&CameraRig, &CameraPose)>,
    mut players: PlayerQuery,
) {
    let Ok(input) = inputs.single() else {
        return;
    };
    let Ok((mut transform, stats, mut target, flying)) = players.single_mut() else {
        return;
    };
    let camera = cameras.single().ok();
    let heading = camera.map_or(0.0, |(rig, _)| rig.rotation_h);

    if let Some(target) = target.as_deref_mut() {
        let pose = camera.map(|(_, pose)| pose);
        update_move_target(
            target,
            input,
            pose,
            &camera_settings,
            &settings,
            transform.position.y,
        );
    }

    let manual = planar_step(input.movement(), settings.frame, heading, stats.move_speed);
    let mut position = transform.position;
    if manual == Vec3::ZERO {
        if let Some(MoveTarget(Some(destination))) = target.as_deref().copied() {
            let step = stats.move_speed * settings.auto_move_factor;
            let (next, arrived) = approach(position, destination, step);
            position = next;
            if arrived {
                debug!("reached move target {destination}");
                if let Some(target) = target.as_deref_mut() {
                    target.0 = None;
                }
            }
        }
    } else {
        position += manual;
        if let Some(target) = target.as_deref_mut() {
            target.0 = None;
        }
    }

    position.y = vertical_step(position.y, input, flying, stats, &settings);
    transform.position = settings.bounds.clamp(position);
}

/// Sets or clears the click-to-move destination from this frame's clicks.
fn update_move_target(
    target: &mut MoveTarget,
    input: &InputState,
    pose: Option<&CameraPose>,
    camera_settings: &CameraSettings,
    settings: &MovementSettings,
    player_y: f32,
) {
    if input.right_click {
        if target.0.take().is_some() {
            debug!("move target cleared");
        }
        return;
    }
    if !input.left_click {
        return;
    }
    let Some(pose) = pose else {
        return;
    };
    let projection = Projection {
        fov_y: camera_settings.fov_degrees.to_radians(),
        aspect: camera_settings.aspect_ratio,
    };
    let ndc = Vec2::new(input.mouse_x, input.mouse_y);
    if let Some(point) = pick_ground(
        pose.position,
        pose.look_at,
        projection,
        ndc,
        settings.ground_level,
    ) {
        let destination = Vec3::new(point.x, player_y, point.z);
        debug!("move target set to {destination}");
        target.0 = Some(destination);
    }
}
