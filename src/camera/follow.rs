use bevy_ecs::prelude::*;
use glam::{Vec3, Vec3Swizzles};

use super::{CameraMode, CameraPose, CameraRig};
use crate::components::{Player, Transform};
use crate::config::{CameraSettings, DeadbandSettings, FixedFraming};
use crate::frame::FrameClock;
use crate::physics::{PhysicsWorld, RayHit};
use crate::render::BoundCamera;
use crate::vector_math::{clamp_range, lerp, spherical_offset};
use crate::{DISTANCE_SMOOTHING, MIN_DEADBAND_STEP, OCCLUSION_MARGIN};

/// Camera distance after occlusion correction.
///
/// A hit strictly in front of the ray origin places the camera at
/// [`OCCLUSION_MARGIN`] of the hit distance, never closer than
/// `min_distance`. The ray ends at the orbit point, which lies above the
/// orbit sphere, so a far hit may resolve slightly beyond `distance`.
/// Without a hit the distance is unchanged.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use wayfarer::camera::occlusion_distance;
/// use wayfarer::physics::RayHit;
/// let hit = RayHit { distance: 10.0, point: Vec3::ZERO };
/// assert!((occlusion_distance(Some(hit), 15.0, 3.0) - 9.0).abs() < 1e-6);
/// let close = RayHit { distance: 2.0, point: Vec3::ZERO };
/// assert!((occlusion_distance(Some(close), 15.0, 3.0) - 3.0).abs() < 1e-6);
/// let far = RayHit { distance: 17.0, point: Vec3::ZERO };
/// assert!((occlusion_distance(Some(far), 15.0, 3.0) - 15.3).abs() < 1e-5);
/// assert!((occlusion_distance(None, 15.0, 3.0) - 15.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn occlusion_distance(hit: Option<RayHit>, distance: f32, min_distance: f32) -> f32 {
    match hit {
        Some(hit) if hit.distance > 0.0 => (hit.distance * OCCLUSION_MARGIN).max(min_distance),
        _ => distance,
    }
}

fn fixed_pose(rig: &mut CameraRig, player: Vec3, settings: &CameraSettings) -> CameraPose {
    rig.distance = settings.distance;
    rig.height = settings.height;
    rig.look_pos = player;
    let offset = match settings.fixed_framing {
        FixedFraming::Behind => Vec3::new(0.0, settings.height, settings.distance),
        FixedFraming::Side => Vec3::new(settings.distance, settings.height, 0.0),
    };
    CameraPose {
        position: player + offset,
        look_at: player + Vec3::Y * settings.fixed_look_offset,
        resolved_distance: settings.distance,
    }
}

/// Moves `point` toward `target` by the part of their separation beyond
/// `play`, scaled by `factor`.
fn trail(point: Vec3, target: Vec3, play: f32, factor: f32) -> Vec3 {
    let offset = target - point;
    let distance = offset.length();
    if distance <= play {
        return point;
    }
    point + offset / distance * ((distance - play) * factor)
}

/// Deadband placement: the camera keeps its previous XZ position while the
/// player stays within `camera_play_distance` of the resolved orbit radius.
fn trailing_position(
    rig: &CameraRig,
    previous: Vec3,
    player: Vec3,
    deadband: &DeadbandSettings,
    dt: f32,
) -> Vec3 {
    let to_player = player.xz() - previous.xz();
    let distance = to_player.length();
    let near = rig.actual_distance - deadband.camera_play_distance;
    let far = rig.actual_distance + deadband.camera_play_distance;
    let correction = if distance > far {
        (distance - far) * (dt * deadband.follow_smooth).min(1.0)
    } else if distance < near {
        (distance - near) * (dt * deadband.leave_smooth).min(1.0)
    } else {
        0.0
    };
    let mut xz = previous.xz();
    if correction.abs() > MIN_DEADBAND_STEP && distance > 0.0 {
        xz += to_player / distance * correction;
    }
    Vec3::new(xz.x, rig.look_pos.y + rig.current_height, xz.y)
}

fn free_pose(
    rig: &mut CameraRig,
    previous: Vec3,
    player: Vec3,
    settings: &CameraSettings,
    physics: Option<&PhysicsWorld>,
    dt: f32,
) -> CameraPose {
    let (min, max) = (settings.min_distance, settings.max_distance);
    rig.actual_distance = clamp_range(
        lerp(rig.actual_distance, rig.target_distance, DISTANCE_SMOOTHING),
        min,
        max,
    );
    let distance = rig.actual_distance;
    let offset = spherical_offset(rig.rotation_h, rig.rotation_v, distance, settings.height);
    let eye = player + Vec3::Y * settings.look_at_offset;
    let hit = physics.and_then(|world| world.raycast(eye, player + offset));
    let resolved = occlusion_distance(hit, distance, min);
    rig.actual_distance = resolved;
    rig.distance = distance;
    rig.height = settings.height;
    rig.current_height = rig.rotation_v.sin().mul_add(distance, settings.height);

    let deadband = &settings.deadband;
    let position = if deadband.enabled {
        let factor = (dt * deadband.follow_smooth).min(1.0);
        rig.look_pos = trail(rig.look_pos, player, deadband.look_play_distance, factor);
        let trailing = trailing_position(rig, previous, player, deadband, dt);
        match physics.and_then(|world| world.raycast(eye, trailing)) {
            Some(hit) if hit.distance > 0.0 => {
                let reach = clamp_range(
                    hit.distance * OCCLUSION_MARGIN,
                    min,
                    eye.distance(trailing),
                );
                eye + (trailing - eye).normalize_or_zero() * reach
            }
            _ => trailing,
        }
    } else {
        rig.look_pos = player;
        player + offset.normalize_or_zero() * resolved
    };

    CameraPose {
        position,
        look_at: eye,
        resolved_distance: resolved,
    }
}

type RigQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut CameraRig,
        &'static mut CameraPose,
        &'static mut Transform,
    ),
    Without<Player>,
>;

/// Places the camera around the player for the current mode.
///
/// A no-op until a rig, a player and a native camera are all present, so
/// systems can be wired before the host binds its camera.
pub fn camera_follow_system(
    settings: Res<CameraSettings>,
    clock: Res<FrameClock>,
    bound: Res<BoundCamera>,
    physics: Option<Res<PhysicsWorld>>,
    players: Query<&Transform, With<Player>>,
    mut rigs: RigQuery,
) {
    if !bound.is_bound() {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let Ok((mut rig, mut pose, mut transform)) = rigs.single_mut() else {
        return;
    };
    let player = player.position;
    let next = match rig.mode {
        CameraMode::Fixed => fixed_pose(&mut rig, player, &settings),
        CameraMode::Free => free_pose(
            &mut rig,
            pose.position,
            player,
            &settings,
            physics.as_deref(),
            clock.delta(),
        ),
    };
    *pose = next;
    transform.position = next.position;
    transform.rotation = next.euler();
}
