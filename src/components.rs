//! ECS component types used by the simulation.
//! Includes the transform store, capability markers, health and player
//! movement parameters shared between systems.
use bevy_ecs::prelude::*;
use bevy_ecs::reflect::ReflectComponent;
use bevy_reflect::Reflect;
use glam::Vec3;
use serde::Serialize;

use crate::MIN_SCALE;

/// Position, Euler rotation and scale of a positioned entity.
///
/// Scale components never drop below [`MIN_SCALE`]; the constructors clamp
/// and [`sanitise_scale_system`](crate::render::sanitise_scale_system)
/// re-clamps anything written directly.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Euler rotation in radians (x = pitch, y = yaw, z = roll).
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a unit-scale transform at `position`.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Creates a unit-scale transform at the given coordinates.
    #[must_use]
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Returns the transform with `scale` applied, clamped to [`MIN_SCALE`].
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale.max(Vec3::splat(MIN_SCALE));
        self
    }

    /// Returns true when any scale component is below [`MIN_SCALE`].
    #[must_use]
    pub fn has_degenerate_scale(&self) -> bool {
        self.scale.cmplt(Vec3::splat(MIN_SCALE)).any() || self.scale.is_nan()
    }

    /// Raises every scale component to at least [`MIN_SCALE`].
    pub fn clamp_scale(&mut self) {
        // NaN components would slip through `max`; reset them to unit scale.
        let repaired = Vec3::select(self.scale.is_nan_mask(), Vec3::ONE, self.scale);
        self.scale = repaired.max(Vec3::splat(MIN_SCALE));
    }
}

/// Marker for the entity driven by local input.
///
/// Stored as a sparse set: membership is toggled rarely and queried as a
/// capability test rather than read as data.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[component(storage = "SparseSet")]
#[reflect(Component)]
pub struct Player;

/// Marker switching the player to flight locomotion: no gravity, direct
/// vertical thrust from jump and descend.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[component(storage = "SparseSet")]
#[reflect(Component)]
pub struct Flying;

/// Marker for hostile world entities.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[component(storage = "SparseSet")]
#[reflect(Component)]
pub struct Enemy;

/// Marker for entities mirrored onto a scene-graph node by render sync.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[component(storage = "SparseSet")]
#[reflect(Component)]
pub struct Renderable;

/// Current and maximum hit points.
///
/// `current` is expected not to exceed `max`, but this is a convention of
/// the callers rather than an enforced invariant.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Health {
    /// Remaining hit points.
    pub current: f32,
    /// Hit points at full health.
    pub max: f32,
}

impl Health {
    /// Full health with the given maximum.
    #[must_use]
    pub const fn full(max: f32) -> Self {
        Self { current: max, max }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(100.0)
    }
}

/// Per-player locomotion parameters.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovementStats {
    /// Horizontal distance covered per frame at full input.
    pub move_speed: f32,
    /// Height above the ground reached by a jump.
    pub jump_height: f32,
}

impl Default for MovementStats {
    fn default() -> Self {
        Self {
            move_speed: 0.25,
            jump_height: 0.8,
        }
    }
}

/// Ground point the player walks toward after a click.
///
/// `None` when no click-to-move destination is active.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MoveTarget(pub Option<Vec3>);
