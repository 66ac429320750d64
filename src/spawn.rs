//! Entity construction for the exploration scene.
use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::camera::{CameraPose, CameraRig};
use crate::components::{
    Enemy, Flying, Health, MoveTarget, MovementStats, Player, Renderable, Transform,
};
use crate::config::{CameraSettings, PlayerSettings};
use crate::input::InputState;

/// Tags every entity the scene created, so teardown can despawn them.
#[derive(Component, Debug, Default, Clone, Copy)]
#[component(storage = "SparseSet")]
pub struct SceneEntity;

/// Spawns the entity holding the frame's [`InputState`].
pub fn spawn_input(world: &mut World) -> Entity {
    world.spawn((InputState::default(), SceneEntity)).id()
}

/// Spawns the player at the configured position with full health.
pub fn spawn_player(world: &mut World, settings: &PlayerSettings) -> Entity {
    let mut player = world.spawn((
        Player,
        Renderable,
        SceneEntity,
        Transform::from_position(settings.spawn),
        Health::full(settings.max_health),
        MovementStats {
            move_speed: settings.move_speed,
            jump_height: settings.jump_height,
        },
        MoveTarget::default(),
    ));
    if settings.flying {
        player.insert(Flying);
    }
    player.id()
}

/// Spawns the camera rig in fixed mode.
pub fn spawn_camera(world: &mut World, settings: &CameraSettings) -> Entity {
    let pose = CameraPose::initial(settings);
    world
        .spawn((
            CameraRig::from_settings(settings),
            pose,
            Transform::from_position(pose.position),
            SceneEntity,
        ))
        .id()
}

/// Spawns a static enemy at `position`.
pub fn spawn_enemy(world: &mut World, position: Vec3, health: f32) -> Entity {
    world
        .spawn((
            Enemy,
            Renderable,
            SceneEntity,
            Transform::from_position(position),
            Health::full(health),
        ))
        .id()
}

/// Despawns every entity created through this module.
///
/// Returns how many were removed.
pub fn despawn_scene(world: &mut World) -> usize {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<SceneEntity>>()
        .iter(world)
        .collect();
    entities
        .into_iter()
        .filter(|entity| world.despawn(*entity))
        .count()
}
