//! Bevy plugin wiring the exploration pipeline.
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

use crate::camera::{camera_follow_system, camera_input_system};
use crate::components::{Enemy, Flying, Player, Renderable};
use crate::config::{CameraSettings, MovementSettings, ZoneSettings};
use crate::debug::DebugPanel;
use crate::frame::FrameClock;
use crate::input::{update_input_system, InputAggregator};
use crate::movement::player_movement_system;
use crate::physics::physics_step_system;
use crate::render::{
    detach_removed_nodes_system, render_sync_system, sanitise_scale_system, BoundCamera,
    SceneNodes,
};
use crate::zone::zone_system;

/// Stages of one exploration frame, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplorationSet {
    /// Physics world step.
    Physics,
    /// Input snapshot.
    Input,
    /// Player locomotion.
    Movement,
    /// Zone classification and forward snap.
    Zone,
    /// Camera rotation and zoom targets.
    CameraInput,
    /// Camera placement.
    CameraFollow,
    /// Transform scale repair.
    Sanitise,
    /// Push to the presentation layer.
    RenderSync,
}

/// Installs the exploration resources and systems.
///
/// Settings resources already present are kept, so callers can insert
/// configured values before adding the plugin.
pub struct ExplorationPlugin;

impl Plugin for ExplorationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Player>()
            .register_type::<Enemy>()
            .register_type::<Renderable>()
            .register_type::<Flying>()
            .register_type::<CameraSettings>()
            .register_type::<MovementSettings>()
            .register_type::<ZoneSettings>();

        app.init_resource::<CameraSettings>()
            .init_resource::<MovementSettings>()
            .init_resource::<ZoneSettings>()
            .init_resource::<FrameClock>()
            .init_resource::<InputAggregator>()
            .init_resource::<SceneNodes>()
            .init_resource::<BoundCamera>()
            .init_resource::<DebugPanel>();

        app.configure_sets(
            Update,
            (
                ExplorationSet::Physics,
                ExplorationSet::Input,
                ExplorationSet::Movement,
                ExplorationSet::Zone,
                ExplorationSet::CameraInput,
                ExplorationSet::CameraFollow,
                ExplorationSet::Sanitise,
                ExplorationSet::RenderSync,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                physics_step_system.in_set(ExplorationSet::Physics),
                update_input_system.in_set(ExplorationSet::Input),
                player_movement_system.in_set(ExplorationSet::Movement),
                zone_system.in_set(ExplorationSet::Zone),
                camera_input_system.in_set(ExplorationSet::CameraInput),
                camera_follow_system.in_set(ExplorationSet::CameraFollow),
                sanitise_scale_system.in_set(ExplorationSet::Sanitise),
                (detach_removed_nodes_system, render_sync_system)
                    .chain()
                    .in_set(ExplorationSet::RenderSync),
            ),
        );
    }
}
