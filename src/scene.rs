//! Explicitly constructed owner of one exploration session.
//!
//! [`ExplorationScene`] holds the ECS app and every injected service: the
//! physics world passed to [`ExplorationScene::new`], the native camera and
//! render surface bound later by the host, and the scene-graph nodes it
//! attaches. Nothing is process-global, so independent scenes can coexist
//! and teardown is a single [`dispose`](ExplorationScene::dispose).
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};
use serde::Serialize;

use crate::camera::{CameraMode, CameraPose, CameraRig};
use crate::components::{Health, Transform};
use crate::config::{CameraSettings, SimConfig};
use crate::debug::{self, DebugPanel, Parameter, TuneError};
use crate::frame::FrameClock;
use crate::input::{CursorStyle, InputAggregator, RawInputEvent, SurfaceRect};
use crate::physics::{PhysicsWorld, Raycaster};
use crate::plugin::ExplorationPlugin;
use crate::render::{BoundCamera, SceneCamera, SceneNode, SceneNodes};
use crate::spawn;

/// Serializable summary of the scene after a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Frames advanced so far.
    pub frame: u64,
    /// Player position, if the player exists.
    pub player: Option<Vec3>,
    /// Player health, if the player exists.
    pub health: Option<Health>,
    /// Camera mode, if the rig exists.
    pub mode: Option<CameraMode>,
    /// Resolved camera pose, if the rig exists.
    pub pose: Option<CameraPose>,
}

/// One exploration session.
pub struct ExplorationScene {
    app: App,
    player: Entity,
    camera: Entity,
    disposed: bool,
}

impl ExplorationScene {
    /// Builds the pipeline around `physics` and spawns the input, player
    /// and camera entities.
    ///
    /// The configuration is assumed valid; see [`SimConfig::validate`].
    #[must_use]
    pub fn new(config: SimConfig, physics: impl Raycaster + 'static) -> Self {
        let SimConfig {
            camera: camera_settings,
            movement,
            zone,
            player: player_settings,
        } = config;
        let mut app = App::new();
        app.insert_resource(camera_settings.clone())
            .insert_resource(movement)
            .insert_resource(zone)
            .insert_resource(PhysicsWorld::new(physics))
            .add_plugins(ExplorationPlugin);
        app.finish();
        app.cleanup();

        let world = app.world_mut();
        spawn::spawn_input(world);
        let player = spawn::spawn_player(world, &player_settings);
        let camera = spawn::spawn_camera(world, &camera_settings);
        info!("exploration scene ready: player {player}, camera {camera}");
        Self {
            app,
            player,
            camera,
            disposed: false,
        }
    }

    /// Binds the host's native camera; the follow system stays idle until
    /// this is called.
    pub fn bind_camera(&mut self, camera: Box<dyn SceneCamera>) {
        self.app.world_mut().resource_mut::<BoundCamera>().bind(camera);
    }

    /// Starts listening for input on `surface` and adopts its aspect ratio.
    pub fn bind_surface(&mut self, surface: SurfaceRect) {
        let world = self.app.world_mut();
        world.resource_mut::<InputAggregator>().attach(surface);
        if let Some(aspect) = surface.aspect_ratio() {
            world.resource_mut::<CameraSettings>().aspect_ratio = aspect;
        }
    }

    /// Associates a host node with `entity`, returning any node it replaces.
    pub fn attach_node(
        &mut self,
        entity: Entity,
        node: Box<dyn SceneNode>,
    ) -> Option<Box<dyn SceneNode>> {
        self.app
            .world_mut()
            .resource_mut::<SceneNodes>()
            .attach(entity, node)
    }

    /// Spawns a static enemy.
    pub fn spawn_enemy(&mut self, position: Vec3, health: f32) -> Entity {
        spawn::spawn_enemy(self.app.world_mut(), position, health)
    }

    /// Forwards a device event to the input aggregator.
    pub fn handle_event(&mut self, event: RawInputEvent) {
        self.app
            .world_mut()
            .resource_mut::<InputAggregator>()
            .handle(event);
    }

    /// Runs one frame at host time `elapsed` seconds.
    ///
    /// Does nothing once the scene is disposed.
    pub fn frame(&mut self, elapsed: f32) {
        if self.disposed {
            return;
        }
        self.app
            .world_mut()
            .resource_mut::<FrameClock>()
            .advance(elapsed);
        self.app.update();
    }

    /// Sets one tunable parameter.
    ///
    /// # Errors
    /// See [`debug::tune`].
    pub fn tune(&mut self, path: &str, value: f32) -> Result<(), TuneError> {
        debug::tune(self.app.world_mut(), path, value)
    }

    /// Every tunable parameter with its current value.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        debug::parameters(self.app.world())
    }

    /// Whether the F1 panel is shown.
    #[must_use]
    pub fn debug_panel_visible(&self) -> bool {
        self.app.world().resource::<DebugPanel>().is_visible()
    }

    /// Cursor the host should display.
    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.app.world().resource::<InputAggregator>().cursor()
    }

    /// The player entity.
    #[must_use]
    pub const fn player(&self) -> Entity {
        self.player
    }

    /// The camera entity.
    #[must_use]
    pub const fn camera(&self) -> Entity {
        self.camera
    }

    /// Read access to the ECS world.
    #[must_use]
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Write access to the ECS world.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Current player position.
    #[must_use]
    pub fn player_position(&self) -> Option<Vec3> {
        self.world()
            .get::<Transform>(self.player)
            .map(|t| t.position)
    }

    /// Current camera rig state.
    #[must_use]
    pub fn camera_rig(&self) -> Option<CameraRig> {
        self.world().get::<CameraRig>(self.camera).copied()
    }

    /// Latest resolved camera pose.
    #[must_use]
    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.world().get::<CameraPose>(self.camera).copied()
    }

    /// Summary of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.world().resource::<FrameClock>().frames(),
            player: self.player_position(),
            health: self.world().get::<Health>(self.player).copied(),
            mode: self.camera_rig().map(|rig| rig.mode),
            pose: self.camera_pose(),
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tears the scene down: stops input, drops host nodes and camera, and
    /// despawns the scene's entities. Later frames are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let world = self.app.world_mut();
        world.resource_mut::<InputAggregator>().detach();
        world.resource_mut::<SceneNodes>().clear();
        world.resource_mut::<BoundCamera>().unbind();
        let despawned = spawn::despawn_scene(world);
        self.disposed = true;
        debug!("exploration scene disposed, {despawned} entities removed");
    }
}

impl Drop for ExplorationScene {
    fn drop(&mut self) {
        self.dispose();
    }
}
