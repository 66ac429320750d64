//! Library crate providing the exploration-mode simulation core.
//! Re-exports the components, systems and scene pipeline used by the binary
//! and by host integrations.
pub mod camera;
pub mod components;
pub mod config;
pub mod constants;
pub mod debug;
pub mod frame;
pub mod input;
pub mod logging;
pub mod movement;
pub mod physics;
pub mod plugin;
pub mod render;
pub mod scene;
pub mod spawn;
pub mod vector_math;
pub mod zone;
pub use constants::*;

// Re-export commonly used items
pub use camera::{CameraMode, CameraPose, CameraRig};
pub use components::{
    Enemy, Flying, Health, MoveTarget, MovementStats, Player, Renderable, Transform,
};
pub use config::{ConfigError, SimConfig};
pub use debug::{DebugPanel, TuneError};
pub use input::{InputAggregator, InputState, RawInputEvent, SurfaceRect};
pub use logging::init as init_logging;
pub use physics::{Aabb, PhysicsWorld, RayHit, Raycaster, StaticColliders};
pub use plugin::{ExplorationPlugin, ExplorationSet};
pub use render::{SceneCamera, SceneNode};
pub use scene::{ExplorationScene, FrameSnapshot};
pub use zone::{classify, ZoneDecision};

pub mod prelude {
    //! Prelude exports used in documentation examples and host code.
    //!
    //! ```rust,no_run
    //! use wayfarer::prelude::*;
    //! let scene = ExplorationScene::new(SimConfig::default(), StaticColliders::new());
    //! # drop(scene);
    //! ```

    pub use crate::camera::{CameraMode, CameraPose};
    pub use crate::config::SimConfig;
    pub use crate::input::{KeyCode, PointerButton, RawInputEvent, SurfaceRect};
    pub use crate::physics::{Aabb, StaticColliders};
    pub use crate::render::{SceneCamera, SceneNode};
    pub use crate::scene::ExplorationScene;
    pub use glam::{Vec2, Vec3};
}
