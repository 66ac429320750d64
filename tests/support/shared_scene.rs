//! Thread-safe handle to an `ExplorationScene` for behavioural tests.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::{Vec2, Vec3};
use wayfarer::input::{InputState, SurfaceRect};
use wayfarer::{CameraMode, ExplorationScene, RawInputEvent};

/// Simulated frame rate.
pub const FPS: f32 = 60.0;

/// Wrapper that forwards `Send` and `Sync` because access is mutex-guarded.
pub struct ThreadSafeScene(pub ExplorationScene);

// SAFETY: rspec environments must be `Clone + Send + Sync` and the suites
// run serially. Every access to the scene goes through the mutex below, so
// the ECS app is never touched from two threads at once.
unsafe impl Send for ThreadSafeScene {}
unsafe impl Sync for ThreadSafeScene {}

/// Shared scene plus convenience drivers.
#[derive(Clone)]
pub struct SharedScene {
    inner: Arc<Mutex<ThreadSafeScene>>,
}

impl fmt::Debug for SharedScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.lock();
        f.debug_struct("SharedScene")
            .field("snapshot", &scene.0.snapshot())
            .finish()
    }
}

impl SharedScene {
    /// Wraps `scene`, attaching a 1280x720 input surface.
    pub fn new(mut scene: ExplorationScene) -> Self {
        scene.bind_surface(SurfaceRect::sized(1280.0, 720.0));
        Self {
            inner: Arc::new(Mutex::new(ThreadSafeScene(scene))),
        }
    }

    /// Locks the scene, recovering from a poisoned mutex.
    pub fn lock(&self) -> MutexGuard<'_, ThreadSafeScene> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances `frames` frames at [`FPS`].
    pub fn tick(&self, frames: u32) {
        let mut scene = self.lock();
        for _ in 0..frames {
            let next = scene.0.snapshot().frame;
            #[expect(clippy::cast_precision_loss, reason = "test frame counts stay small")]
            let elapsed = next as f32 / FPS;
            scene.0.frame(elapsed);
        }
    }

    /// Forwards `events` in order.
    pub fn send(&self, events: impl IntoIterator<Item = RawInputEvent>) {
        let mut scene = self.lock();
        for event in events {
            scene.0.handle_event(event);
        }
    }

    /// Moves the pointer to the centre of the surface.
    pub fn centre_pointer(&self) {
        self.send([RawInputEvent::PointerMove {
            client: Vec2::new(640.0, 360.0),
            movement: Vec2::ZERO,
        }]);
    }

    /// Current player position.
    pub fn player_position(&self) -> Vec3 {
        self.lock()
            .0
            .player_position()
            .unwrap_or_else(|| panic!("player missing"))
    }

    /// Teleports the player.
    pub fn place_player(&self, position: Vec3) {
        let mut scene = self.lock();
        let player = scene.0.player();
        let mut transform = scene
            .0
            .world_mut()
            .get_mut::<wayfarer::Transform>(player)
            .unwrap_or_else(|| panic!("player transform missing"));
        transform.position = position;
    }

    /// Current camera mode.
    pub fn mode(&self) -> CameraMode {
        self.lock()
            .0
            .camera_rig()
            .map(|rig| rig.mode)
            .unwrap_or_else(|| panic!("camera rig missing"))
    }

    /// The input snapshot written last frame.
    pub fn input(&self) -> InputState {
        let mut scene = self.lock();
        let world = scene.0.world_mut();
        let mut query = world.query::<&InputState>();
        query
            .single(world)
            .copied()
            .unwrap_or_else(|e| panic!("input entity missing: {e}"))
    }
}
