//! Physics collaborator consulted by the camera rig.
//!
//! The simulation never owns physics bodies. It steps the world once per
//! frame and issues segment raycasts for camera occlusion, both through the
//! [`Raycaster`] trait so hosts can plug in a full solver. [`StaticColliders`]
//! is the built-in implementation: a ground plane plus static boxes, which is
//! all the exploration environment registers.
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::trace;

use crate::frame::FrameClock;

/// Direction components below this magnitude are treated as parallel to a
/// slab.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Nearest intersection along a raycast segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Raycast and step entry points of a physics world.
pub trait Raycaster: Send + Sync {
    /// Casts a segment from `origin` to `target`.
    ///
    /// Returns the nearest hit strictly in front of the origin and no
    /// further than the target, or `None`.
    fn raycast(&self, origin: Vec3, target: Vec3) -> Option<RayHit>;

    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, _dt: f32) {}
}

/// Axis-aligned static box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box centred on `center` with the given full extents.
    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Entry distance of the unit ray `origin + dir * t`, if it enters the
    /// box at some `t > 0`. Rays starting inside never report a hit.
    fn entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let slabs = origin
            .to_array()
            .into_iter()
            .zip(dir.to_array())
            .zip(self.min.to_array().into_iter().zip(self.max.to_array()));
        for ((o, d), (lo, hi)) in slabs {
            if d.abs() < PARALLEL_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        (t_near <= t_far && t_near > 0.0).then_some(t_near)
    }
}

/// Ground plane and static boxes.
#[derive(Debug, Clone, Default)]
pub struct StaticColliders {
    ground: Option<f32>,
    boxes: Vec<Aabb>,
}

impl StaticColliders {
    /// Empty world without a ground plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an infinite horizontal plane at height `y`, blocking from above.
    #[must_use]
    pub const fn with_ground_plane(mut self, y: f32) -> Self {
        self.ground = Some(y);
        self
    }

    /// Registers a static box.
    pub fn add_box(&mut self, collider: Aabb) {
        self.boxes.push(collider);
    }

    /// Builder form of [`add_box`](Self::add_box).
    #[must_use]
    pub fn with_box(mut self, collider: Aabb) -> Self {
        self.add_box(collider);
        self
    }

    fn ground_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let plane = self.ground?;
        if dir.y >= -PARALLEL_EPSILON || origin.y <= plane {
            return None;
        }
        Some((plane - origin.y) / dir.y)
    }
}

impl Raycaster for StaticColliders {
    fn raycast(&self, origin: Vec3, target: Vec3) -> Option<RayHit> {
        let segment = target - origin;
        let length = segment.length();
        if length <= 0.0 || !length.is_finite() {
            return None;
        }
        let dir = segment / length;
        let nearest = self
            .boxes
            .iter()
            .filter_map(|b| b.entry(origin, dir))
            .chain(self.ground_entry(origin, dir))
            .filter(|t| *t <= length)
            .min_by(f32::total_cmp)?;
        Some(RayHit {
            distance: nearest,
            point: origin + dir * nearest,
        })
    }
}

/// Resource wrapping the injected physics world.
#[derive(Resource)]
pub struct PhysicsWorld {
    inner: Box<dyn Raycaster>,
    stepped: f32,
}

impl PhysicsWorld {
    /// Wraps a physics implementation.
    #[must_use]
    pub fn new(inner: impl Raycaster + 'static) -> Self {
        Self::from_boxed(Box::new(inner))
    }

    /// Wraps an already boxed implementation.
    #[must_use]
    pub fn from_boxed(inner: Box<dyn Raycaster>) -> Self {
        Self {
            inner,
            stepped: 0.0,
        }
    }

    /// Total simulated time handed to [`Raycaster::step`].
    #[must_use]
    pub const fn stepped_time(&self) -> f32 {
        self.stepped
    }

    /// Casts a segment against the wrapped world.
    #[must_use]
    pub fn raycast(&self, origin: Vec3, target: Vec3) -> Option<RayHit> {
        self.inner.raycast(origin, target)
    }

    /// Steps the wrapped world.
    pub fn step(&mut self, dt: f32) {
        self.inner.step(dt);
        self.stepped += dt;
    }
}

/// Steps the physics world by the clamped frame delta.
///
/// Runs before every other simulation system so raycasts within a frame see
/// a consistent world.
pub fn physics_step_system(clock: Res<FrameClock>, physics: Option<ResMut<PhysicsWorld>>) {
    let Some(mut physics) = physics else {
        return;
    };
    let dt = clock.physics_delta();
    if dt > 0.0 {
        trace!("physics step {dt:.4}s");
        physics.step(dt);
    }
}
