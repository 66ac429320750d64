//! Physics doubles for occlusion tests.

use glam::Vec3;
use wayfarer::physics::{RayHit, Raycaster};

/// Raycaster reporting a hit at a fixed distance along every segment long
/// enough to reach it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedRaycaster {
    hit_distance: Option<f32>,
}

impl ScriptedRaycaster {
    /// A world with nothing in it.
    #[must_use]
    pub const fn empty() -> Self {
        Self { hit_distance: None }
    }

    /// A world whose every ray is blocked `distance` from its origin.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use test_utils::ScriptedRaycaster;
    /// use wayfarer::physics::Raycaster;
    /// let wall = ScriptedRaycaster::blocked_at(4.0);
    /// let hit = wall.raycast(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
    /// assert_eq!(hit.map(|h| h.distance), Some(4.0));
    /// ```
    #[must_use]
    pub const fn blocked_at(distance: f32) -> Self {
        Self {
            hit_distance: Some(distance),
        }
    }
}

impl Raycaster for ScriptedRaycaster {
    fn raycast(&self, origin: Vec3, target: Vec3) -> Option<RayHit> {
        let distance = self.hit_distance?;
        let segment = target - origin;
        if segment.length() < distance {
            return None;
        }
        Some(RayHit {
            distance,
            point: origin + segment.normalize_or_zero() * distance,
        })
    }
}
