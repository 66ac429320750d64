//! Ground picking for click-to-move.
use glam::{Vec2, Vec3};

/// Perspective projection of the bound camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
}

/// Casts a ray through normalised device coordinates `ndc` from a camera at
/// `eye` looking at `look_at`, returning where it meets the plane
/// `y = ground`.
///
/// Returns `None` when the camera looks straight up or down along its
/// forward axis, or the ray points away from the plane.
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use wayfarer::movement::{pick_ground, Projection};
/// let projection = Projection { fov_y: 1.0, aspect: 1.0 };
/// let hit = pick_ground(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, projection, Vec2::ZERO, 0.0);
/// assert!(hit.is_some_and(|p| p.abs_diff_eq(Vec3::ZERO, 1e-4)));
/// ```
#[must_use]
pub fn pick_ground(
    eye: Vec3,
    look_at: Vec3,
    projection: Projection,
    ndc: Vec2,
    ground: f32,
) -> Option<Vec3> {
    let forward = (look_at - eye).try_normalize()?;
    let right = forward.cross(Vec3::Y).try_normalize()?;
    let up = right.cross(forward);
    let half_height = (projection.fov_y * 0.5).tan();
    let half_width = half_height * projection.aspect;
    let dir = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);
    if dir.y >= 0.0 {
        return None;
    }
    let t = (ground - eye.y) / dir.y;
    (t > 0.0).then(|| eye + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SQUARE: Projection = Projection {
        fov_y: std::f32::consts::FRAC_PI_2,
        aspect: 1.0,
    };

    #[test]
    fn screen_right_lands_right_of_centre() {
        let eye = Vec3::new(0.0, 10.0, 10.0);
        let centre = pick_ground(eye, Vec3::ZERO, SQUARE, Vec2::ZERO, 0.0)
            .unwrap_or_else(|| panic!("centre should hit"));
        let right = pick_ground(eye, Vec3::ZERO, SQUARE, Vec2::new(0.5, 0.0), 0.0)
            .unwrap_or_else(|| panic!("right should hit"));
        assert!(right.x > centre.x);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn honours_ground_height() {
        let hit = pick_ground(
            Vec3::new(0.0, 12.0, 10.0),
            Vec3::new(0.0, 2.0, 0.0),
            SQUARE,
            Vec2::ZERO,
            2.0,
        )
        .unwrap_or_else(|| panic!("expected a hit"));
        assert!(hit.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-4));
    }

    #[test]
    fn sky_misses() {
        let eye = Vec3::new(0.0, 2.0, 10.0);
        let look = Vec3::new(0.0, 2.0, 0.0);
        assert!(pick_ground(eye, look, SQUARE, Vec2::new(0.0, 0.9), 0.0).is_none());
    }

    #[test]
    fn vertical_view_has_no_basis() {
        assert!(pick_ground(Vec3::Y * 10.0, Vec3::ZERO, SQUARE, Vec2::ZERO, 0.0).is_none());
    }
}
