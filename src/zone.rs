//! Safe-zone classification.
//!
//! The player's depth alone decides the camera mode: inside the safe zone
//! the camera is a fixed follow rig and forward progress is capped;
//! beyond it the camera orbits freely. There is a single threshold and no
//! hysteresis band, so a player jittering across the boundary flips modes
//! every frame.
use bevy_ecs::prelude::*;
use log::info;

use crate::camera::{CameraMode, CameraRig};
use crate::components::{Player, Transform};
use crate::config::ZoneSettings;

/// Outcome of classifying a player depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDecision {
    /// Camera mode for this depth.
    pub mode: CameraMode,
    /// Depth to snap the player back to, when they overshot the cap.
    pub snap_z: Option<f32>,
}

/// Classifies a player depth.
///
/// Depths above `threshold` are in the safe zone ([`CameraMode::Fixed`]);
/// there, depths beyond `safe_zone_cap` are snapped back to the cap.
///
/// # Examples
/// ```
/// use wayfarer::camera::CameraMode;
/// use wayfarer::config::ZoneSettings;
/// use wayfarer::zone::classify;
/// let settings = ZoneSettings::default();
/// let decision = classify(3.0, &settings);
/// assert_eq!(decision.mode, CameraMode::Fixed);
/// assert_eq!(decision.snap_z, Some(0.0));
/// assert_eq!(classify(-12.0, &settings).mode, CameraMode::Free);
/// ```
#[must_use]
pub fn classify(player_z: f32, settings: &ZoneSettings) -> ZoneDecision {
    if player_z > settings.threshold {
        ZoneDecision {
            mode: CameraMode::Fixed,
            snap_z: (player_z > settings.safe_zone_cap).then_some(settings.safe_zone_cap),
        }
    } else {
        ZoneDecision {
            mode: CameraMode::Free,
            snap_z: None,
        }
    }
}

/// Selects the camera mode from the player's depth and applies the forward
/// snap.
pub fn zone_system(
    settings: Res<ZoneSettings>,
    mut players: Query<&mut Transform, With<Player>>,
    mut rigs: Query<&mut CameraRig>,
) {
    let Ok(mut transform) = players.single_mut() else {
        return;
    };
    let decision = classify(transform.position.z, &settings);
    if let Some(z) = decision.snap_z {
        transform.position.z = z;
    }
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };
    if rig.mode != decision.mode {
        info!(
            "camera mode {:?} -> {:?} at z = {:.2}",
            rig.mode, decision.mode, transform.position.z
        );
        rig.mode = decision.mode;
    }
}
