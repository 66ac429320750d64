//! Runtime configuration for the exploration simulation.
//!
//! Every tunable of the camera rig, movement resolver and zone classifier
//! lives in a settings resource. The resources are grouped into
//! [`SimConfig`], which loads from TOML with every field defaulted, so a
//! config file only needs to mention what it overrides:
//!
//! ```toml
//! [camera]
//! rotation_policy = "notched"
//! max_distance = 30.0
//!
//! [camera.deadband]
//! enabled = true
//! ```
//!
//! Product variants observed in the field (inertia or notched rotation,
//! camera-relative or world-axis movement, with or without deadband) are
//! selected here rather than by separate code paths.

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use bevy_reflect::Reflect;
use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`SimConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Fails with [`ConfigError::Invalid`] unless `condition` holds.
fn ensure(condition: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, reason))
    }
}

/// How pointer motion turns into camera rotation in free mode.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Pointer deltas feed an angular velocity that decays by `damping`.
    #[default]
    Inertia,
    /// Horizontal rotation steps by `notch_step`; vertical rotation follows
    /// the absolute pointer height.
    Notched,
}

/// Where the camera sits in fixed (safe zone) mode.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FixedFraming {
    /// Behind the player along +Z.
    #[default]
    Behind,
    /// Beside the player along +X, for a side-scrolling look.
    Side,
}

/// Tolerance radii and smoothing rates of the anti-motion-sickness
/// deadband.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeadbandSettings {
    /// Whether the free camera lags the player inside the play radii.
    pub enabled: bool,
    /// Radius within which the look-at point ignores player motion.
    pub look_play_distance: f32,
    /// Slack around the resolved orbit distance before the camera moves.
    pub camera_play_distance: f32,
    /// Catch-up rate per second when the player moves away.
    pub follow_smooth: f32,
    /// Retreat rate per second when the player comes too close.
    pub leave_smooth: f32,
}

impl Default for DeadbandSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            look_play_distance: 0.5,
            camera_play_distance: 1.0,
            follow_smooth: 2.0,
            leave_smooth: 4.0,
        }
    }
}

/// Camera rig tuning shared by the camera input and follow systems.
#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Base orbit distance, also used as the fixed-mode offset.
    pub distance: f32,
    /// Height added above the orbit.
    pub height: f32,
    /// Pointer sensitivity fed into the response curve.
    pub sensitivity: f32,
    /// Exponent of the pointer response curve.
    pub sensitivity_curve_power: f32,
    /// Per-frame decay of angular velocity in the inertia policy.
    pub damping: f32,
    /// Highest vertical angle, in degrees.
    pub vertical_limit_up: f32,
    /// Lowest vertical angle, in degrees.
    pub vertical_limit_down: f32,
    /// Closest zoom and occlusion distance.
    pub min_distance: f32,
    /// Furthest zoom distance.
    pub max_distance: f32,
    /// Height of the look-at point above the player's feet in free mode.
    pub look_at_offset: f32,
    /// Height of the look-at point above the player's feet in fixed mode.
    pub fixed_look_offset: f32,
    /// Horizontal step of the notched policy, in radians.
    pub notch_step: f32,
    /// Vertical field of view of the bound camera, in degrees.
    pub fov_degrees: f32,
    /// Width over height of the render surface.
    pub aspect_ratio: f32,
    /// Rotation response in free mode.
    pub rotation_policy: RotationPolicy,
    /// Fixed-mode placement.
    pub fixed_framing: FixedFraming,
    /// Deadband variant of the follow camera.
    pub deadband: DeadbandSettings,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 15.0,
            height: 8.0,
            sensitivity: 0.001,
            sensitivity_curve_power: 1.0,
            damping: 0.9,
            vertical_limit_up: 60.0,
            vertical_limit_down: -30.0,
            min_distance: 3.0,
            max_distance: 25.0,
            look_at_offset: 1.0,
            fixed_look_offset: 1.0,
            notch_step: 0.02,
            fov_degrees: 75.0,
            aspect_ratio: 16.0 / 9.0,
            rotation_policy: RotationPolicy::Inertia,
            fixed_framing: FixedFraming::Behind,
            deadband: DeadbandSettings::default(),
        }
    }
}

impl CameraSettings {
    /// Vertical limits converted to radians, as `(down, up)`.
    #[must_use]
    pub fn vertical_limits_rad(&self) -> (f32, f32) {
        (
            self.vertical_limit_down.to_radians(),
            self.vertical_limit_up.to_radians(),
        )
    }

    /// Checks the settings for values the camera rig cannot honour.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.min_distance > 0.0,
            "camera.min_distance",
            "must be positive",
        )?;
        ensure(
            self.min_distance <= self.max_distance,
            "camera.max_distance",
            "must not be below min_distance",
        )?;
        ensure(
            (self.min_distance..=self.max_distance).contains(&self.distance),
            "camera.distance",
            "must lie within [min_distance, max_distance]",
        )?;
        ensure(
            self.vertical_limit_down < self.vertical_limit_up,
            "camera.vertical_limit_up",
            "must exceed vertical_limit_down",
        )?;
        ensure(
            self.vertical_limit_down >= -90.0 && self.vertical_limit_up <= 90.0,
            "camera.vertical_limit_up",
            "vertical limits must stay within [-90, 90] degrees",
        )?;
        ensure(
            (0.0..1.0).contains(&self.damping),
            "camera.damping",
            "must lie within [0, 1)",
        )?;
        ensure(
            self.sensitivity >= 0.0,
            "camera.sensitivity",
            "must not be negative",
        )?;
        ensure(
            self.sensitivity_curve_power > 0.0,
            "camera.sensitivity_curve_power",
            "must be positive",
        )?;
        ensure(
            self.fov_degrees > 0.0 && self.fov_degrees < 180.0,
            "camera.fov_degrees",
            "must lie within (0, 180)",
        )?;
        ensure(
            self.aspect_ratio > 0.0,
            "camera.aspect_ratio",
            "must be positive",
        )?;
        let deadband = &self.deadband;
        ensure(
            deadband.look_play_distance >= 0.0 && deadband.camera_play_distance >= 0.0,
            "camera.deadband",
            "play distances must not be negative",
        )?;
        ensure(
            deadband.follow_smooth >= 0.0 && deadband.leave_smooth >= 0.0,
            "camera.deadband",
            "smoothing rates must not be negative",
        )
    }
}

/// Frame of reference for WASD movement.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementFrame {
    /// Axes rotated by the camera's horizontal heading.
    #[default]
    CameraRelative,
    /// Axes fixed to world X and Z.
    WorldAxes,
}

/// Axis-aligned box the player is confined to.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WorldBounds {
    /// Lowest x coordinate.
    pub min_x: f32,
    /// Highest x coordinate.
    pub max_x: f32,
    /// Lowest y coordinate.
    pub min_y: f32,
    /// Highest y coordinate.
    pub max_y: f32,
    /// Lowest z coordinate.
    pub min_z: f32,
    /// Highest z coordinate; the default of 5 keeps the player from leaving
    /// the safe zone forwards.
    pub max_z: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -80.0,
            max_x: 80.0,
            min_y: 0.5,
            max_y: 50.0,
            min_z: -80.0,
            max_z: 5.0,
        }
    }
}

impl WorldBounds {
    /// Clamps a position into the box.
    #[must_use]
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.min(self.max_x).max(self.min_x),
            position.y.min(self.max_y).max(self.min_y),
            position.z.min(self.max_z).max(self.min_z),
        )
    }
}

/// Movement resolver tuning.
#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MovementSettings {
    /// Frame of reference for WASD input.
    pub frame: MovementFrame,
    /// Height the player stands at when grounded.
    pub ground_level: f32,
    /// Height lost per frame while airborne.
    pub gravity_step: f32,
    /// Height gained or lost per frame while flying.
    pub flight_speed: f32,
    /// Speed multiplier for click-to-move.
    pub auto_move_factor: f32,
    /// Box the player is clamped to every frame.
    pub bounds: WorldBounds,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            frame: MovementFrame::CameraRelative,
            ground_level: 2.0,
            gravity_step: 0.05,
            flight_speed: 0.3,
            auto_move_factor: 1.5,
            bounds: WorldBounds::default(),
        }
    }
}

impl MovementSettings {
    /// Checks the settings for values the resolver cannot honour.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounds;
        ensure(
            b.min_x <= b.max_x && b.min_y <= b.max_y && b.min_z <= b.max_z,
            "movement.bounds",
            "each minimum must not exceed its maximum",
        )?;
        ensure(
            self.gravity_step >= 0.0,
            "movement.gravity_step",
            "must not be negative",
        )?;
        ensure(
            self.flight_speed >= 0.0,
            "movement.flight_speed",
            "must not be negative",
        )?;
        ensure(
            self.auto_move_factor > 0.0,
            "movement.auto_move_factor",
            "must be positive",
        )
    }
}

/// Depth thresholds of the zone classifier.
#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ZoneSettings {
    /// Player depths above this are inside the safe zone.
    pub threshold: f32,
    /// Forward limit inside the safe zone; deeper-forward players are
    /// snapped back to it.
    pub safe_zone_cap: f32,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            threshold: -5.0,
            safe_zone_cap: 0.0,
        }
    }
}

impl ZoneSettings {
    /// Checks the thresholds are usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a threshold is not finite or
    /// the cap lies outside the safe zone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.threshold.is_finite() && self.safe_zone_cap.is_finite(),
            "zone.threshold",
            "thresholds must be finite",
        )?;
        ensure(
            self.safe_zone_cap > self.threshold,
            "zone.safe_zone_cap",
            "must lie inside the safe zone",
        )
    }
}

/// Initial state of the spawned player.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerSettings {
    /// Spawn position.
    pub spawn: Vec3,
    /// Horizontal distance per frame.
    pub move_speed: f32,
    /// Jump height above ground.
    pub jump_height: f32,
    /// Starting and maximum health.
    pub max_health: f32,
    /// Whether the player starts in flight locomotion.
    pub flying: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 2.0, 0.0),
            move_speed: 0.25,
            jump_height: 0.8,
            max_health: 100.0,
            flying: false,
        }
    }
}

/// Complete simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Camera rig tuning.
    pub camera: CameraSettings,
    /// Movement resolver tuning.
    pub movement: MovementSettings,
    /// Zone classifier thresholds.
    pub zone: ZoneSettings,
    /// Player spawn parameters.
    pub player: PlayerSettings,
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`SimConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads a config file, falling back to defaults when it is unusable.
    ///
    /// Failures are logged rather than returned: a broken config degrades
    /// the session to default tuning instead of stopping it.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}; continuing with default configuration");
            Self::default()
        })
    }

    /// Validates every settings group.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.movement.validate()?;
        self.zone.validate()?;
        ensure(
            self.player.move_speed >= 0.0 && self.player.jump_height >= 0.0,
            "player.move_speed",
            "speeds must not be negative",
        )?;
        ensure(
            self.player.max_health > 0.0,
            "player.max_health",
            "must be positive",
        )
    }
}
