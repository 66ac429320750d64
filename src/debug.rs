//! Live tuning panel.
//!
//! F1 toggles the [`DebugPanel`]. While the host shows it, the panel lists
//! every numeric field of the camera, movement and zone settings as dotted
//! paths (`camera.distance`, `movement.bounds.max_x`) discovered through
//! reflection, and [`tune`] writes one of them back. A tuned value that would
//! break the settings' validity is rejected and the old value kept.
use bevy_ecs::prelude::*;
use bevy_reflect::{PartialReflect, ReflectMut, ReflectRef, Struct};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::config::{CameraSettings, ConfigError, MovementSettings, ZoneSettings};

/// Errors raised by [`tune`].
#[derive(Debug, Error)]
pub enum TuneError {
    /// No settings field lives at the path.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    /// The path names a field that is not an `f32`.
    #[error("parameter `{0}` is not numeric")]
    NotNumeric(String),
    /// The value is NaN or infinite.
    #[error("parameter `{path}` cannot be set to {value}")]
    NonFinite {
        /// Dotted parameter path.
        path: String,
        /// Rejected value.
        value: f32,
    },
    /// The value would leave the settings invalid.
    #[error("parameter `{path}` rejected: {source}")]
    Rejected {
        /// Dotted parameter path.
        path: String,
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
}

/// Visibility of the tuning panel.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DebugPanel {
    visible: bool,
}

impl DebugPanel {
    /// Flips visibility.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        info!(
            "debug panel {}",
            if self.visible { "shown" } else { "hidden" }
        );
    }

    /// Whether the host should show the panel.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// One tunable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Dotted path, e.g. `camera.min_distance`.
    pub path: String,
    /// Current value.
    pub value: f32,
}

fn collect(prefix: &str, settings: &dyn Struct, out: &mut Vec<Parameter>) {
    for index in 0..settings.field_len() {
        let (Some(name), Some(field)) = (settings.name_at(index), settings.field_at(index)) else {
            continue;
        };
        let path = format!("{prefix}.{name}");
        if let Some(value) = field.try_downcast_ref::<f32>() {
            out.push(Parameter {
                path,
                value: *value,
            });
        } else if let ReflectRef::Struct(nested) = field.reflect_ref() {
            collect(&path, nested, out);
        }
    }
}

/// Lists every numeric settings field present in `world`.
#[must_use]
pub fn parameters(world: &World) -> Vec<Parameter> {
    let mut out = Vec::new();
    if let Some(camera) = world.get_resource::<CameraSettings>() {
        collect("camera", camera, &mut out);
    }
    if let Some(movement) = world.get_resource::<MovementSettings>() {
        collect("movement", movement, &mut out);
    }
    if let Some(zone) = world.get_resource::<ZoneSettings>() {
        collect("zone", zone, &mut out);
    }
    out
}

fn field_slot<'a>(
    settings: &'a mut dyn Struct,
    path: &str,
    full: &str,
) -> Result<&'a mut dyn PartialReflect, TuneError> {
    let unknown = || TuneError::UnknownParameter(full.to_owned());
    match path.split_once('.') {
        None => settings.field_mut(path).ok_or_else(unknown),
        Some((head, rest)) => match settings.field_mut(head).ok_or_else(unknown)?.reflect_mut() {
            ReflectMut::Struct(nested) => field_slot(nested, rest, full),
            _ => Err(unknown()),
        },
    }
}

/// Sets the `f32` field at dotted `path` inside `settings`; errors name
/// the field by `full`.
fn set_parameter(
    settings: &mut dyn Struct,
    path: &str,
    full: &str,
    value: f32,
) -> Result<(), TuneError> {
    let slot = field_slot(settings, path, full)?
        .try_downcast_mut::<f32>()
        .ok_or_else(|| TuneError::NotNumeric(full.to_owned()))?;
    *slot = value;
    Ok(())
}

fn tune_settings<T>(
    world: &mut World,
    path: &str,
    rest: &str,
    value: f32,
    validate: fn(&T) -> Result<(), ConfigError>,
) -> Result<(), TuneError>
where
    T: Resource + Struct + Clone,
{
    let Some(current) = world.get_resource::<T>() else {
        return Err(TuneError::UnknownParameter(path.to_owned()));
    };
    let mut candidate = current.clone();
    set_parameter(&mut candidate, rest, path, value)?;
    validate(&candidate).map_err(|source| TuneError::Rejected {
        path: path.to_owned(),
        source,
    })?;
    world.insert_resource(candidate);
    debug!("tuned {path} = {value}");
    Ok(())
}

/// Sets the settings field at dotted `path` to `value`.
///
/// The group prefix (`camera`, `movement` or `zone`) selects the resource.
///
/// # Errors
/// Returns a [`TuneError`] for unknown or non-numeric paths, non-finite
/// values and values the settings' validation rejects. The resource is left
/// untouched on error.
pub fn tune(world: &mut World, path: &str, value: f32) -> Result<(), TuneError> {
    if !value.is_finite() {
        return Err(TuneError::NonFinite {
            path: path.to_owned(),
            value,
        });
    }
    let Some((group, rest)) = path.split_once('.') else {
        return Err(TuneError::UnknownParameter(path.to_owned()));
    };
    match group {
        "camera" => tune_settings(world, path, rest, value, CameraSettings::validate),
        "movement" => tune_settings(world, path, rest, value, MovementSettings::validate),
        "zone" => tune_settings(world, path, rest, value, ZoneSettings::validate),
        _ => Err(TuneError::UnknownParameter(path.to_owned())),
    }
}
