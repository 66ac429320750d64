use bevy_ecs::prelude::*;

use super::{CameraMode, CameraRig};
use crate::config::{CameraSettings, RotationPolicy};
use crate::input::InputState;
use crate::vector_math::{clamp_range, sensitivity_curve, wrap_angle};
use crate::{POINTER_DEADZONE, WHEEL_DEADZONE, WHEEL_ZOOM_STEP};

/// Applies one frame of camera input to `rig`.
///
/// Zoom and rotation respond only in [`CameraMode::Free`]; a reset applies
/// in either mode. Afterwards the vertical angle is clamped to its limits,
/// the horizontal angle wrapped and both distances clamped to the zoom
/// range, whatever the input.
pub fn apply_camera_input(rig: &mut CameraRig, input: &InputState, settings: &CameraSettings) {
    let (down, up) = settings.vertical_limits_rad();

    if rig.mode == CameraMode::Free {
        if input.mouse_wheel.abs() > WHEEL_DEADZONE {
            rig.target_distance += input.mouse_wheel * WHEEL_ZOOM_STEP;
        }
        match settings.rotation_policy {
            RotationPolicy::Inertia => {
                let power = settings.sensitivity_curve_power;
                let sensitivity = settings.sensitivity;
                rig.velocity_h -= sensitivity_curve(input.mouse_delta.x, power, sensitivity);
                rig.velocity_v += sensitivity_curve(input.mouse_delta.y, power, sensitivity);
                rig.rotation_h += rig.velocity_h;
                rig.rotation_v += rig.velocity_v;
                rig.velocity_h *= settings.damping;
                rig.velocity_v *= settings.damping;
            }
            RotationPolicy::Notched => {
                if input.mouse_delta.x.abs() > POINTER_DEADZONE {
                    rig.rotation_h -= input.mouse_delta.x.signum() * settings.notch_step;
                }
                // Pointer height spans the whole vertical range, bottom to top.
                let t = (input.mouse_y + 1.0) * 0.5;
                rig.rotation_v = t.mul_add(up - down, down);
            }
        }
    }

    if input.reset {
        rig.reset_rotation();
    }

    // Velocity pushing past a limit would otherwise keep pressing against it.
    if rig.rotation_v <= down || rig.rotation_v >= up {
        rig.velocity_v = 0.0;
    }
    rig.rotation_v = clamp_range(rig.rotation_v, down, up);
    rig.rotation_h = wrap_angle(rig.rotation_h);
    rig.target_distance =
        clamp_range(rig.target_distance, settings.min_distance, settings.max_distance);
    rig.actual_distance =
        clamp_range(rig.actual_distance, settings.min_distance, settings.max_distance);
}

/// Feeds the frame's input snapshot into the camera rig.
///
/// A no-op without a rig or an input entity.
pub fn camera_input_system(
    settings: Res<CameraSettings>,
    inputs: Query<&InputState>,
    mut rigs: Query<&mut CameraRig>,
) {
    let Ok(input) = inputs.single() else {
        return;
    };
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };
    apply_camera_input(&mut rig, input, &settings);
}
