//! Device input aggregation.
//!
//! The host pushes [`RawInputEvent`]s into the [`InputAggregator`] resource as
//! they arrive. Once per frame [`update_input_system`] folds the pending state
//! into the single [`InputState`] component, clearing edge-triggered flags as
//! it goes so downstream systems see each click or reset exactly once.
use bevy_ecs::prelude::*;
use glam::Vec2;
use hashbrown::HashSet;
use log::{debug, trace};

use crate::debug::DebugPanel;

mod event;

pub use event::{KeyCode, PointerButton, RawInputEvent, SurfaceRect};

/// Per-frame input snapshot read by movement and camera systems.
///
/// Held on the input entity; at most one is expected.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Strafe axis: -1 left, 1 right.
    pub movement_x: f32,
    /// Forward axis: 1 forward, -1 back.
    pub movement_y: f32,
    /// Jump (or climb while flying) held.
    pub jump: bool,
    /// Descend held.
    pub descend: bool,
    /// Pointer x in normalised device coordinates.
    pub mouse_x: f32,
    /// Pointer y in normalised device coordinates, up positive.
    pub mouse_y: f32,
    /// Raw pointer motion since the previous snapshot, in pixels.
    pub mouse_delta: Vec2,
    /// Primary click this frame.
    pub left_click: bool,
    /// Context-menu click this frame.
    pub right_click: bool,
    /// Normalised wheel motion this frame; positive zooms out.
    pub mouse_wheel: f32,
    /// Camera reset requested this frame.
    pub reset: bool,
}

impl InputState {
    /// Movement axes as a vector.
    #[must_use]
    pub const fn movement(&self) -> Vec2 {
        Vec2::new(self.movement_x, self.movement_y)
    }
}

/// Cursor shape the host should show over the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorStyle {
    /// Not listening; leave the host default.
    #[default]
    Default,
    /// Ready to drag.
    Grab,
    /// Primary button held.
    Grabbing,
}

/// Accumulates device events between frames.
///
/// Events are ignored until [`attach`](Self::attach) is called and again
/// after [`detach`](Self::detach).
#[derive(Resource, Debug, Default)]
pub struct InputAggregator {
    surface: Option<SurfaceRect>,
    held: HashSet<KeyCode>,
    pointer_down: bool,
    mouse: Vec2,
    mouse_delta: Vec2,
    wheel: f32,
    left_click: bool,
    right_click: bool,
    reset: bool,
    debug_toggle: bool,
    cursor: CursorStyle,
}

impl InputAggregator {
    /// Starts listening on `surface`.
    ///
    /// Re-attaching only replaces the rectangle used for normalisation.
    pub fn attach(&mut self, surface: SurfaceRect) {
        if self.surface.is_none() {
            debug!("input attached to {surface:?}");
            self.cursor = CursorStyle::Grab;
        }
        self.surface = Some(surface);
    }

    /// Stops listening and drops everything pending.
    pub fn detach(&mut self) {
        if self.surface.is_some() {
            debug!("input detached");
        }
        *self = Self::default();
    }

    /// Whether the aggregator is listening.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Current cursor shape.
    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Records one device event.
    pub fn handle(&mut self, event: RawInputEvent) {
        let Some(surface) = self.surface else {
            trace!("ignoring {event:?} while detached");
            return;
        };
        match event {
            RawInputEvent::KeyDown(key) => {
                self.held.insert(key);
                match key {
                    KeyCode::R => self.reset = true,
                    KeyCode::F1 => self.debug_toggle = true,
                    _ => {}
                }
            }
            RawInputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            RawInputEvent::PointerDown(PointerButton::Primary) => {
                self.pointer_down = true;
                self.cursor = CursorStyle::Grabbing;
            }
            RawInputEvent::PointerUp(PointerButton::Primary) => {
                self.pointer_down = false;
                self.cursor = CursorStyle::Grab;
            }
            RawInputEvent::PointerDown(_) | RawInputEvent::PointerUp(_) => {}
            RawInputEvent::PointerMove { client, movement } => {
                if let Some(ndc) = surface.normalise(client) {
                    self.mouse = ndc;
                }
                // Only a primary-button drag rotates; hovering just moves the pointer.
                if self.pointer_down {
                    self.mouse_delta += movement;
                }
            }
            RawInputEvent::Click(PointerButton::Primary) => self.left_click = true,
            RawInputEvent::Click(_) => {}
            RawInputEvent::ContextMenu => self.right_click = true,
            RawInputEvent::Wheel { delta_y } => {
                self.wheel += -delta_y * crate::WHEEL_SCALE;
            }
        }
    }

    fn held_any(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.held.contains(key))
    }

    fn axis(&self, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
        f32::from(i8::from(self.held_any(positive)) - i8::from(self.held_any(negative)))
    }

    /// Copies pending state into `state` and clears one-shot values.
    ///
    /// Edge flags, the accumulated pointer delta and the wheel are reset
    /// after the copy. Held keys and the pointer position persist.
    pub fn write_snapshot(&mut self, state: &mut InputState) {
        state.movement_x = self.axis(
            &[KeyCode::A, KeyCode::ArrowLeft],
            &[KeyCode::D, KeyCode::ArrowRight],
        );
        state.movement_y = self.axis(
            &[KeyCode::S, KeyCode::ArrowDown],
            &[KeyCode::W, KeyCode::ArrowUp],
        );
        state.jump = self.held_any(&[KeyCode::Space]);
        state.descend = self.held_any(&[KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        state.mouse_x = self.mouse.x;
        state.mouse_y = self.mouse.y;
        state.mouse_delta = std::mem::take(&mut self.mouse_delta);
        state.mouse_wheel = std::mem::take(&mut self.wheel);
        state.left_click = std::mem::take(&mut self.left_click);
        state.right_click = std::mem::take(&mut self.right_click);
        state.reset = std::mem::take(&mut self.reset);
    }

    /// Returns and clears the pending debug-panel toggle.
    pub fn take_debug_toggle(&mut self) -> bool {
        std::mem::take(&mut self.debug_toggle)
    }
}

/// Writes the aggregated input into the input entity.
///
/// A no-op until an input entity exists; pending edges stay queued.
pub fn update_input_system(
    mut aggregator: ResMut<InputAggregator>,
    mut inputs: Query<&mut InputState>,
    panel: Option<ResMut<DebugPanel>>,
) {
    let Ok(mut state) = inputs.single_mut() else {
        return;
    };
    aggregator.write_snapshot(&mut state);
    if aggregator.take_debug_toggle() {
        if let Some(mut panel) = panel {
            panel.toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn attached() -> InputAggregator {
        let mut aggregator = InputAggregator::default();
        aggregator.attach(SurfaceRect::sized(800.0, 600.0));
        aggregator
    }

    fn snapshot(aggregator: &mut InputAggregator) -> InputState {
        let mut state = InputState::default();
        aggregator.write_snapshot(&mut state);
        state
    }

    #[rstest]
    #[case::forward(&["KeyW"], 0.0, 1.0)]
    #[case::back_left(&["KeyS", "ArrowLeft"], -1.0, -1.0)]
    #[case::opposed(&["KeyA", "KeyD"], 0.0, 0.0)]
    #[case::arrows(&["ArrowRight", "ArrowUp"], 1.0, 1.0)]
    fn held_keys_map_to_axes(
        mut attached: InputAggregator,
        #[case] keys: &[&str],
        #[case] x: f32,
        #[case] y: f32,
    ) {
        for key in keys {
            attached.handle(RawInputEvent::key_down(key));
        }
        let state = snapshot(&mut attached);
        assert_relative_eq!(state.movement_x, x);
        assert_relative_eq!(state.movement_y, y);
    }

    #[rstest]
    fn edge_flags_fire_once(mut attached: InputAggregator) {
        attached.handle(RawInputEvent::Click(PointerButton::Primary));
        attached.handle(RawInputEvent::ContextMenu);
        attached.handle(RawInputEvent::key_down("KeyR"));
        let first = snapshot(&mut attached);
        assert!(first.left_click && first.right_click && first.reset);
        let second = snapshot(&mut attached);
        assert!(!second.left_click && !second.right_click && !second.reset);
    }

    #[rstest]
    fn held_keys_persist_across_snapshots(mut attached: InputAggregator) {
        attached.handle(RawInputEvent::key_down("Space"));
        assert!(snapshot(&mut attached).jump);
        assert!(snapshot(&mut attached).jump);
        attached.handle(RawInputEvent::key_up("Space"));
        assert!(!snapshot(&mut attached).jump);
    }

    #[rstest]
    fn wheel_is_scaled_inverted_and_decays(mut attached: InputAggregator) {
        attached.handle(RawInputEvent::Wheel { delta_y: 100.0 });
        assert_relative_eq!(snapshot(&mut attached).mouse_wheel, -1.0);
        assert_relative_eq!(snapshot(&mut attached).mouse_wheel, 0.0);
    }

    #[rstest]
    fn pointer_motion_accumulates_until_polled(mut attached: InputAggregator) {
        attached.handle(RawInputEvent::PointerDown(PointerButton::Primary));
        for _ in 0..3 {
            attached.handle(RawInputEvent::PointerMove {
                client: Vec2::new(600.0, 150.0),
                movement: Vec2::new(4.0, -2.0),
            });
        }
        let state = snapshot(&mut attached);
        assert_eq!(state.mouse_delta, Vec2::new(12.0, -6.0));
        assert_relative_eq!(state.mouse_x, 0.5);
        assert_relative_eq!(state.mouse_y, 0.5);
        assert_eq!(snapshot(&mut attached).mouse_delta, Vec2::ZERO);
    }

    #[rstest]
    fn hover_moves_pointer_without_dragging(mut attached: InputAggregator) {
        let hover = RawInputEvent::PointerMove {
            client: Vec2::new(200.0, 450.0),
            movement: Vec2::new(-80.0, 10.0),
        };
        attached.handle(hover);
        let idle = snapshot(&mut attached);
        assert_eq!(idle.mouse_delta, Vec2::ZERO);
        assert_relative_eq!(idle.mouse_x, -0.5);
        assert_relative_eq!(idle.mouse_y, -0.5);

        attached.handle(RawInputEvent::PointerDown(PointerButton::Secondary));
        attached.handle(hover);
        assert_eq!(snapshot(&mut attached).mouse_delta, Vec2::ZERO);

        attached.handle(RawInputEvent::PointerDown(PointerButton::Primary));
        attached.handle(hover);
        assert_eq!(snapshot(&mut attached).mouse_delta, Vec2::new(-80.0, 10.0));

        attached.handle(RawInputEvent::PointerUp(PointerButton::Primary));
        attached.handle(hover);
        assert_eq!(snapshot(&mut attached).mouse_delta, Vec2::ZERO);
    }

    #[rstest]
    fn cursor_tracks_primary_button(mut attached: InputAggregator) {
        assert_eq!(attached.cursor(), CursorStyle::Grab);
        attached.handle(RawInputEvent::PointerDown(PointerButton::Primary));
        assert_eq!(attached.cursor(), CursorStyle::Grabbing);
        attached.handle(RawInputEvent::PointerUp(PointerButton::Secondary));
        assert_eq!(attached.cursor(), CursorStyle::Grabbing);
        attached.handle(RawInputEvent::PointerUp(PointerButton::Primary));
        assert_eq!(attached.cursor(), CursorStyle::Grab);
    }

    #[test]
    fn events_before_attach_are_ignored() {
        let mut aggregator = InputAggregator::default();
        aggregator.handle(RawInputEvent::key_down("KeyW"));
        aggregator.handle(RawInputEvent::Click(PointerButton::Primary));
        aggregator.attach(SurfaceRect::sized(10.0, 10.0));
        let state = snapshot(&mut aggregator);
        assert_relative_eq!(state.movement_y, 0.0);
        assert!(!state.left_click);
    }

    #[rstest]
    fn detach_drops_pending_state(mut attached: InputAggregator) {
        attached.handle(RawInputEvent::key_down("KeyD"));
        attached.handle(RawInputEvent::key_down("F1"));
        attached.detach();
        assert!(!attached.is_attached());
        assert_eq!(attached.cursor(), CursorStyle::Default);
        assert!(!attached.take_debug_toggle());
        assert_relative_eq!(snapshot(&mut attached).movement_x, 0.0);
    }

    #[test]
    fn system_without_input_entity_keeps_edges_queued() {
        let mut world = World::new();
        let mut aggregator = attached();
        aggregator.handle(RawInputEvent::Click(PointerButton::Primary));
        world.insert_resource(aggregator);

        let mut schedule = Schedule::default();
        schedule.add_systems(update_input_system);
        schedule.run(&mut world);

        let entity = world.spawn(InputState::default()).id();
        schedule.run(&mut world);
        let state = world
            .get::<InputState>(entity)
            .unwrap_or_else(|| panic!("input state missing"));
        assert!(state.left_click);
    }
}
