//! Behavioural tests for walking, zone transitions and click-to-move using
//! rust-rspec.
//!
//! Each scenario drives a full `ExplorationScene` through host events and
//! frames, then inspects the player and camera rig.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

#[path = "support/shared_scene.rs"]
mod shared_scene;

use approx::assert_relative_eq;
use glam::Vec3;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use shared_scene::SharedScene;
use test_utils::{RecordingCamera, ScriptedRaycaster};
use wayfarer::input::PointerButton;
use wayfarer::{CameraMode, ExplorationScene, MoveTarget, RawInputEvent, SimConfig};

fn bootstrap() -> SharedScene {
    let mut scene = ExplorationScene::new(SimConfig::default(), ScriptedRaycaster::empty());
    let (camera, _log) = RecordingCamera::new();
    scene.bind_camera(camera);
    SharedScene::new(scene)
}

#[test]
fn walking_out_of_the_safe_zone_frees_the_camera() {
    run_serial(&rspec::given(
        "a player standing at the origin",
        bootstrap(),
        |scenario: &mut Scenario<SharedScene>| {
            scenario.when("W is held for 30 frames", |ctx| {
                ctx.before_all(|state| {
                    state.send([RawInputEvent::key_down("KeyW")]);
                    state.tick(30);
                });

                ctx.then("the player walked forward along -Z", |state| {
                    let position = state.player_position();
                    assert_relative_eq!(position.z, -7.5, epsilon = 1e-4);
                    assert_relative_eq!(position.x, 0.0, epsilon = 1e-5);
                    assert_relative_eq!(position.y, 2.0, epsilon = 1e-5);
                });

                ctx.then("the camera orbits freely", |state| {
                    assert_eq!(state.mode(), CameraMode::Free);
                });
            });

            scenario.when("the player backs up past the safe-zone cap", |ctx| {
                ctx.before_all(|state| {
                    state.send([
                        RawInputEvent::key_up("KeyW"),
                        RawInputEvent::key_down("KeyS"),
                    ]);
                    state.tick(40);
                    state.send([RawInputEvent::key_up("KeyS")]);
                });

                ctx.then("the player is held at the cap", |state| {
                    assert_relative_eq!(state.player_position().z, 0.0, epsilon = 1e-5);
                });

                ctx.then("the camera returns to the fixed rig", |state| {
                    assert_eq!(state.mode(), CameraMode::Fixed);
                });
            });
        },
    ));
}

#[test]
fn clicks_are_visible_for_exactly_one_frame() {
    run_serial(&rspec::given(
        "an attached input surface",
        bootstrap(),
        |scenario: &mut Scenario<SharedScene>| {
            scenario.when("a click and a held key arrive before a frame", |ctx| {
                ctx.before_all(|state| {
                    state.send([
                        RawInputEvent::Click(PointerButton::Primary),
                        RawInputEvent::key_down("KeyD"),
                    ]);
                    state.tick(1);
                });

                ctx.then("the snapshot carries both", |state| {
                    let input = state.input();
                    assert!(input.left_click);
                    assert_relative_eq!(input.movement_x, 1.0);
                });
            });

            scenario.when("another frame passes", |ctx| {
                ctx.before_all(|state| state.tick(1));

                ctx.then("the click is gone but the key is still held", |state| {
                    let input = state.input();
                    assert!(!input.left_click);
                    assert_relative_eq!(input.movement_x, 1.0);
                });
            });
        },
    ));
}

fn move_target(state: &SharedScene) -> Option<Vec3> {
    let scene = state.lock();
    scene
        .0
        .world()
        .get::<MoveTarget>(scene.0.player())
        .and_then(|target| target.0)
}

#[test]
fn clicking_the_ground_walks_the_player_there() {
    run_serial(&rspec::given(
        "a fixed camera behind the player",
        bootstrap(),
        |scenario: &mut Scenario<SharedScene>| {
            scenario.when("the centre of the view is clicked", |ctx| {
                ctx.before_all(|state| {
                    state.tick(1);
                    state.centre_pointer();
                    state.send([RawInputEvent::Click(PointerButton::Primary)]);
                    state.tick(1);
                });

                ctx.then("a target ahead of the player is set", |state| {
                    let target = move_target(state)
                        .unwrap_or_else(|| panic!("expected a move target"));
                    assert_relative_eq!(target.x, 0.0, epsilon = 1e-4);
                    assert_relative_eq!(target.z, -15.0 / 7.0, epsilon = 1e-4);
                });

                ctx.then("the player has started walking", |state| {
                    assert_relative_eq!(state.player_position().z, -0.375, epsilon = 1e-4);
                });
            });

            scenario.when("enough frames pass to arrive", |ctx| {
                ctx.before_all(|state| state.tick(10));

                ctx.then("the player stands on the target", |state| {
                    assert_relative_eq!(state.player_position().z, -15.0 / 7.0, epsilon = 1e-4);
                });

                ctx.then("the target is cleared", |state| {
                    assert_eq!(move_target(state), None);
                });
            });

            scenario.when("a new target is cancelled by a right click", |ctx| {
                ctx.before_all(|state| {
                    state.send([RawInputEvent::Click(PointerButton::Primary)]);
                    state.tick(1);
                    state.send([RawInputEvent::ContextMenu]);
                    state.tick(1);
                });

                ctx.then("no target remains", |state| {
                    assert_eq!(move_target(state), None);
                });
            });
        },
    ));
}
