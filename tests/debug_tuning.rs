//! Live parameter tuning through the scene's debug surface.

use approx::assert_relative_eq;
use rstest::{fixture, rstest};
use test_utils::ScriptedRaycaster;
use wayfarer::input::SurfaceRect;
use wayfarer::{ExplorationScene, RawInputEvent, SimConfig, TuneError};

#[fixture]
fn scene() -> ExplorationScene {
    let mut scene = ExplorationScene::new(SimConfig::default(), ScriptedRaycaster::empty());
    scene.bind_surface(SurfaceRect::sized(800.0, 600.0));
    scene
}

fn value_of(scene: &ExplorationScene, path: &str) -> Option<f32> {
    scene
        .parameters()
        .into_iter()
        .find(|parameter| parameter.path == path)
        .map(|parameter| parameter.value)
}

#[rstest]
fn parameters_cover_every_settings_group(scene: ExplorationScene) {
    let parameters = scene.parameters();
    for group in ["camera.", "movement.", "zone."] {
        assert!(
            parameters.iter().any(|p| p.path.starts_with(group)),
            "no {group} parameters listed"
        );
    }
    assert_eq!(value_of(&scene, "camera.distance"), Some(15.0));
    assert_eq!(value_of(&scene, "movement.bounds.min_z"), Some(-80.0));
}

#[rstest]
fn surface_aspect_is_adopted(scene: ExplorationScene) {
    let aspect = value_of(&scene, "camera.aspect_ratio").unwrap_or_default();
    assert_relative_eq!(aspect, 800.0 / 600.0);
}

#[rstest]
#[case("camera.max_distance", 40.0)]
#[case("movement.gravity_step", 0.1)]
#[case("movement.bounds.max_z", 10.0)]
#[case("zone.threshold", -8.0)]
fn accepted_values_are_applied(
    mut scene: ExplorationScene,
    #[case] path: &str,
    #[case] value: f32,
) {
    assert!(scene.tune(path, value).is_ok());
    assert_eq!(value_of(&scene, path), Some(value));
}

#[rstest]
fn rejected_value_leaves_settings_untouched(mut scene: ExplorationScene) {
    let result = scene.tune("camera.min_distance", 30.0);
    assert!(matches!(result, Err(TuneError::Rejected { .. })));
    assert_eq!(value_of(&scene, "camera.min_distance"), Some(3.0));
}

#[rstest]
#[case("camera.nope")]
#[case("lighting.intensity")]
#[case("distance")]
fn unknown_paths_are_reported(mut scene: ExplorationScene, #[case] path: &str) {
    assert!(matches!(
        scene.tune(path, 1.0),
        Err(TuneError::UnknownParameter(_))
    ));
}

#[rstest]
fn non_finite_values_are_refused(mut scene: ExplorationScene) {
    assert!(matches!(
        scene.tune("camera.damping", f32::NAN),
        Err(TuneError::NonFinite { .. })
    ));
}

#[rstest]
fn tuned_gravity_changes_the_fall(mut scene: ExplorationScene) {
    assert!(scene.tune("movement.gravity_step", 0.5).is_ok());
    let player = scene.player();
    if let Some(mut transform) = scene.world_mut().get_mut::<wayfarer::Transform>(player) {
        transform.position.y = 6.0;
    }
    scene.frame(0.0);
    let y = scene.player_position().map_or(f32::NAN, |p| p.y);
    assert_relative_eq!(y, 5.5, epsilon = 1e-5);
}

#[rstest]
fn f1_toggles_the_panel(mut scene: ExplorationScene) {
    assert!(!scene.debug_panel_visible());
    scene.handle_event(RawInputEvent::key_down("F1"));
    scene.frame(0.0);
    assert!(scene.debug_panel_visible());
    scene.handle_event(RawInputEvent::key_up("F1"));
    scene.frame(1.0 / 60.0);
    assert!(scene.debug_panel_visible(), "holding F1 must not re-toggle");
    scene.handle_event(RawInputEvent::key_down("F1"));
    scene.frame(2.0 / 60.0);
    assert!(!scene.debug_panel_visible());
}
