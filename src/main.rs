//! Headless driver for the exploration simulation.
//!
//! Runs a scripted session against a built-in collider set: the player walks
//! out of the safe zone, drags to orbit and zooms the free camera, then
//! resets it.
//! Snapshots are logged as JSON.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use wayfarer::prelude::*;
use wayfarer::init_logging;

/// Frames between logged snapshots.
const SNAPSHOT_INTERVAL: u32 = 30;

/// Exploration-mode simulation core
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML configuration file; defaults are used when absent or unreadable
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Frames to simulate
    #[arg(short, long, default_value_t = 240)]
    frames: u32,
    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Fail instead of falling back to defaults on a bad config
    #[arg(long)]
    strict: bool,
}

/// Camera that logs where it is told to look.
struct LoggedCamera;

impl SceneCamera for LoggedCamera {
    fn set_pose(&mut self, position: Vec3, look_at: Vec3) {
        debug!("camera at {position} looking at {look_at}");
    }
}

/// Node that logs the transforms pushed to it.
struct LoggedNode(&'static str);

impl SceneNode for LoggedNode {
    fn sync(&mut self, position: Vec3, _rotation: Vec3, _scale: Vec3) {
        log::trace!("{} at {position}", self.0);
    }
}

fn load_config(args: &Args) -> Result<SimConfig> {
    match &args.config {
        Some(path) if args.strict => {
            SimConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        Some(path) => Ok(SimConfig::load_or_default(path)),
        None => Ok(SimConfig::default()),
    }
}

fn environment() -> StaticColliders {
    StaticColliders::new()
        .with_ground_plane(0.0)
        .with_box(Aabb::from_center_size(
            Vec3::new(-6.0, 3.0, -20.0),
            Vec3::new(4.0, 6.0, 4.0),
        ))
        .with_box(Aabb::from_center_size(
            Vec3::new(8.0, 5.0, -35.0),
            Vec3::new(6.0, 10.0, 6.0),
        ))
}

/// Input for scripted frame `frame` of `total`.
fn script(frame: u32, total: u32) -> Vec<RawInputEvent> {
    let quarter = (total / 4).max(1);
    let mut events = Vec::new();
    if frame == 0 {
        events.push(RawInputEvent::key_down("KeyW"));
    }
    if frame == quarter * 2 {
        events.push(RawInputEvent::key_up("KeyW"));
        events.push(RawInputEvent::PointerDown(PointerButton::Primary));
    }
    if (quarter * 2..quarter * 3).contains(&frame) {
        events.push(RawInputEvent::PointerMove {
            client: Vec2::new(640.0, 300.0),
            movement: Vec2::new(-12.0, 2.0),
        });
    }
    if frame == quarter * 2 + 5 {
        events.push(RawInputEvent::Wheel { delta_y: -300.0 });
    }
    if frame == quarter * 3 {
        events.push(RawInputEvent::PointerUp(PointerButton::Primary));
        events.push(RawInputEvent::key_down("KeyR"));
        events.push(RawInputEvent::key_up("KeyR"));
    }
    events
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !init_logging(args.verbose) {
        warn!("logger already installed; keeping existing configuration");
    }
    anyhow::ensure!(args.fps > 0.0, "--fps must be positive");

    let config = load_config(&args)?;
    let mut scene = ExplorationScene::new(config, environment());
    scene.bind_surface(SurfaceRect::sized(1280.0, 720.0));
    scene.bind_camera(Box::new(LoggedCamera));
    let player = scene.player();
    scene.attach_node(player, Box::new(LoggedNode("player")));
    let enemy = scene.spawn_enemy(Vec3::new(4.0, 2.0, -30.0), 50.0);
    scene.attach_node(enemy, Box::new(LoggedNode("enemy")));

    let step = 1.0 / args.fps;
    for frame in 0..args.frames {
        for event in script(frame, args.frames) {
            scene.handle_event(event);
        }
        #[expect(clippy::cast_precision_loss, reason = "frame counts stay small")]
        let elapsed = frame as f32 * step;
        scene.frame(elapsed);
        if frame % SNAPSHOT_INTERVAL == 0 || frame + 1 == args.frames {
            info!("{}", serde_json::to_string(&scene.snapshot())?);
        }
    }

    scene.dispose();
    info!("simulated {} frames", args.frames);
    Ok(())
}
