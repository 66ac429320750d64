//! Utility helpers for tests.
//!
//! Recording doubles for the presentation and physics collaborators, so
//! integration tests can observe what the simulation pushes outward.
pub mod physics;
pub mod scene;

pub use physics::ScriptedRaycaster;
pub use scene::{CameraLog, NodeLog, RecordingCamera, RecordingNode};
