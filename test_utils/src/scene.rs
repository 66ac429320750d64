//! Recording scene-graph node and camera.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec3;
use wayfarer::render::{SceneCamera, SceneNode};

/// Transform pushed to a node in one sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSync {
    /// Synced position.
    pub position: Vec3,
    /// Synced Euler rotation.
    pub rotation: Vec3,
    /// Synced scale.
    pub scale: Vec3,
}

/// Shared handle to the syncs a [`RecordingNode`] received.
#[derive(Clone, Debug, Default)]
pub struct NodeLog(Arc<Mutex<Vec<NodeSync>>>);

impl NodeLog {
    /// All syncs so far, oldest first.
    #[must_use]
    pub fn syncs(&self) -> Vec<NodeSync> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent sync.
    #[must_use]
    pub fn last(&self) -> Option<NodeSync> {
        self.syncs().last().copied()
    }

    /// Number of syncs received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.syncs().len()
    }

    /// Whether no sync arrived yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scene node that records every sync into a [`NodeLog`].
#[derive(Debug, Default)]
pub struct RecordingNode {
    log: NodeLog,
}

impl RecordingNode {
    /// Creates a node and the handle observing it.
    ///
    /// # Examples
    /// ```
    /// use test_utils::RecordingNode;
    /// let (node, log) = RecordingNode::new();
    /// assert!(log.is_empty());
    /// # drop(node);
    /// ```
    #[must_use]
    pub fn new() -> (Box<Self>, NodeLog) {
        let node = Self::default();
        let log = node.log.clone();
        (Box::new(node), log)
    }
}

impl SceneNode for RecordingNode {
    fn sync(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.log
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NodeSync {
                position,
                rotation,
                scale,
            });
    }
}

/// Shared handle to the poses a [`RecordingCamera`] received.
#[derive(Clone, Debug, Default)]
pub struct CameraLog(Arc<Mutex<Vec<(Vec3, Vec3)>>>);

impl CameraLog {
    /// All `(position, look_at)` pairs so far, oldest first.
    #[must_use]
    pub fn poses(&self) -> Vec<(Vec3, Vec3)> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent pose.
    #[must_use]
    pub fn last(&self) -> Option<(Vec3, Vec3)> {
        self.poses().last().copied()
    }
}

/// Native camera stand-in recording every pose.
#[derive(Debug, Default)]
pub struct RecordingCamera {
    log: CameraLog,
}

impl RecordingCamera {
    /// Creates a camera and the handle observing it.
    #[must_use]
    pub fn new() -> (Box<Self>, CameraLog) {
        let camera = Self::default();
        let log = camera.log.clone();
        (Box::new(camera), log)
    }
}

impl SceneCamera for RecordingCamera {
    fn set_pose(&mut self, position: Vec3, look_at: Vec3) {
        self.log
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((position, look_at));
    }
}
