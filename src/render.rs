//! One-way synchronisation from the simulation to the presentation layer.
//!
//! The host owns its scene-graph nodes and native camera; the simulation only
//! holds them behind the [`SceneNode`] and [`SceneCamera`] traits and pushes
//! values into them. Nothing is ever read back.
//!
//! The entity to node association is the [`SceneNodes`] side table. Nodes are
//! attached explicitly, detached automatically when an entity loses its
//! [`Renderable`] marker or is despawned, and cleared wholesale on scene
//! teardown.
use bevy_ecs::prelude::*;
use glam::Vec3;
use hashbrown::HashMap;
use log::{debug, trace};

use crate::camera::CameraPose;
use crate::components::{Renderable, Transform};

/// A host scene-graph node mirroring one entity.
pub trait SceneNode: Send + Sync {
    /// Copies the entity's transform onto the node.
    fn sync(&mut self, position: Vec3, rotation: Vec3, scale: Vec3);
}

/// The host's native camera.
pub trait SceneCamera: Send + Sync {
    /// Places the camera at `position` looking at `look_at`.
    fn set_pose(&mut self, position: Vec3, look_at: Vec3);
}

/// Side table from entities to their host nodes.
#[derive(Resource, Default)]
pub struct SceneNodes {
    nodes: HashMap<Entity, Box<dyn SceneNode>>,
}

impl SceneNodes {
    /// Associates `node` with `entity`, returning any node it replaces.
    pub fn attach(
        &mut self,
        entity: Entity,
        node: Box<dyn SceneNode>,
    ) -> Option<Box<dyn SceneNode>> {
        debug!("scene node attached to {entity}");
        self.nodes.insert(entity, node)
    }

    /// Drops the association for `entity`, returning its node.
    pub fn detach(&mut self, entity: Entity) -> Option<Box<dyn SceneNode>> {
        let node = self.nodes.remove(&entity);
        if node.is_some() {
            debug!("scene node detached from {entity}");
        }
        node
    }

    /// Drops every association.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Whether `entity` has a node.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(&entity)
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The native camera, once the host has bound one.
#[derive(Resource, Default)]
pub struct BoundCamera {
    camera: Option<Box<dyn SceneCamera>>,
}

impl BoundCamera {
    /// Binds the host camera, replacing any previous one.
    pub fn bind(&mut self, camera: Box<dyn SceneCamera>) {
        debug!("native camera bound");
        self.camera = Some(camera);
    }

    /// Releases the host camera.
    pub fn unbind(&mut self) -> Option<Box<dyn SceneCamera>> {
        self.camera.take()
    }

    /// Whether a camera is bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.camera.is_some()
    }
}

/// Detaches nodes of entities that lost [`Renderable`] or were despawned.
pub fn detach_removed_nodes_system(
    mut removed: RemovedComponents<Renderable>,
    mut nodes: ResMut<SceneNodes>,
) {
    for entity in removed.read() {
        nodes.detach(entity);
    }
}

/// Re-clamps scales written directly to a [`Transform`].
pub fn sanitise_scale_system(mut transforms: Query<&mut Transform>) {
    for mut transform in &mut transforms {
        if transform.has_degenerate_scale() {
            trace!("clamping degenerate scale {}", transform.scale);
            transform.clamp_scale();
        }
    }
}

/// Pushes transforms onto attached nodes and the pose onto the camera.
pub fn render_sync_system(
    mut nodes: ResMut<SceneNodes>,
    mut bound: ResMut<BoundCamera>,
    renderables: Query<(Entity, &Transform), With<Renderable>>,
    poses: Query<&CameraPose>,
) {
    for (entity, transform) in &renderables {
        if let Some(node) = nodes.nodes.get_mut(&entity) {
            node.sync(transform.position, transform.rotation, transform.scale);
        }
    }
    let Some(camera) = bound.camera.as_deref_mut() else {
        return;
    };
    if let Ok(pose) = poses.single() {
        camera.set_pose(pose.position, pose.look_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<Vec3>>>;

    struct Probe(Log);

    impl SceneNode for Probe {
        fn sync(&mut self, position: Vec3, _rotation: Vec3, _scale: Vec3) {
            if let Ok(mut log) = self.0.lock() {
                log.push(position);
            }
        }
    }

    fn world_with_nodes() -> World {
        let mut world = World::new();
        world.insert_resource(SceneNodes::default());
        world.insert_resource(BoundCamera::default());
        world
    }

    #[test]
    fn attach_replaces_existing_node() {
        let mut world = world_with_nodes();
        let entity = world.spawn_empty().id();
        let mut nodes = SceneNodes::default();
        let log = Log::default();
        assert!(nodes.attach(entity, Box::new(Probe(log.clone()))).is_none());
        assert!(nodes.attach(entity, Box::new(Probe(log))).is_some());
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn only_renderables_sync() {
        let mut world = world_with_nodes();
        let shown = world
            .spawn((Transform::from_xyz(1.0, 2.0, 3.0), Renderable))
            .id();
        let hidden = world.spawn(Transform::from_xyz(9.0, 9.0, 9.0)).id();
        let log = Log::default();
        {
            let mut nodes = world.resource_mut::<SceneNodes>();
            nodes.attach(shown, Box::new(Probe(log.clone())));
            nodes.attach(hidden, Box::new(Probe(log.clone())));
        }
        let mut schedule = Schedule::default();
        schedule.add_systems(render_sync_system);
        schedule.run(&mut world);
        let synced = log.lock().map(|l| l.clone()).unwrap_or_default();
        assert_eq!(synced, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn sanitiser_repairs_scale() {
        let mut world = World::new();
        let mut transform = Transform::default();
        transform.scale = Vec3::new(-1.0, 0.0, 2.0);
        let entity = world.spawn(transform).id();
        let mut schedule = Schedule::default();
        schedule.add_systems(sanitise_scale_system);
        schedule.run(&mut world);
        let scale = world
            .get::<Transform>(entity)
            .map(|t| t.scale)
            .unwrap_or(Vec3::ZERO);
        assert_eq!(scale, Vec3::new(crate::MIN_SCALE, crate::MIN_SCALE, 2.0));
    }
}
