use std::cell::Cell;

use glam::{Quat, Vec3};
use id_arena::Id;

use crate::scene_graph::scene_mesh::MeshId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub mesh_id: Option<MeshId>,
    /// Linear RGB, multiplied with the lighting term in the shader.
    pub color: Vec3,
    pub visible: bool,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
    world_visible: Cell<bool>,
}

impl Object3D {
    /// An empty grouping node.
    pub fn pivot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh_id: MeshId, color: Vec3) -> Self {
        Self {
            name: name.into(),
            mesh_id: Some(mesh_id),
            color,
            ..Default::default()
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.set_translation(translation);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.set_rotation(rotation);
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.transform.set_scale(scale);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Visibility after ancestors have been taken into account. Refreshed by
    /// `Scene::late_update`.
    pub fn is_world_visible(&self) -> bool {
        self.world_visible.get()
    }

    pub(crate) fn set_world_visible(&self, visible: bool) {
        self.world_visible.set(visible);
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::from_translation(Vec3::ZERO),
            mesh_id: None,
            color: Vec3::ONE,
            visible: true,
            parent_id: None,
            child_ids: Vec::new(),
            world_visible: Cell::new(true),
        }
    }
}
