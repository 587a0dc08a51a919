use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::sync::Arc;

use crate::model::Mesh;
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_mesh::{MeshId, SceneMesh};
use crate::scene_graph::transform::Transform;

/// An object the renderer should draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct Drawable {
    pub mesh_id: MeshId,
    pub world_matrix: Mat4,
    pub color: Vec3,
}

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub meshes: Arena<SceneMesh>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            meshes: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds `object` and attaches it to `parent` in one step.
    pub fn spawn(&mut self, object: Object3D, parent: Option<ObjectId>) -> ObjectId {
        let object_id = self.add_object(object);

        if parent.is_some() {
            self.set_object_parent(object_id, parent);
        }

        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) -> MeshId {
        self.meshes.alloc(SceneMesh::new(mesh))
    }

    /// Updates all object transforms and visibility in hierarchical order
    fn update_hierarchy(&self) {
        let root_objects = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in root_objects {
            self.update_object_recursive(root_id, Mat4::IDENTITY, true);
        }
    }

    fn update_object_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_visible: bool,
    ) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                let world_matrix = parent_world_matrix * local_matrix;
                object.transform.set_world_matrix(world_matrix);
            }

            let visible = parent_visible && object.visible;
            object.set_world_visible(visible);

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_recursive(child_id, world_matrix, visible);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_rotation(rotation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn set_object_visible(&mut self, object_id: ObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.visible = visible;
        }
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    pub fn object_translation(&self, object_id: ObjectId) -> Option<Vec3> {
        self.get_object_transform(object_id)
            .map(Transform::translation)
    }

    pub fn is_object_visible(&self, object_id: ObjectId) -> bool {
        self.objects
            .get(object_id)
            .is_some_and(|object| object.visible)
    }

    /// World-space position as of the last `late_update`.
    pub fn world_position(&self, object_id: ObjectId) -> Option<Vec3> {
        self.objects
            .get(object_id)
            .map(|object| object.transform.get_world_matrix().w_axis.truncate())
    }

    /// Visible objects that carry a mesh. Only meaningful after `late_update`.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.objects.iter().filter_map(|(_, object)| {
            let mesh_id = object.mesh_id?;

            if !object.is_world_visible() {
                return None;
            }

            Some(Drawable {
                mesh_id,
                world_matrix: *object.transform.get_world_matrix(),
                color: object.color,
            })
        })
    }

    pub fn late_update(&mut self) {
        self.update_hierarchy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vertex;

    fn triangle() -> Arc<Mesh> {
        Arc::new(Mesh {
            name: "Triangle".to_string(),
            vertices: vec![
                Vertex::new(Vec3::ZERO, Vec3::Z),
                Vertex::new(Vec3::X, Vec3::Z),
                Vertex::new(Vec3::Y, Vec3::Z),
            ],
            indices: vec![0, 1, 2],
        })
    }

    #[test]
    fn children_inherit_parent_translation() {
        let mut scene = Scene::new();
        let pivot = scene.spawn(Object3D::pivot("Pivot").at(Vec3::new(1.0, 0.0, 0.0)), None);
        let child = scene.spawn(Object3D::pivot("Child").at(Vec3::new(0.0, 2.0, 0.0)), Some(pivot));

        scene.late_update();
        assert_eq!(scene.world_position(child), Some(Vec3::new(1.0, 2.0, 0.0)));

        scene.set_object_translation(pivot, Vec3::new(-1.0, 0.0, 0.0));
        scene.late_update();
        assert_eq!(scene.world_position(child), Some(Vec3::new(-1.0, 2.0, 0.0)));
    }

    #[test]
    fn hidden_pivot_hides_descendants() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(triangle());
        let group = scene.spawn(Object3D::pivot("Group"), None);
        scene.spawn(Object3D::with_mesh("Text", mesh, Vec3::ONE), Some(group));

        scene.late_update();
        assert_eq!(scene.drawables().count(), 1);

        scene.set_object_visible(group, false);
        scene.late_update();
        assert_eq!(scene.drawables().count(), 0);
    }

    #[test]
    fn reparenting_moves_child_between_lists() {
        let mut scene = Scene::new();
        let a = scene.spawn(Object3D::pivot("A"), None);
        let b = scene.spawn(Object3D::pivot("B").at(Vec3::Z), None);
        let child = scene.spawn(Object3D::pivot("Child"), Some(a));

        scene.set_object_parent(child, Some(b));
        scene.late_update();

        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(scene.world_position(child), Some(Vec3::Z));
        assert_eq!(scene.get_object_by_name("Child"), Some(child));
    }
}
