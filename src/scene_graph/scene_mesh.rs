use std::sync::Arc;

use id_arena::Id;

use crate::model::Mesh;

pub type MeshId = Id<SceneMesh>;

/// A mesh registered with the scene. Objects share it by id, so the rain
/// hearts are clones of one upload rather than copies of the geometry.
pub struct SceneMesh {
    pub name: String,
    pub mesh: Arc<Mesh>,
}

impl SceneMesh {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            name: mesh.name.clone(),
            mesh,
        }
    }
}
