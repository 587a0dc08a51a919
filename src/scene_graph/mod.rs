pub mod object3d;
pub mod scene;
pub mod scene_mesh;
pub mod transform;

pub use object3d::{Object3D, ObjectId};
pub use scene::{Drawable, Scene};
pub use scene_mesh::{MeshId, SceneMesh};
pub use transform::Transform;
