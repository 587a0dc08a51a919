pub mod forward_pass;
pub mod global_uniform;
pub mod instance;
pub mod render_mesh;
pub mod renderer;
pub mod texture;
