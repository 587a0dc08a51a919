pub mod animation;
pub mod assets;
pub mod camera;
pub mod cards;
pub mod config;
pub mod engine;
pub mod math;
pub mod model;
pub mod rendering;
pub mod scene_graph;
pub mod text;
pub mod window;
