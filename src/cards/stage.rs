use glam::Vec3;

use crate::camera::Camera;
use crate::scene_graph::Scene;

#[derive(Debug, Clone)]
pub struct Light {
    /// Direction from the lit surface towards the light.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub ambient: f32,
}

impl Light {
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color: Vec3::ONE,
            intensity,
            ambient: 0.25,
        }
    }
}

/// Everything the renderer needs from a card.
pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub light: Light,
    pub clear_color: Vec3,
}

impl Stage {
    pub fn new(camera: Camera, light: Light, clear_color: Vec3) -> Self {
        Self {
            scene: Scene::new(),
            camera,
            light,
            clear_color,
        }
    }
}
