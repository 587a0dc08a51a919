use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{HalfTurn, Spin};
use crate::camera::Camera;
use crate::cards::{spawn_text, CardScene, Light, Stage};
use crate::model::Mesh;
use crate::scene_graph::{Object3D, ObjectId};
use crate::text::{Font, TextOptions};

#[derive(Debug, Clone)]
pub struct RotatingHeartConfig {
    /// Radians per second while turning.
    pub turn_speed: f32,
    pub heart_scale: f32,
    pub heart_color: Vec3,
    pub orbit_count: usize,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub orbit_scale: f32,
    pub orbit_color: Vec3,
    pub front_text: String,
    pub back_text: String,
    /// Distance of each text from the heart's center along its facing axis.
    pub text_offset: f32,
    pub text_color: Vec3,
    pub text: TextOptions,
}

impl Default for RotatingHeartConfig {
    fn default() -> Self {
        Self {
            turn_speed: PI,
            heart_scale: 3.0,
            heart_color: Vec3::new(0.8, 0.02, 0.1),
            orbit_count: 10,
            orbit_radius: 3.5,
            orbit_speed: 0.6,
            orbit_scale: 0.4,
            orbit_color: Vec3::new(1.0, 0.5, 0.65),
            front_text: "Click to turn me".to_string(),
            back_text: "Happy Valentine's Day".to_string(),
            text_offset: 0.6,
            text_color: Vec3::new(1.0, 0.95, 0.8),
            text: TextOptions {
                size: 0.3,
                depth: 0.05,
                ..Default::default()
            },
        }
    }
}

/// A single heart that turns half a revolution per click, showing a message
/// on its back, surrounded by a ring of orbiting hearts.
pub struct RotatingHeart {
    config: RotatingHeartConfig,
    stage: Stage,
    turn: HalfTurn,
    orbit: Spin,
    heart_pivot: ObjectId,
    orbit_pivot: ObjectId,
    orbit_slots: Vec<ObjectId>,
    front_pivot: ObjectId,
    back_pivot: ObjectId,
    heart: Option<ObjectId>,
    orbiters: Vec<ObjectId>,
    texts: Option<[ObjectId; 2]>,
}

impl RotatingHeart {
    pub fn new(config: RotatingHeartConfig) -> Self {
        let mut stage = Stage::new(
            Camera::looking_at(Vec3::new(0.0, 1.0, 9.0), Vec3::ZERO),
            Light::directional(Vec3::new(0.5, 1.5, 3.0), 1.0),
            Vec3::new(0.12, 0.03, 0.06),
        );
        let scene = &mut stage.scene;

        let heart_pivot = scene.spawn(Object3D::pivot("Heart pivot"), None);
        let front_pivot = scene.spawn(
            Object3D::pivot("Front text").at(Vec3::new(0.0, 0.0, config.text_offset)),
            Some(heart_pivot),
        );
        let back_pivot = scene.spawn(
            Object3D::pivot("Back text")
                .at(Vec3::new(0.0, 0.0, -config.text_offset))
                .rotated(Quat::from_rotation_y(PI)),
            Some(heart_pivot),
        );

        let orbit_pivot = scene.spawn(Object3D::pivot("Orbit pivot"), None);
        let orbit_slots = (0..config.orbit_count)
            .map(|i| {
                let theta = TAU * i as f32 / config.orbit_count as f32;
                scene.spawn(
                    Object3D::pivot(format!("Orbit slot {i}"))
                        .at(Vec3::new(
                            theta.cos() * config.orbit_radius,
                            0.0,
                            theta.sin() * config.orbit_radius,
                        ))
                        .rotated(Quat::from_rotation_y(-theta)),
                    Some(orbit_pivot),
                )
            })
            .collect();

        Self {
            turn: HalfTurn::new(config.turn_speed),
            orbit: Spin::new(config.orbit_speed),
            config,
            stage,
            heart_pivot,
            orbit_pivot,
            orbit_slots,
            front_pivot,
            back_pivot,
            heart: None,
            orbiters: Vec::new(),
            texts: None,
        }
    }

    pub fn turn(&self) -> &HalfTurn {
        &self.turn
    }

    pub fn orbit(&self) -> &Spin {
        &self.orbit
    }

    pub fn heart_pivot(&self) -> ObjectId {
        self.heart_pivot
    }

    pub fn heart(&self) -> Option<ObjectId> {
        self.heart
    }

    pub fn orbiters(&self) -> &[ObjectId] {
        &self.orbiters
    }

    pub fn texts(&self) -> Option<[ObjectId; 2]> {
        self.texts
    }
}

impl CardScene for RotatingHeart {
    fn title(&self) -> &str {
        "Rotating heart"
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn update(&mut self, _now: f64, delta: f32) {
        let orbit_angle = self.orbit.advance(delta);
        let stopped = self.turn.advance(delta);

        let scene = &mut self.stage.scene;
        scene.set_object_rotation(self.orbit_pivot, Quat::from_rotation_y(orbit_angle));
        scene.set_object_rotation(self.heart_pivot, Quat::from_rotation_y(self.turn.angle()));

        if stopped {
            log::debug!("Heart turn stopped at {:.3} rad", self.turn.angle());
        }
    }

    fn on_pointer_down(&mut self, _now: f64) {
        if self.turn.try_start() {
            log::debug!("Heart turn started from {:.3} rad", self.turn.angle());
        }
    }

    fn on_model_loaded(&mut self, mesh: Arc<Mesh>) {
        if self.heart.is_some() {
            log::warn!("Heart model already attached, ignoring {}", mesh.name);
            return;
        }

        let scene = &mut self.stage.scene;
        let mesh_id = scene.add_mesh(mesh);
        let config = &self.config;

        self.heart = Some(scene.spawn(
            Object3D::with_mesh("Heart", mesh_id, config.heart_color).scaled(config.heart_scale),
            Some(self.heart_pivot),
        ));

        self.orbiters = self
            .orbit_slots
            .iter()
            .enumerate()
            .map(|(i, &slot)| {
                scene.spawn(
                    Object3D::with_mesh(format!("Orbiting heart {i}"), mesh_id, config.orbit_color)
                        .scaled(config.orbit_scale),
                    Some(slot),
                )
            })
            .collect();
    }

    fn on_font_loaded(&mut self, font: Arc<Font>) {
        if self.texts.is_some() {
            return;
        }

        let scene = &mut self.stage.scene;
        let config = &self.config;
        let front = spawn_text(
            scene,
            &font,
            &config.front_text,
            &config.text,
            config.text_color,
            self.front_pivot,
        );
        let back = spawn_text(
            scene,
            &font,
            &config.back_text,
            &config.text,
            config.text_color,
            self.back_pivot,
        );

        if let (Some(front), Some(back)) = (front, back) {
            self.texts = Some([front, back]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_click_turns_half_a_revolution() {
        let mut card = RotatingHeart::new(RotatingHeartConfig::default());

        card.on_pointer_down(0.0);
        for _ in 0..40 {
            card.update(0.0, 1.0 / 30.0);
        }
        assert!(!card.turn().is_active());
        assert_eq!(card.turn().angle(), PI);

        card.on_pointer_down(0.0);
        for _ in 0..40 {
            card.update(0.0, 1.0 / 30.0);
        }
        assert_eq!(card.turn().angle(), 0.0);
    }

    #[test]
    fn back_text_faces_the_camera_after_a_turn() {
        let mut card = RotatingHeart::new(RotatingHeartConfig::default());
        card.on_pointer_down(0.0);
        card.update(0.0, 2.0);
        card.stage.scene.late_update();

        let back = card.stage.scene.world_position(card.back_pivot).unwrap();
        assert!(back.z > 0.0);
    }

    #[test]
    fn orbit_keeps_turning_while_idle() {
        let mut card = RotatingHeart::new(RotatingHeartConfig::default());
        card.update(0.0, 1.0);
        card.update(1.0, 1.0);

        assert!((card.orbit().angle() - 1.2).abs() < 1e-5);
        assert_eq!(card.turn().angle(), 0.0);
    }
}
