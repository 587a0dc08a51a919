use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{KeyframePair, Spin, Transition, TransitionStep};
use crate::camera::Camera;
use crate::cards::{spawn_text, CardScene, GroupSwap, Light, Stage};
use crate::model::Mesh;
use crate::scene_graph::{Object3D, ObjectId};
use crate::text::{Font, TextOptions};

#[derive(Debug, Clone)]
pub struct HeartsPairConfig {
    /// Seconds per pass.
    pub duration: f32,
    pub left: KeyframePair,
    pub right: KeyframePair,
    pub swap_threshold: f32,
    /// Radians per second; the two hearts turn in opposite directions.
    pub spin_speed: f32,
    pub heart_scale: f32,
    pub left_color: Vec3,
    pub right_color: Vec3,
    pub instruction: String,
    pub message: String,
    pub text_position: Vec3,
    pub text_color: Vec3,
    pub text: TextOptions,
}

impl Default for HeartsPairConfig {
    fn default() -> Self {
        Self {
            duration: 1.5,
            left: KeyframePair::new(Vec3::new(-3.0, 0.0, 3.0), Vec3::new(-0.55, 0.0, 0.0)),
            right: KeyframePair::new(Vec3::new(3.0, 0.0, 3.0), Vec3::new(0.55, 0.0, 0.0)),
            swap_threshold: 0.5,
            spin_speed: 1.0,
            heart_scale: 1.5,
            left_color: Vec3::new(0.85, 0.05, 0.15),
            right_color: Vec3::new(1.0, 0.4, 0.6),
            instruction: "Click to bring us together".to_string(),
            message: "Better together".to_string(),
            text_position: Vec3::new(0.0, 1.8, 0.0),
            text_color: Vec3::new(1.0, 0.9, 0.9),
            text: TextOptions {
                size: 0.35,
                depth: 0.08,
                ..Default::default()
            },
        }
    }
}

/// Two spinning hearts that slide together and apart on successive clicks.
pub struct HeartsPair {
    config: HeartsPairConfig,
    stage: Stage,
    transition: Transition,
    spin: Spin,
    left_pivot: ObjectId,
    right_pivot: ObjectId,
    swap: GroupSwap,
    hearts: Option<[ObjectId; 2]>,
    texts: Option<[ObjectId; 2]>,
}

impl HeartsPair {
    pub fn new(config: HeartsPairConfig) -> Self {
        let mut stage = Stage::new(
            Camera::looking_at(Vec3::new(0.0, 1.5, 8.0), Vec3::new(0.0, 0.5, 0.0)),
            Light::directional(Vec3::new(1.0, 2.0, 3.0), 1.0),
            Vec3::new(0.1, 0.02, 0.05),
        );
        let scene = &mut stage.scene;

        let root = scene.spawn(Object3D::pivot("Root"), None);
        let left_pivot = scene.spawn(
            Object3D::pivot("Left heart pivot").at(config.left.start),
            Some(root),
        );
        let right_pivot = scene.spawn(
            Object3D::pivot("Right heart pivot").at(config.right.start),
            Some(root),
        );
        let instruction = scene.spawn(
            Object3D::pivot("Instruction").at(config.text_position),
            Some(root),
        );
        let message = scene.spawn(
            Object3D::pivot("Message").at(config.text_position).hidden(),
            Some(root),
        );

        Self {
            transition: Transition::new(config.duration),
            spin: Spin::new(config.spin_speed),
            swap: GroupSwap {
                instruction,
                message,
                threshold: config.swap_threshold,
            },
            config,
            stage,
            left_pivot,
            right_pivot,
            hearts: None,
            texts: None,
        }
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn pivots(&self) -> [ObjectId; 2] {
        [self.left_pivot, self.right_pivot]
    }

    pub fn swap(&self) -> &GroupSwap {
        &self.swap
    }

    pub fn hearts(&self) -> Option<[ObjectId; 2]> {
        self.hearts
    }

    pub fn texts(&self) -> Option<[ObjectId; 2]> {
        self.texts
    }

    fn place_hearts(&mut self, progress: f32, reversing: bool) {
        let scene = &mut self.stage.scene;
        scene.set_object_translation(self.left_pivot, self.config.left.sample(progress, reversing));
        scene.set_object_translation(
            self.right_pivot,
            self.config.right.sample(progress, reversing),
        );
    }

    fn rest_hearts(&mut self, reversing: bool) {
        let scene = &mut self.stage.scene;
        scene.set_object_translation(self.left_pivot, self.config.left.resting(reversing));
        scene.set_object_translation(self.right_pivot, self.config.right.resting(reversing));
    }
}

impl CardScene for HeartsPair {
    fn title(&self) -> &str {
        "Hearts pair"
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn update(&mut self, now: f64, delta: f32) {
        let angle = self.spin.advance(delta);
        let scene = &mut self.stage.scene;
        scene.set_object_rotation(self.left_pivot, Quat::from_rotation_y(angle));
        scene.set_object_rotation(self.right_pivot, Quat::from_rotation_y(-angle));

        match self.transition.advance(now) {
            TransitionStep::Idle => {}
            TransitionStep::Running {
                progress,
                reversing,
            } => {
                self.place_hearts(progress, reversing);
                self.swap.apply(&mut self.stage.scene, progress, reversing);
            }
            TransitionStep::Finished { reversing } => {
                self.rest_hearts(reversing);
                self.swap.apply(&mut self.stage.scene, 1.0, reversing);
                log::debug!("Hearts pair pass finished (reversing: {reversing})");
            }
        }
    }

    fn on_pointer_down(&mut self, now: f64) {
        if self.transition.try_start(now) {
            log::debug!(
                "Hearts pair pass started (reversing: {})",
                self.transition.is_reversing()
            );
        }
    }

    fn on_model_loaded(&mut self, mesh: Arc<Mesh>) {
        if self.hearts.is_some() {
            log::warn!("Heart model already attached, ignoring {}", mesh.name);
            return;
        }

        let scene = &mut self.stage.scene;
        let mesh_id = scene.add_mesh(mesh);
        let scale = self.config.heart_scale;

        let left = scene.spawn(
            Object3D::with_mesh("Left heart", mesh_id, self.config.left_color).scaled(scale),
            Some(self.left_pivot),
        );
        let right = scene.spawn(
            Object3D::with_mesh("Right heart", mesh_id, self.config.right_color).scaled(scale),
            Some(self.right_pivot),
        );

        self.hearts = Some([left, right]);
    }

    fn on_font_loaded(&mut self, font: Arc<Font>) {
        if self.texts.is_some() {
            return;
        }

        let scene = &mut self.stage.scene;
        let config = &self.config;
        let instruction = spawn_text(
            scene,
            &font,
            &config.instruction,
            &config.text,
            config.text_color,
            self.swap.instruction,
        );
        let message = spawn_text(
            scene,
            &font,
            &config.message,
            &config.text,
            config.text_color,
            self.swap.message,
        );

        if let (Some(instruction), Some(message)) = (instruction, message) {
            self.texts = Some([instruction, message]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(card: &HeartsPair) -> [Vec3; 2] {
        card.pivots()
            .map(|pivot| card.stage.scene.object_translation(pivot).unwrap())
    }

    #[test]
    fn click_runs_a_full_pass() {
        let mut card = HeartsPair::new(HeartsPairConfig::default());
        let config = card.config.clone();

        card.update(0.0, 0.0);
        card.on_pointer_down(0.0);
        card.update(0.75, 0.75);

        let [left, right] = positions(&card);
        assert!((left - config.left.sample(0.5, false)).length() < 1e-5);
        assert!((right - config.right.sample(0.5, false)).length() < 1e-5);

        card.update(1.6, 0.85);
        assert!(!card.transition().is_active());
        assert!(card.transition().is_reversing());
        assert_eq!(positions(&card), [config.left.end, config.right.end]);
        assert!(card.stage.scene.is_object_visible(card.swap().message));
        assert!(!card.stage.scene.is_object_visible(card.swap().instruction));
    }

    #[test]
    fn click_while_running_is_ignored() {
        let mut card = HeartsPair::new(HeartsPairConfig::default());
        card.on_pointer_down(1.0);
        card.update(1.5, 0.5);
        card.on_pointer_down(1.6);

        assert_eq!(card.transition().start_time(), 1.0);
        assert!(!card.transition().is_reversing());
    }

    #[test]
    fn missing_assets_leave_nodes_unset() {
        let mut card = HeartsPair::new(HeartsPairConfig::default());
        card.update(0.0, 0.0);
        card.on_pointer_down(0.0);
        card.update(1.0, 1.0);
        card.stage.scene.late_update();

        assert!(card.hearts().is_none());
        assert!(card.texts().is_none());
        assert_eq!(card.stage.scene.drawables().count(), 0);
    }
}
