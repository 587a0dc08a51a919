use std::ops::Range;
use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{KeyframePair, Spin, Transition, TransitionStep};
use crate::camera::Camera;
use crate::cards::{spawn_text, CardScene, GroupSwap, Light, Stage};
use crate::model::Mesh;
use crate::scene_graph::{Object3D, ObjectId};
use crate::text::{Font, TextOptions};

#[derive(Debug, Clone)]
pub struct HeartsRainConfig {
    pub count: usize,
    /// `None` seeds from the OS.
    pub seed: Option<u64>,
    pub x_range: Range<f32>,
    pub z_range: Range<f32>,
    /// Hearts fall from `top` and reappear there once below `bottom`.
    pub top: f32,
    pub bottom: f32,
    pub fall_speed: Range<f32>,
    pub spin_speed: Range<f32>,
    pub scale: Range<f32>,
    pub palette: Vec<Vec3>,
    /// Seconds for the message to slide in.
    pub duration: f32,
    pub message_slide: KeyframePair,
    pub swap_threshold: f32,
    pub instruction: String,
    pub message: String,
    pub instruction_position: Vec3,
    pub text_color: Vec3,
    pub text: TextOptions,
}

impl Default for HeartsRainConfig {
    fn default() -> Self {
        Self {
            count: 48,
            seed: None,
            x_range: -6.0..6.0,
            z_range: -4.0..1.0,
            top: 6.0,
            bottom: -6.0,
            fall_speed: 0.8..1.8,
            spin_speed: 0.5..2.5,
            scale: 0.3..0.6,
            palette: vec![
                Vec3::new(0.9, 0.05, 0.15),
                Vec3::new(1.0, 0.35, 0.55),
                Vec3::new(0.75, 0.0, 0.3),
                Vec3::new(1.0, 0.65, 0.75),
            ],
            duration: 2.0,
            message_slide: KeyframePair::new(Vec3::new(0.0, -4.0, 2.0), Vec3::new(0.0, 0.0, 2.0)),
            swap_threshold: 0.5,
            instruction: "Click anywhere".to_string(),
            message: "You make my heart rain".to_string(),
            instruction_position: Vec3::new(0.0, 0.0, 2.0),
            text_color: Vec3::new(1.0, 0.95, 0.95),
            text: TextOptions {
                size: 0.4,
                depth: 0.1,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RainDrop {
    pub pivot: ObjectId,
    pub position: Vec3,
    pub fall_speed: f32,
    pub spin: Spin,
    pub scale: f32,
    pub color: Vec3,
    pub heart: Option<ObjectId>,
}

/// Hearts falling forever, with a message that slides in on click.
pub struct HeartsRain {
    config: HeartsRainConfig,
    stage: Stage,
    rng: StdRng,
    drops: Vec<RainDrop>,
    transition: Transition,
    message_pivot: ObjectId,
    swap: GroupSwap,
    texts: Option<[ObjectId; 2]>,
}

impl HeartsRain {
    pub fn new(config: HeartsRainConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut stage = Stage::new(
            Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO),
            Light::directional(Vec3::new(-1.0, 2.0, 4.0), 1.1),
            Vec3::new(0.05, 0.0, 0.08),
        );
        let scene = &mut stage.scene;

        let rain = scene.spawn(Object3D::pivot("Rain"), None);
        let drops = (0..config.count)
            .map(|i| {
                let position = Vec3::new(
                    rng.gen_range(config.x_range.clone()),
                    rng.gen_range(config.bottom..config.top),
                    rng.gen_range(config.z_range.clone()),
                );
                let spin = Spin::with_phase(
                    rng.gen_range(config.spin_speed.clone()),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                );
                let pivot = scene.spawn(
                    Object3D::pivot(format!("Drop {i}"))
                        .at(position)
                        .rotated(Quat::from_rotation_y(spin.angle())),
                    Some(rain),
                );

                RainDrop {
                    pivot,
                    position,
                    fall_speed: rng.gen_range(config.fall_speed.clone()),
                    spin,
                    scale: rng.gen_range(config.scale.clone()),
                    color: config
                        .palette
                        .get(i % config.palette.len().max(1))
                        .copied()
                        .unwrap_or(Vec3::ONE),
                    heart: None,
                }
            })
            .collect();

        let instruction = scene.spawn(
            Object3D::pivot("Instruction").at(config.instruction_position),
            None,
        );
        let message_pivot = scene.spawn(
            Object3D::pivot("Message")
                .at(config.message_slide.start)
                .hidden(),
            None,
        );

        Self {
            rng,
            drops,
            transition: Transition::new(config.duration),
            message_pivot,
            swap: GroupSwap {
                instruction,
                message: message_pivot,
                threshold: config.swap_threshold,
            },
            config,
            stage,
            texts: None,
        }
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn swap(&self) -> &GroupSwap {
        &self.swap
    }

    pub fn message_pivot(&self) -> ObjectId {
        self.message_pivot
    }

    pub fn texts(&self) -> Option<[ObjectId; 2]> {
        self.texts
    }

    fn fall(&mut self, delta: f32) {
        let bottom = self.config.bottom;
        let height = self.config.top - bottom;
        let scene = &mut self.stage.scene;

        for drop in &mut self.drops {
            drop.position.y -= drop.fall_speed * delta;
            if drop.position.y < bottom && height > 0.0 {
                drop.position.y = bottom + (drop.position.y - bottom).rem_euclid(height);
                drop.position.x = self.rng.gen_range(self.config.x_range.clone());
            }

            let angle = drop.spin.advance(delta);
            scene.set_object_translation(drop.pivot, drop.position);
            scene.set_object_rotation(drop.pivot, Quat::from_rotation_y(angle));
        }
    }
}

impl CardScene for HeartsRain {
    fn title(&self) -> &str {
        "Hearts rain"
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn update(&mut self, now: f64, delta: f32) {
        self.fall(delta);

        let slide = self.config.message_slide;
        match self.transition.advance(now) {
            TransitionStep::Idle => {}
            TransitionStep::Running {
                progress,
                reversing,
            } => {
                let scene = &mut self.stage.scene;
                scene.set_object_translation(self.message_pivot, slide.sample(progress, reversing));
                self.swap.apply(scene, progress, reversing);
            }
            TransitionStep::Finished { reversing } => {
                let scene = &mut self.stage.scene;
                scene.set_object_translation(self.message_pivot, slide.resting(reversing));
                self.swap.apply(scene, 1.0, reversing);
                log::debug!("Message slide finished (reversing: {reversing})");
            }
        }
    }

    /// Clicking while the message slides stops it where it is.
    fn on_pointer_down(&mut self, now: f64) {
        let running = self.transition.toggle(now);
        log::debug!("Message slide {}", if running { "started" } else { "stopped" });
    }

    fn on_model_loaded(&mut self, mesh: Arc<Mesh>) {
        if self.drops.iter().any(|drop| drop.heart.is_some()) {
            log::warn!("Heart model already attached, ignoring {}", mesh.name);
            return;
        }

        let scene = &mut self.stage.scene;
        let mesh_id = scene.add_mesh(mesh);

        for (i, drop) in self.drops.iter_mut().enumerate() {
            drop.heart = Some(scene.spawn(
                Object3D::with_mesh(format!("Heart {i}"), mesh_id, drop.color).scaled(drop.scale),
                Some(drop.pivot),
            ));
        }
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

    fn seeded() -> HeartsRain {
        HeartsRain::new(HeartsRainConfig {
            seed: Some(7),
            ..Default::default()
        })
    }

    #[test]
    fn drops_start_inside_the_volume() {
        let rain = seeded();
        let config = HeartsRainConfig::default();

        assert_eq!(rain.drops().len(), config.count);
        for drop in rain.drops() {
            assert!(config.x_range.contains(&drop.position.x));
            assert!(drop.position.y >= config.bottom && drop.position.y < config.top);
        }
    }

    #[test]
    fn drops_fall_and_wrap_to_the_top() {
        let mut rain = seeded();
        let config = HeartsRainConfig::default();
        let before: Vec<f32> = rain.drops().iter().map(|drop| drop.position.y).collect();

        rain.update(0.1, 0.1);
        for (drop, y) in rain.drops().iter().zip(&before) {
            assert!(drop.position.y < *y || drop.position.y > config.bottom + 5.0);
        }

        for frame in 0..600 {
            rain.update(0.2 + frame as f64 * 0.05, 0.05);
        }
        for drop in rain.drops() {
            assert!(drop.position.y >= config.bottom && drop.position.y <= config.top);
            let translation = rain.stage.scene.object_translation(drop.pivot).unwrap();
            assert_eq!(translation, drop.position);
        }
    }

    #[test]
    fn long_frame_keeps_drops_inside_the_volume() {
        let mut rain = seeded();
        let config = HeartsRainConfig::default();

        rain.update(20.0, 20.0);
        for drop in rain.drops() {
            assert!(drop.position.y >= config.bottom && drop.position.y <= config.top);
        }
    }

    #[test]
    fn click_toggles_the_slide() {
        let mut rain = seeded();
        rain.on_pointer_down(0.0);
        rain.update(0.5, 0.5);
        let frozen = rain.stage.scene.object_translation(rain.message_pivot()).unwrap();

        rain.on_pointer_down(0.6);
        assert!(!rain.transition().is_active());
        rain.update(1.5, 1.0);
        assert_eq!(
            rain.stage.scene.object_translation(rain.message_pivot()),
            Some(frozen)
        );
    }

    #[test]
    fn same_seed_same_layout() {
        let a = seeded();
        let b = seeded();
        let positions = |rain: &HeartsRain| -> Vec<Vec3> {
            rain.drops().iter().map(|drop| drop.position).collect()
        };
        assert_eq!(positions(&a), positions(&b));
    }
}
