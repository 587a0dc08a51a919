//! The three greeting cards.
//!
//! Each card owns a [`Stage`] built once at startup, attaches model and text
//! nodes when the asset loads finish, and animates the stage from
//! [`CardScene::update`]. Pointer presses reach the card through
//! [`CardScene::on_pointer_down`].

use std::sync::Arc;

use glam::Vec3;

use crate::model::Mesh;
use crate::scene_graph::{Object3D, ObjectId, Scene};
use crate::text::{build_text_mesh, Font, TextOptions};

pub mod hearts_pair;
pub mod hearts_rain;
pub mod rotating_heart;
pub mod stage;

pub use hearts_pair::{HeartsPair, HeartsPairConfig};
pub use hearts_rain::{HeartsRain, HeartsRainConfig};
pub use rotating_heart::{RotatingHeart, RotatingHeartConfig};
pub use stage::{Light, Stage};

pub trait CardScene {
    fn title(&self) -> &str;

    fn stage(&self) -> &Stage;

    fn stage_mut(&mut self) -> &mut Stage;

    /// Called once per frame. `now` is the frame timestamp and `delta` the
    /// time since the previous frame, both in seconds.
    fn update(&mut self, now: f64, delta: f32);

    fn on_pointer_down(&mut self, now: f64);

    fn on_model_loaded(&mut self, mesh: Arc<Mesh>);

    fn on_font_loaded(&mut self, font: Arc<Font>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    HeartsPair,
    HeartsRain,
    RotatingHeart,
}

impl CardKind {
    pub fn build(self) -> Box<dyn CardScene> {
        match self {
            CardKind::HeartsPair => Box::new(HeartsPair::new(HeartsPairConfig::default())),
            CardKind::HeartsRain => Box::new(HeartsRain::new(HeartsRainConfig::default())),
            CardKind::RotatingHeart => {
                Box::new(RotatingHeart::new(RotatingHeartConfig::default()))
            }
        }
    }
}

/// Swaps an instruction group for a message group once a transition passes
/// `threshold`. Applied every frame past the threshold; setting the same
/// visibility again is harmless.
#[derive(Debug, Clone, Copy)]
pub struct GroupSwap {
    pub instruction: ObjectId,
    pub message: ObjectId,
    pub threshold: f32,
}

impl GroupSwap {
    pub fn apply(&self, scene: &mut Scene, progress: f32, reversing: bool) {
        if progress > self.threshold {
            scene.set_object_visible(self.instruction, reversing);
            scene.set_object_visible(self.message, !reversing);
        }
    }
}

/// Builds a text mesh and hangs it under `parent`. Returns `None` and logs
/// when the text could not be built.
pub fn spawn_text(
    scene: &mut Scene,
    font: &Font,
    text: &str,
    options: &TextOptions,
    color: Vec3,
    parent: ObjectId,
) -> Option<ObjectId> {
    let mesh = match build_text_mesh(font, text, options) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::error!("Failed to build text {text:?}: {err:#}");
            return None;
        }
    };

    let name = mesh.name.clone();
    let mesh_id = scene.add_mesh(Arc::new(mesh));

    Some(scene.spawn(Object3D::with_mesh(name, mesh_id, color), Some(parent)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_swap_follows_direction() {
        let mut scene = Scene::new();
        let instruction = scene.spawn(Object3D::pivot("Instruction"), None);
        let message = scene.spawn(Object3D::pivot("Message").hidden(), None);
        let swap = GroupSwap {
            instruction,
            message,
            threshold: 0.5,
        };

        swap.apply(&mut scene, 0.4, false);
        assert!(scene.is_object_visible(instruction));
        assert!(!scene.is_object_visible(message));

        swap.apply(&mut scene, 0.6, false);
        assert!(!scene.is_object_visible(instruction));
        assert!(scene.is_object_visible(message));

        swap.apply(&mut scene, 0.4, true);
        assert!(scene.is_object_visible(message));

        swap.apply(&mut scene, 0.6, true);
        assert!(scene.is_object_visible(instruction));
        assert!(!scene.is_object_visible(message));
    }

    #[test]
    fn every_card_builds() {
        for kind in [
            CardKind::HeartsPair,
            CardKind::HeartsRain,
            CardKind::RotatingHeart,
        ] {
            let card = kind.build();
            assert!(!card.title().is_empty());
            assert!(card.stage().scene.objects.len() > 1);
        }
    }
}
