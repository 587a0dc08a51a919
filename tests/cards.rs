mod common;

use std::f32::consts::PI;
use std::io::Cursor;
use std::sync::Arc;

use glam::Vec3;

use common::approx_vec3;
use heartcards::animation::ManualClock;
use heartcards::assets::AssetEvent;
use heartcards::cards::{
    CardKind, HeartsPair, HeartsPairConfig, HeartsRain, HeartsRainConfig, RotatingHeart,
    RotatingHeartConfig,
};
use heartcards::engine::FrameDriver;
use heartcards::model::Mesh;
use heartcards::text::Font;

const TETRA_OBJ: &str = "\
o Tetra
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

const FONT_JSON: &str = r#"{
    "glyphs": {
        "?": { "ha": 600, "o": "m 0 0 l 500 0 l 500 700 l 0 700 z" },
        " ": { "ha": 300 }
    },
    "familyName": "Boxes",
    "resolution": 1000,
    "boundingBox": { "yMin": -200, "yMax": 800 },
    "underlineThickness": 50
}"#;

fn tetra() -> Arc<Mesh> {
    Arc::new(
        Mesh::from_obj_reader("Tetra", &mut Cursor::new(TETRA_OBJ.as_bytes()))
            .unwrap()
            .normalized(),
    )
}

fn font() -> Arc<Font> {
    Arc::new(Font::from_json_str(FONT_JSON).unwrap())
}

fn run_frames(driver: &mut FrameDriver<ManualClock>, clock: &ManualClock, frames: usize) {
    for _ in 0..frames {
        clock.advance(1.0 / 60.0);
        assert!(driver.frame());
    }
}

#[test]
fn driver_is_idle_until_started() {
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(CardKind::HeartsPair.build(), clock.clone());

    assert!(!driver.frame());
    driver.start();
    assert!(driver.frame());
    driver.stop();
    clock.advance(1.0);
    assert!(!driver.frame());
}

#[test]
fn driver_resumes_after_a_suspend() {
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(CardKind::RotatingHeart.build(), clock.clone());
    let orbit_rotation = |driver: &FrameDriver<ManualClock>| {
        let scene = &driver.card().stage().scene;
        let pivot = scene.get_object_by_name("Orbit pivot").unwrap();
        scene.get_object_transform(pivot).unwrap().rotation()
    };

    driver.start();
    run_frames(&mut driver, &clock, 30);
    let before = orbit_rotation(&driver);

    driver.stop();
    clock.advance(5.0);
    assert!(!driver.frame());

    // The first frame after resuming reports no elapsed time.
    driver.start();
    assert!(driver.frame());
    assert_eq!(orbit_rotation(&driver), before);

    run_frames(&mut driver, &clock, 30);
    assert_ne!(orbit_rotation(&driver), before);
}

#[test]
fn cards_keep_running_when_both_loads_fail() {
    for kind in [
        CardKind::HeartsPair,
        CardKind::HeartsRain,
        CardKind::RotatingHeart,
    ] {
        let clock = ManualClock::new(0.0);
        let mut driver = FrameDriver::new(kind.build(), clock.clone());
        driver.start();

        driver.apply_asset(AssetEvent::Model(Err(anyhow::anyhow!("no model"))));
        driver.apply_asset(AssetEvent::Font(Err(anyhow::anyhow!("no font"))));

        run_frames(&mut driver, &clock, 10);
        driver.pointer_down();
        run_frames(&mut driver, &clock, 200);

        assert_eq!(driver.card().stage().scene.drawables().count(), 0);
    }
}

#[test]
fn loaded_assets_become_drawable() {
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(CardKind::HeartsPair.build(), clock.clone());
    driver.start();

    driver.apply_asset(AssetEvent::Model(Ok(tetra())));
    driver.apply_asset(AssetEvent::Font(Ok(font())));
    run_frames(&mut driver, &clock, 1);

    // Two hearts plus the instruction; the message starts hidden.
    assert_eq!(driver.card().stage().scene.drawables().count(), 3);
}

#[test]
fn hearts_pair_meets_then_parts() {
    let config = HeartsPairConfig::default();
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(
        Box::new(HeartsPair::new(config.clone())),
        clock.clone(),
    );
    driver.start();
    driver.apply_asset(AssetEvent::Font(Ok(font())));

    let pivot_positions = |driver: &FrameDriver<ManualClock>| -> Vec<Vec3> {
        let scene = &driver.card().stage().scene;
        ["Left heart pivot", "Right heart pivot"]
            .iter()
            .map(|name| {
                let id = scene.get_object_by_name(name).unwrap();
                scene.object_translation(id).unwrap()
            })
            .collect()
    };
    let visible = |driver: &FrameDriver<ManualClock>, name: &str| {
        let scene = &driver.card().stage().scene;
        scene.is_object_visible(scene.get_object_by_name(name).unwrap())
    };

    run_frames(&mut driver, &clock, 5);
    assert!(visible(&driver, "Instruction"));
    assert!(!visible(&driver, "Message"));

    driver.pointer_down();
    run_frames(&mut driver, &clock, 120);
    assert_eq!(pivot_positions(&driver), vec![config.left.end, config.right.end]);
    assert!(!visible(&driver, "Instruction"));
    assert!(visible(&driver, "Message"));

    driver.pointer_down();
    run_frames(&mut driver, &clock, 120);
    assert_eq!(
        pivot_positions(&driver),
        vec![config.left.start, config.right.start]
    );
    assert!(visible(&driver, "Instruction"));
    assert!(!visible(&driver, "Message"));
}

#[test]
fn hearts_rain_message_slides_in() {
    let config = HeartsRainConfig {
        seed: Some(3),
        ..Default::default()
    };
    let slide = config.message_slide;
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(Box::new(HeartsRain::new(config)), clock.clone());
    driver.start();
    driver.apply_asset(AssetEvent::Model(Ok(tetra())));

    run_frames(&mut driver, &clock, 3);
    driver.pointer_down();
    run_frames(&mut driver, &clock, 180);

    let scene = &driver.card().stage().scene;
    let message = scene.get_object_by_name("Message").unwrap();
    let instruction = scene.get_object_by_name("Instruction").unwrap();
    assert!(approx_vec3(
        scene.object_translation(message).unwrap(),
        slide.end,
        1e-6
    ));
    assert!(scene.is_object_visible(message));
    assert!(!scene.is_object_visible(instruction));
    assert_eq!(
        scene.drawables().count(),
        HeartsRainConfig::default().count
    );
}

#[test]
fn rotating_heart_shows_its_back_after_a_click() {
    let clock = ManualClock::new(0.0);
    let mut driver = FrameDriver::new(
        Box::new(RotatingHeart::new(RotatingHeartConfig::default())),
        clock.clone(),
    );
    driver.start();
    driver.apply_asset(AssetEvent::Model(Ok(tetra())));

    run_frames(&mut driver, &clock, 2);
    driver.pointer_down();
    run_frames(&mut driver, &clock, 90);

    let scene = &driver.card().stage().scene;
    let pivot = scene.get_object_by_name("Heart pivot").unwrap();
    let rotation = scene.get_object_transform(pivot).unwrap().rotation();
    let (axis, angle) = rotation.to_axis_angle();
    assert!((angle - PI).abs() < 1e-4);
    assert!(approx_vec3(axis.abs(), Vec3::Y, 1e-4));

    let back = scene.get_object_by_name("Back text").unwrap();
    assert!(scene.world_position(back).unwrap().z > 0.0);
}
