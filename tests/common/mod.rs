#![allow(dead_code)]

use std::f32::consts::TAU;

use glam::Vec3;

pub fn approx_vec3(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    (a - b).length() <= epsilon
}

/// Whether two angles name the same direction.
pub fn same_angle(a: f32, b: f32, epsilon: f32) -> bool {
    let difference = (a - b).rem_euclid(TAU);
    difference <= epsilon || TAU - difference <= epsilon
}
