use std::f32::consts::TAU;

/// Keeps an angle within one turn of zero.
pub fn wrap_angle(mut angle: f32) -> f32 {
    while angle > TAU {
        angle -= TAU;
    }
    while angle < -TAU {
        angle += TAU;
    }
    angle
}

/// Continuous rotation advanced by `delta * speed` every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    angle: f32,
    /// Radians per second.
    pub speed: f32,
}

impl Spin {
    pub fn new(speed: f32) -> Self {
        Self::with_phase(speed, 0.0)
    }

    pub fn with_phase(speed: f32, angle: f32) -> Self {
        Self {
            angle: wrap_angle(angle),
            speed,
        }
    }

    pub fn advance(&mut self, delta: f32) -> f32 {
        self.angle = wrap_angle(self.angle + delta * self.speed);
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_a_full_turn() {
        let mut spin = Spin::new(1.0);
        spin.advance(TAU + 0.5);
        assert!((spin.angle() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn large_deltas_stay_in_range() {
        let mut spin = Spin::new(3.0);
        let angle = spin.advance(100.0);
        assert!(angle <= TAU && angle >= 0.0);
        assert!((angle - (300.0_f32).rem_euclid(TAU)).abs() < 2e-3);
    }
}
