use std::f32::consts::{PI, TAU};

/// Rotation that runs at a fixed rate until it reaches the next multiple of π.
///
/// Successive triggers stop at π and then at 2π, which wraps back to zero.
#[derive(Debug, Clone)]
pub struct HalfTurn {
    angle: f32,
    /// Radians per second.
    pub speed: f32,
    target: Option<f32>,
}

impl HalfTurn {
    pub fn new(speed: f32) -> Self {
        Self {
            angle: 0.0,
            speed: speed.abs(),
            target: None,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// True while resting on the back side.
    pub fn is_turned(&self) -> bool {
        self.target.is_none() && (self.angle - PI).abs() < 1e-4
    }

    pub fn try_start(&mut self) -> bool {
        if self.target.is_some() {
            return false;
        }

        let turns = (self.angle / PI + 1e-4).floor();
        self.target = Some((turns + 1.0) * PI);
        true
    }

    /// Advances the rotation. Returns true on the frame that reaches the stop.
    pub fn advance(&mut self, delta: f32) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        let angle = self.angle + delta * self.speed;
        if angle < target {
            self.angle = angle;
            return false;
        }

        self.angle = if target >= TAU - 1e-4 { 0.0 } else { target };
        self.target = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_exactly_at_pi() {
        let mut turn = HalfTurn::new(PI);
        assert!(turn.try_start());

        assert!(!turn.advance(0.5));
        assert!((turn.angle() - PI * 0.5).abs() < 1e-5);
        assert!(turn.advance(0.75));
        assert_eq!(turn.angle(), PI);
        assert!(turn.is_turned());
    }

    #[test]
    fn second_turn_wraps_to_zero() {
        let mut turn = HalfTurn::new(PI);
        turn.try_start();
        turn.advance(2.0);

        assert!(turn.try_start());
        assert!(!turn.advance(0.5));
        assert!(turn.angle() > PI);
        assert!(turn.advance(1.0));
        assert_eq!(turn.angle(), 0.0);
        assert!(!turn.is_turned());
    }

    #[test]
    fn ignores_trigger_while_turning() {
        let mut turn = HalfTurn::new(1.0);
        assert!(turn.try_start());
        turn.advance(0.1);
        assert!(!turn.try_start());
        assert!(turn.is_active());
    }

    #[test]
    fn idle_turn_does_not_move() {
        let mut turn = HalfTurn::new(1.0);
        assert!(!turn.advance(10.0));
        assert_eq!(turn.angle(), 0.0);
    }
}
