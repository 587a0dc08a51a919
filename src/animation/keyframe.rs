use glam::Vec3;

/// Start and end positions of a node for one transition pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframePair {
    pub start: Vec3,
    pub end: Vec3,
}

impl KeyframePair {
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// `start + (end - start) * progress`, with the ends swapped when reversing.
    pub fn sample(&self, progress: f32, reversing: bool) -> Vec3 {
        let (from, to) = if reversing {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };

        from + (to - from) * progress
    }

    /// Where a pass in the given direction comes to rest.
    pub fn resting(&self, reversing: bool) -> Vec3 {
        if reversing {
            self.start
        } else {
            self.end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: KeyframePair =
        KeyframePair::new(Vec3::new(3.0, 0.0, 3.0), Vec3::new(-2.0, 0.0, -2.0));

    #[test]
    fn samples_endpoints_and_midpoint() {
        assert_eq!(PAIR.sample(0.0, false), PAIR.start);
        assert_eq!(PAIR.sample(1.0, false), PAIR.end);
        assert_eq!(PAIR.sample(0.5, false), Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn reversing_swaps_ends() {
        assert_eq!(PAIR.sample(0.0, true), PAIR.end);
        assert_eq!(PAIR.sample(1.0, true), PAIR.start);
        assert_eq!(PAIR.resting(true), PAIR.start);
        assert_eq!(PAIR.resting(false), PAIR.end);
    }
}
