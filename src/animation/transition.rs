/// What a [`Transition`] did on this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    Idle,
    Running { progress: f32, reversing: bool },
    /// The pass in direction `reversing` ended on this frame. The transition
    /// has already flipped its direction for the next trigger.
    Finished { reversing: bool },
}

/// A bounded animation with normalized progress over a fixed duration.
///
/// Each completed pass flips the direction, so triggers alternate between
/// playing forward and playing backward over the same keyframes.
#[derive(Debug, Clone)]
pub struct Transition {
    duration: f32,
    start_time: f64,
    active: bool,
    reversing: bool,
}

impl Transition {
    /// `duration` is in seconds and must be positive.
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            start_time: 0.0,
            active: false,
            reversing: false,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Starts a pass unless one is already running. Returns whether it started.
    pub fn try_start(&mut self, now: f64) -> bool {
        if self.active {
            return false;
        }

        self.start_time = now;
        self.active = true;
        true
    }

    /// Starts a pass, or stops the running one where it is.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.active {
            self.active = false;
        } else {
            self.try_start(now);
        }
        self.active
    }

    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.start_time) / f64::from(self.duration)) as f32
    }

    pub fn advance(&mut self, now: f64) -> TransitionStep {
        if !self.active {
            return TransitionStep::Idle;
        }

        let progress = self.progress(now);
        if progress > 1.0 {
            let reversing = self.reversing;
            self.active = false;
            self.reversing = !reversing;
            return TransitionStep::Finished { reversing };
        }

        TransitionStep::Running {
            progress: progress.max(0.0),
            reversing: self.reversing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_started() {
        let mut transition = Transition::new(1.0);
        assert_eq!(transition.advance(5.0), TransitionStep::Idle);
        assert!(!transition.is_active());
    }

    #[test]
    fn reentry_is_ignored() {
        let mut transition = Transition::new(1.0);
        assert!(transition.try_start(1.0));
        assert!(!transition.try_start(1.5));
        assert_eq!(transition.start_time(), 1.0);
    }

    #[test]
    fn finishing_flips_direction() {
        let mut transition = Transition::new(1.0);
        transition.try_start(0.0);

        assert_eq!(
            transition.advance(0.5),
            TransitionStep::Running {
                progress: 0.5,
                reversing: false
            }
        );
        assert_eq!(
            transition.advance(1.01),
            TransitionStep::Finished { reversing: false }
        );
        assert!(transition.is_reversing());
        assert!(!transition.is_active());

        transition.try_start(2.0);
        assert!(matches!(
            transition.advance(2.25),
            TransitionStep::Running {
                reversing: true,
                ..
            }
        ));
    }

    #[test]
    fn toggle_stops_without_flipping() {
        let mut transition = Transition::new(2.0);
        assert!(transition.toggle(0.0));
        assert!(!transition.toggle(0.5));
        assert!(!transition.is_reversing());
        assert_eq!(transition.advance(1.0), TransitionStep::Idle);
    }

    #[test]
    fn zero_duration_is_clamped() {
        let mut transition = Transition::new(0.0);
        transition.try_start(1.0);
        assert_eq!(
            transition.advance(1.0),
            TransitionStep::Running {
                progress: 0.0,
                reversing: false
            }
        );
    }
}
