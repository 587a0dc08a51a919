use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of frame timestamps, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn set(&self, now: f64) {
        self.0.set(now);
    }

    pub fn advance(&self, seconds: f64) {
        self.0.set(self.0.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

/// Converts per-frame timestamps into deltas.
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    running: bool,
    last_render_time: Option<f64>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first tick after starting reports a zero delta.
    pub fn start(&mut self) {
        self.running = true;
        self.last_render_time = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the time since the previous tick, or `None` while stopped.
    pub fn tick(&mut self, now: f64) -> Option<f32> {
        if !self.running {
            return None;
        }

        let delta = match self.last_render_time {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_render_time = Some(now);

        Some(delta)
    }
}
