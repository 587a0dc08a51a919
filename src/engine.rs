use crate::animation::{Clock, Ticker};
use crate::assets::{self, AssetEvent};
use crate::cards::CardScene;

/// Runs a card frame by frame against a clock.
///
/// The window drives this from redraw requests; tests drive it with a
/// `ManualClock`. Scene state is only ever mutated through here, on the
/// thread that owns the driver.
pub struct FrameDriver<C: Clock> {
    card: Box<dyn CardScene>,
    ticker: Ticker,
    clock: C,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(card: Box<dyn CardScene>, clock: C) -> Self {
        Self {
            card,
            ticker: Ticker::new(),
            clock,
        }
    }

    pub fn start(&mut self) {
        self.ticker.start();
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Advances the card by one frame. Returns false while stopped.
    pub fn frame(&mut self) -> bool {
        let now = self.clock.now();
        let Some(delta) = self.ticker.tick(now) else {
            return false;
        };

        self.card.update(now, delta);
        self.card.stage_mut().scene.late_update();

        true
    }

    pub fn pointer_down(&mut self) {
        let now = self.clock.now();
        self.card.on_pointer_down(now);
    }

    pub fn apply_asset(&mut self, event: AssetEvent) {
        assets::apply(self.card.as_mut(), event);
    }

    pub fn card(&self) -> &dyn CardScene {
        self.card.as_ref()
    }
}
