//! Time-driven transform animation shared by all three cards.
//!
//! A [`Ticker`] turns timestamps into frame deltas, [`Spin`] is the passive
//! motion applied every frame, and [`Transition`] / [`HalfTurn`] are the
//! bounded animations started from pointer input.

pub mod half_turn;
pub mod keyframe;
pub mod spin;
pub mod ticker;
pub mod transition;

pub use half_turn::HalfTurn;
pub use keyframe::KeyframePair;
pub use spin::{wrap_angle, Spin};
pub use ticker::{Clock, ManualClock, SystemClock, Ticker};
pub use transition::{Transition, TransitionStep};
