//! Transition player: time-bounded tweens over named numeric fields.
//!
//! # Invariants
//! - Interpolated output is a pure function of elapsed time.
//! - A finished tween snaps to its exact end values and completes exactly once.
//! - Cancelled tweens never fire callbacks.

mod easing;
mod player;
mod tween;

pub use easing::Easing;
pub use player::{TweenId, TweenPlayer};
pub use tween::{CompleteFn, Fields, Tween, TweenError, UpdateFn};

pub fn crate_info() -> &'static str {
    "showreel-animation v0.1.0"
}
