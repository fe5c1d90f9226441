//! Storyboard: the scripted slide sequence and the controller that plays it.
//!
//! # Invariants
//! - At most one transition is in flight; triggers arriving while busy are dropped.
//! - Forward triggers at the last slide and backward triggers change nothing.
//! - Scripts address entities through a resolved `Cast`, never by scene position.

mod controller;
pub mod scripts;
mod stage;

pub use controller::{Slide, SlideScript, Storyboard, StoryboardController, TriggerOutcome};
pub use stage::{BusyPolicy, Cast, CastNames, Stage, TransitionState, TweenRole};

use showreel_animation::TweenError;
use showreel_scene::SceneError;

/// Errors from running a storyboard script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoryboardError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Tween(#[from] TweenError),
}

pub fn crate_info() -> &'static str {
    "showreel-storyboard v0.1.0"
}
