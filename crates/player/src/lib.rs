//! Presentation host: owns the scene, the tween player, the storyboard and
//! the frame loop, and drives them from host callbacks.
//!
//! # Invariants
//! - Nothing is rendered and no trigger is accepted before every asset has loaded.
//! - `AssetsReady` and `IntroStarted` are each emitted at most once, in that order.
//! - A stopped frame loop neither advances tweens nor renders.

mod config;
mod frame;
mod presentation;

pub use config::{FrameConfig, PresentationManifest};
pub use frame::{FrameLoop, FrameStats};
pub use presentation::{LifecycleEvent, Presentation};

use showreel_assets::AssetError;
use showreel_scene::SceneError;
use showreel_storyboard::StoryboardError;

/// Errors from booting or driving a presentation.
#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Storyboard(#[from] StoryboardError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("presentation already booted")]
    AlreadyBooted,
}

pub fn crate_info() -> &'static str {
    "showreel-player v0.1.0"
}
