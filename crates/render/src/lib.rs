//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer only reads the scene graph; it never mutates it.
//! - Output derives from the scene graph and camera alone.
//!
//! The GPU backend lives outside this workspace. [`DebugTextRenderer`]
//! implements the same trait so the CLI and tests can drive a presentation
//! headless.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer, Viewport};

pub fn crate_info() -> &'static str {
    "showreel-render v0.1.0"
}
