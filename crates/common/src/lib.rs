//! Shared types used across the showreel workspace.

mod types;

pub use types::{Color, EntityId, MaterialState, Transform};
