//! Scene graph store: the authoritative state the presentation renders.
//!
//! # Invariants
//! - Entities are never removed; insertion order is render order.
//! - Entities are addressed by `EntityId` handles or by name, never by position.
//! - Mutations made through the store API are recorded in a drainable event log.

pub mod camera;
pub mod graph;

pub use camera::Camera;
pub use graph::{EntityKind, SceneEntity, SceneError, SceneEvent, SceneGraph};
