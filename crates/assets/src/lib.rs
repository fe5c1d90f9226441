//! Asset resolution: named model resources in, placed scene entities out.
//!
//! Models are fetched through an [`AssetLoader`]. Loads run concurrently but
//! land in the scene graph in manifest order, and nothing is inserted until
//! every load has succeeded.
//!
//! # Layout
//! The manifest describing which models to load, and where each one starts,
//! is plain JSON that can be saved and edited by hand.

mod loader;
mod manifest;
mod resolve;

pub use loader::{AssetId, AssetLoader, GltfFileLoader, ModelNode, StaticAssetLoader};
pub use manifest::{AssetManifest, DecorationSetup, ModelSetup};
pub use resolve::{
    Placement, add_environment, block_on, populate, resolve_all, resolve_blocking,
};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load resource {name:?}: {reason}")]
    ResourceLoadFailure { name: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest lists no models")]
    EmptyManifest,
    #[error("resolved {resolved} nodes for {expected} models")]
    CountMismatch { expected: usize, resolved: usize },
}

pub fn crate_info() -> &'static str {
    "showreel-assets v0.1.0"
}
