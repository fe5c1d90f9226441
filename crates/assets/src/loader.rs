use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::AssetError;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    /// First eight bytes of the SHA-256 of `data`.
    pub fn of(data: &[u8]) -> Self {
        let result = Sha256::digest(data);
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// An opaque renderable node produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    /// The resource name the node was loaded for.
    pub name: String,
    pub asset: AssetId,
    pub mesh_count: u32,
    pub material_count: u32,
}

/// Resolves a named model resource into a node.
pub trait AssetLoader {
    fn load(&self, name: &str) -> impl Future<Output = Result<ModelNode, AssetError>>;
}

/// Loads `<root>/<name>.gltf` and reads its metadata.
///
/// Only the JSON document is parsed; buffers and images stay with the
/// renderer.
#[derive(Debug, Clone)]
pub struct GltfFileLoader {
    root: PathBuf,
}

impl GltfFileLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.gltf"))
    }

    fn parse(name: &str, data: &[u8]) -> Result<ModelNode, AssetError> {
        let json: serde_json::Value =
            serde_json::from_slice(data).map_err(|e| AssetError::GltfParse(e.to_string()))?;
        if json.get("asset").is_none() {
            return Err(AssetError::GltfParse(format!(
                "{name}: missing required \"asset\" object"
            )));
        }
        let count = |key: &str| {
            json.get(key)
                .and_then(|v| v.as_array())
                .map_or(0, |a| a.len() as u32)
        };
        Ok(ModelNode {
            name: name.to_string(),
            asset: AssetId::of(data),
            mesh_count: count("meshes"),
            material_count: count("materials"),
        })
    }
}

impl AssetLoader for GltfFileLoader {
    async fn load(&self, name: &str) -> Result<ModelNode, AssetError> {
        let path = self.path_for(name);
        tracing::debug!(path = %path.display(), "loading glTF");
        let data = tokio::fs::read(&path).await?;
        Self::parse(name, &data)
    }
}

/// In-memory loader that fabricates a node for every name.
///
/// Used for headless runs and tests. Names registered with
/// [`StaticAssetLoader::failing`] fail to load.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetLoader {
    failing: BTreeSet<String>,
}

impl StaticAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }
}

impl AssetLoader for StaticAssetLoader {
    async fn load(&self, name: &str) -> Result<ModelNode, AssetError> {
        if self.failing.contains(name) {
            return Err(AssetError::ResourceLoadFailure {
                name: name.to_string(),
                reason: "marked as failing".into(),
            });
        }
        Ok(ModelNode {
            name: name.to_string(),
            asset: AssetId::of(name.as_bytes()),
            mesh_count: 1,
            material_count: 1,
        })
    }
}
